//! Authenticated HTTP client for the SmashFit backend.
//!
//! Every call goes through one pipeline:
//! 1. the current access token (if any) is attached as a bearer header;
//! 2. a 401 on a refresh-eligible request triggers one coalesced refresh
//!    through the http-only refresh cookie, then one replay with the new
//!    token;
//! 3. if that cannot happen, the token is cleared and the session state flips
//!    to [`SessionState::LoginRequired`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;

use super::envelope::{decode, unwrap_envelope};
use super::refresh::{RefreshCoordinator, RefreshFailure};
use super::request::{PendingRequest, REFRESH_PATH, RequestBody};
use super::{ApiError, ApiResult};
use crate::config::{Config, TokenStoreKind, paths};
use crate::session::{
    FileTokenStore, MemoryTokenStore, PersistentCookieJar, SessionState, TokenStore,
};

/// Standard User-Agent header for SmashFit API requests.
pub const USER_AGENT: &str = concat!("smashfit/", env!("CARGO_PKG_VERSION"));

/// Cloneable handle to the shared client; clones share the session.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

struct Inner {
    base_url: String,
    http: reqwest::Client,
    store: Arc<dyn TokenStore>,
    cookies: Arc<PersistentCookieJar>,
    refresh: RefreshCoordinator,
    state: watch::Sender<SessionState>,
}

/// Builder for [`ApiClient`].
pub struct ApiClientBuilder {
    base_url: String,
    store: Option<Arc<dyn TokenStore>>,
    cookies: Option<Arc<PersistentCookieJar>>,
    timeout: Option<Duration>,
}

impl ApiClientBuilder {
    #[must_use]
    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.store = Some(store);
        self
    }

    #[must_use]
    pub fn cookie_jar(mut self, cookies: Arc<PersistentCookieJar>) -> Self {
        self.cookies = Some(cookies);
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> ApiResult<ApiClient> {
        let base_url = self.base_url.trim().trim_end_matches('/').to_string();
        url::Url::parse(&base_url)
            .map_err(|e| ApiError::InvalidRequest(format!("invalid base URL {base_url}: {e}")))?;

        // Runtime guard for integration tests (set SMASHFIT_BLOCK_REAL_API=1 in test harness)
        if std::env::var("SMASHFIT_BLOCK_REAL_API").is_ok_and(|v| v == "1")
            && base_url == Config::DEFAULT_BASE_URL
        {
            return Err(ApiError::InvalidRequest(
                "SMASHFIT_BLOCK_REAL_API=1 but the production backend is configured; \
                 set SMASHFIT_BASE_URL to a mock server"
                    .to_string(),
            ));
        }

        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryTokenStore::default()));
        let cookies = self
            .cookies
            .unwrap_or_else(|| Arc::new(PersistentCookieJar::in_memory()));

        let mut http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_provider(Arc::clone(&cookies));
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        let http = http.build().map_err(|e| ApiError::from_reqwest(&e))?;

        let (state, _) = watch::channel(SessionState::from_store(store.as_ref()));

        Ok(ApiClient {
            inner: Arc::new(Inner {
                base_url,
                http,
                store,
                cookies,
                refresh: RefreshCoordinator::default(),
                state,
            }),
        })
    }
}

impl ApiClient {
    pub fn builder(base_url: impl Into<String>) -> ApiClientBuilder {
        ApiClientBuilder {
            base_url: base_url.into(),
            store: None,
            cookies: None,
            timeout: None,
        }
    }

    /// Builds a client from config: base URL, timeout, and token persistence
    /// under `$SMASHFIT_HOME`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        use anyhow::Context;

        let base_url = config.effective_base_url()?;
        let (store, cookies): (Arc<dyn TokenStore>, PersistentCookieJar) = match config.token_store
        {
            TokenStoreKind::File => {
                let session_path = paths::session_path();
                let store = FileTokenStore::open(&session_path).with_context(|| {
                    format!("Failed to read session from {}", session_path.display())
                })?;
                let cookies_path = paths::cookies_path();
                let cookies = PersistentCookieJar::open(&cookies_path).with_context(|| {
                    format!("Failed to read cookies from {}", cookies_path.display())
                })?;
                (Arc::new(store), cookies)
            }
            TokenStoreKind::Memory => (
                Arc::new(MemoryTokenStore::default()),
                PersistentCookieJar::in_memory(),
            ),
        };

        Self::builder(base_url)
            .token_store(store)
            .cookie_jar(Arc::new(cookies))
            .timeout(config.request_timeout())
            .build()
            .context("Failed to build API client")
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn token_store(&self) -> &dyn TokenStore {
        self.inner.store.as_ref()
    }

    pub fn cookie_jar(&self) -> &PersistentCookieJar {
        &self.inner.cookies
    }

    /// Current session state.
    pub fn session_state(&self) -> SessionState {
        *self.inner.state.borrow()
    }

    /// Subscribes to session state changes (sign-in, logout, login required).
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Stores a freshly issued access token and marks the session signed in.
    pub fn sign_in(&self, token: &str) -> ApiResult<()> {
        self.inner.store.set(token)?;
        self.inner.state.send_replace(SessionState::SignedIn);
        tracing::info!("signed in");
        Ok(())
    }

    /// Drops the local session: access token and refresh cookie.
    pub fn sign_out(&self) -> ApiResult<()> {
        self.inner.store.clear()?;
        self.inner.cookies.clear()?;
        self.inner.state.send_replace(SessionState::SignedOut);
        tracing::info!("signed out");
        Ok(())
    }

    /// Sends a request and returns the raw successful response.
    ///
    /// Non-success statuses become [`ApiError`]s. A 401 goes through the
    /// refresh cycle at most once; see the module docs.
    pub async fn execute(&self, mut request: PendingRequest) -> ApiResult<Response> {
        let sent_token = self.inner.store.get();
        let response = self.dispatch(&request, sent_token.as_deref()).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return check_status(response).await;
        }

        let rejection = error_for(response).await;

        if !request.may_refresh() {
            tracing::debug!(
                path = %request.path,
                retried = request.retried,
                "401 not eligible for refresh"
            );
            return Err(rejection);
        }

        // Nothing to renew when the request went out without a token.
        let Some(stale) = sent_token else {
            tracing::debug!(path = %request.path, "401 without a token, login required");
            return Err(self.require_login(rejection));
        };

        let renewed = self
            .inner
            .refresh
            .renew(self.inner.store.as_ref(), &stale, || self.request_new_token())
            .await;

        match renewed {
            Ok(token) => {
                request.retried = true;
                tracing::debug!(path = %request.path, "retrying with refreshed token");
                let response = self.dispatch(&request, Some(&token)).await?;
                check_status(response).await
            }
            Err(RefreshFailure::Failed(e)) => {
                tracing::debug!(error = %e, "refresh failed");
                Err(self.require_login(rejection))
            }
            Err(RefreshFailure::SessionCleared) => Err(self.require_login(rejection)),
        }
    }

    /// Sends a request and returns the unwrapped envelope payload.
    pub async fn send_json(&self, request: PendingRequest) -> ApiResult<Value> {
        let response = self.execute(request).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::from_reqwest(&e))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        let body: Value =
            serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))?;
        unwrap_envelope(body)
    }

    /// Sends a request and decodes the unwrapped payload into `T`.
    pub async fn send<T: DeserializeOwned>(&self, request: PendingRequest) -> ApiResult<T> {
        let value = self.send_json(request).await?;
        decode(value)
    }

    /// Sends a request and returns the raw response body (file downloads).
    pub async fn send_bytes(&self, request: PendingRequest) -> ApiResult<Vec<u8>> {
        let response = self.execute(request).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::from_reqwest(&e))?;
        Ok(bytes.to_vec())
    }

    /// Clears the local token and raises the login-required signal.
    /// Returns the error that triggered it so callers can propagate it.
    fn require_login(&self, trigger: ApiError) -> ApiError {
        if let Err(e) = self.inner.store.clear() {
            tracing::warn!(error = %e, "failed to clear token store");
        }
        self.inner.state.send_replace(SessionState::LoginRequired);
        tracing::info!("session expired, login required");
        trigger
    }

    /// Calls the refresh endpoint. The refresh credential travels in the
    /// cookie jar, never in the bearer header.
    async fn request_new_token(&self) -> ApiResult<String> {
        let request = PendingRequest::post(REFRESH_PATH).exempt();
        let response = self.dispatch(&request, None).await?;
        let response = check_status(response).await?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        let payload = unwrap_envelope(body)?;

        ["accessToken", "access_token", "token"]
            .iter()
            .find_map(|key| payload.get(*key).and_then(Value::as_str))
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ApiError::Decode("refresh response has no access token".to_string()))
    }

    /// Builds and sends one attempt of `request`, attaching `token` as bearer.
    async fn dispatch(&self, request: &PendingRequest, token: Option<&str>) -> ApiResult<Response> {
        let url = format!("{}{}", self.inner.base_url, request.path);
        let mut builder = self.inner.http.request(request.method.clone(), &url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
                ApiError::InvalidRequest(format!("access token is not a valid header value: {e}"))
            })?;
            builder = builder.header(AUTHORIZATION, value);
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(body),
            RequestBody::Multipart { files, fields } => builder.multipart(build_form(files, fields)?),
        };

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            authenticated = token.is_some(),
            retried = request.retried,
            "sending request"
        );

        builder.send().await.map_err(|e| {
            let err = ApiError::from_reqwest(&e);
            tracing::debug!(path = %request.path, error = %err, "request failed");
            err
        })
    }
}

fn build_form(
    files: &[super::request::FilePart],
    fields: &[(String, String)],
) -> ApiResult<Form> {
    let mut form = Form::new();
    for (name, value) in fields {
        form = form.text(name.clone(), value.clone());
    }
    for file in files {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime)
            .map_err(|e| ApiError::InvalidRequest(format!("invalid mime type: {e}")))?;
        form = form.part(file.field.clone(), part);
    }
    Ok(form)
}

/// Passes successful responses through and turns the rest into errors.
async fn check_status(response: Response) -> ApiResult<Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(error_for(response).await)
    }
}

async fn error_for(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ApiError::from_status(status, &body)
}
