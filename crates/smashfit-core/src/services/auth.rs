//! Credential exchange and the current user's profile.
//!
//! Login and registration are exempt from the refresh cycle: a 401 there
//! means bad credentials, not an expired token.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::FallbackMessage;
use crate::api::{ApiClient, ApiError, ApiResult, PendingRequest, decode};

/// A backend user account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default, alias = "fullName", alias = "name")]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, alias = "profilePic")]
    pub picture: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Name to show, falling back to the email address.
    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.email
        } else {
            &self.full_name
        }
    }
}

/// Payload of a successful credential exchange.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthSession {
    #[serde(default, alias = "accessToken", alias = "access_token")]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub struct Auth<'a> {
    pub(super) client: &'a ApiClient,
}

impl Auth<'_> {
    /// Email/password login. Stores the returned access token.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AuthSession> {
        let request = PendingRequest::post("/auth/login")
            .json_value(json!({ "email": email, "password": password }))
            .exempt();
        let session: AuthSession = self.client.send(request).await.or_message("Login failed")?;
        self.adopt(&session)?;
        tracing::info!(email, "logged in");
        Ok(session)
    }

    /// Exchanges a Google ID token for a session.
    pub async fn google_login(&self, id_token: &str) -> ApiResult<AuthSession> {
        let request = PendingRequest::post("/auth/google")
            .json_value(json!({ "idToken": id_token }))
            .exempt();
        let session: AuthSession = self
            .client
            .send(request)
            .await
            .or_message("Google login failed")?;
        self.adopt(&session)?;
        Ok(session)
    }

    /// Creates an account. The backend does not sign the user in.
    pub async fn register(&self, full_name: &str, email: &str, password: &str) -> ApiResult<Value> {
        let request = PendingRequest::post("/auth/register")
            .json_value(json!({
                "fullName": full_name,
                "email": email,
                "password": password,
            }))
            .exempt();
        self.client
            .send_json(request)
            .await
            .or_message("Registration failed")
    }

    /// The signed-in user, verified by the backend.
    pub async fn profile(&self) -> ApiResult<User> {
        let payload = self
            .client
            .send_json(PendingRequest::get("/auth/me"))
            .await
            .or_message("Failed to fetch profile")?;
        user_from_payload(payload)
    }

    /// Ends the server session. The local token and refresh cookie are
    /// dropped even when the server call fails.
    pub async fn logout(&self) -> ApiResult<()> {
        let result = self
            .client
            .send_json(PendingRequest::post("/auth/logout"))
            .await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "server logout failed, clearing local session anyway");
        }
        self.client.sign_out()?;
        result.map(|_| ())
    }

    fn adopt(&self, session: &AuthSession) -> ApiResult<()> {
        match session.token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => self.client.sign_in(token),
            None => Err(ApiError::Decode(
                "login response has no access token".to_string(),
            )),
        }
    }
}

/// `/auth/me` answers either `{user: {...}}` or the user object itself.
fn user_from_payload(payload: Value) -> ApiResult<User> {
    match payload {
        Value::Object(mut map) if map.get("user").is_some_and(Value::is_object) => {
            decode(map.remove("user").unwrap_or_default())
        }
        other => decode(other),
    }
}
