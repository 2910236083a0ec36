//! Outgoing request context.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::{ApiError, ApiResult};

/// Path of the token refresh endpoint.
pub const REFRESH_PATH: &str = "/auth/refresh";

/// Whether a 401 on this request may be recovered by a token refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthPolicy {
    /// 401 triggers one refresh and one retry.
    #[default]
    Refreshable,
    /// 401 is surfaced as-is. Used by credential exchanges (login, OTP,
    /// refresh) where 401 means "wrong credentials", not "expired token".
    Exempt,
}

/// A file sent as part of a multipart upload.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl FilePart {
    pub fn new(field: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = guess_mime(&file_name).to_string();
        Self {
            field: field.into(),
            file_name,
            mime,
            bytes,
        }
    }
}

fn guess_mime(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "csv" => "text/csv",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xls" => "application/vnd.ms-excel",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "pdf" => "application/pdf",
        "json" => "application/json",
        _ => "application/octet-stream",
    }
}

/// Request body. Kept in replayable form so a retry can resend it.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart {
        files: Vec<FilePart>,
        fields: Vec<(String, String)>,
    },
}

/// One outgoing call and its retry marker.
///
/// `retried` is set once the request has been replayed after a refresh and
/// is never reset; it is what caps the refresh cycle at one attempt.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    pub policy: AuthPolicy,
    pub retried: bool,
}

impl PendingRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            policy: AuthPolicy::default(),
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Sets a JSON body.
    pub fn json(mut self, body: &impl Serialize) -> ApiResult<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(format!("failed to encode body: {e}")))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    /// Sets a JSON body from an already-built value.
    #[must_use]
    pub fn json_value(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    /// Sets a JSON body only when one is given.
    #[must_use]
    pub fn maybe_json(self, body: Option<Value>) -> Self {
        match body {
            Some(body) => self.json_value(body),
            None => self,
        }
    }

    #[must_use]
    pub fn multipart(mut self, files: Vec<FilePart>, fields: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Multipart { files, fields };
        self
    }

    /// Appends query parameters. Empty values are skipped.
    #[must_use]
    pub fn query(mut self, params: &[(&str, &str)]) -> Self {
        self.query.extend(
            params
                .iter()
                .filter(|(_, v)| !v.is_empty())
                .map(|(k, v)| ((*k).to_string(), (*v).to_string())),
        );
        self
    }

    #[must_use]
    pub fn exempt(mut self) -> Self {
        self.policy = AuthPolicy::Exempt;
        self
    }

    /// True for the token refresh call itself.
    pub fn is_refresh_call(&self) -> bool {
        self.path.trim_end_matches('/') == REFRESH_PATH
    }

    /// Whether a 401 on this request may go through the refresh cycle.
    pub fn may_refresh(&self) -> bool {
        self.policy == AuthPolicy::Refreshable && !self.retried && !self.is_refresh_call()
    }
}
