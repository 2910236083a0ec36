//! Error types for the API client.

/// Errors surfaced by [`ApiClient`](crate::ApiClient) and the service modules.
///
/// Server-provided messages are kept verbatim when present; services fill in
/// their own fallback text with [`ApiError::or_message`] when the server gave
/// none.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 401 that the refresh coordinator could not (or was not allowed to)
    /// recover from.
    #[error("{}", .message.as_deref().unwrap_or("Unauthorized"))]
    Unauthorized { message: Option<String> },

    /// 404. Many callers treat this as an absent result, see [`OptionalExt`].
    #[error("{}", .message.as_deref().unwrap_or("Not found"))]
    NotFound { message: Option<String> },

    /// Any other non-success status (validation, business rule, server error).
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("request failed"))]
    Status { status: u16, message: Option<String> },

    /// 2xx response whose envelope said `success: false`.
    #[error("{}", .message.as_deref().unwrap_or("Request rejected by server"))]
    Rejected { message: Option<String> },

    #[error("request timed out: {0}")]
    Timeout(String),

    /// Connection or protocol failure; nothing came back from the server.
    #[error("network error: {0}")]
    Transport(String),

    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The token store could not be read or written.
    #[error("token storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// The request could not be built (bad URL, header, or body).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Result type for API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Classifies a non-success HTTP status, extracting the server message
    /// from the error body when there is one.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = super::envelope::extract_message(body);
        match status {
            401 => ApiError::Unauthorized { message },
            404 => ApiError::NotFound { message },
            _ => ApiError::Status { status, message },
        }
    }

    pub(crate) fn from_reqwest(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout(e.to_string())
        } else if e.is_connect() {
            ApiError::Transport(format!("connection failed: {e}"))
        } else if e.is_builder() {
            ApiError::InvalidRequest(e.to_string())
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }

    /// HTTP status associated with this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    /// True for errors where the request never got a response.
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Timeout(_))
    }

    /// The message the server sent, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { message }
            | ApiError::NotFound { message }
            | ApiError::Status { message, .. }
            | ApiError::Rejected { message } => message.as_deref(),
            _ => None,
        }
    }

    /// Fills in `fallback` as the message when the server sent none.
    #[must_use]
    pub fn or_message(mut self, fallback: &str) -> Self {
        match &mut self {
            ApiError::Unauthorized { message }
            | ApiError::NotFound { message }
            | ApiError::Status { message, .. }
            | ApiError::Rejected { message } => {
                if message.is_none() {
                    *message = Some(fallback.to_string());
                }
            }
            _ => {}
        }
        self
    }
}

/// Turns "not found" into an absent value for detail/list lookups.
pub trait OptionalExt<T> {
    fn optional(self) -> ApiResult<Option<T>>;
}

impl<T> OptionalExt<T> for ApiResult<T> {
    fn optional(self) -> ApiResult<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_classifies() {
        assert!(ApiError::from_status(401, "").is_unauthorized());
        assert!(ApiError::from_status(404, "").is_not_found());

        let err = ApiError::from_status(422, r#"{"success":false,"message":"Email taken"}"#);
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.server_message(), Some("Email taken"));
        assert_eq!(err.to_string(), "HTTP 422: Email taken");
    }

    #[test]
    fn test_or_message_keeps_server_message() {
        let err = ApiError::from_status(400, r#"{"message":"Category full"}"#)
            .or_message("Registration failed");
        assert_eq!(err.server_message(), Some("Category full"));

        let err = ApiError::from_status(500, "").or_message("Registration failed");
        assert_eq!(err.to_string(), "HTTP 500: Registration failed");
    }

    #[test]
    fn test_or_message_leaves_network_errors_alone() {
        let err = ApiError::Transport("connection reset".to_string()).or_message("ignored");
        assert_eq!(err.to_string(), "network error: connection reset");
        assert!(err.is_network());
    }

    #[test]
    fn test_optional_maps_not_found_only() {
        let found: ApiResult<u32> = Ok(7);
        assert_eq!(found.optional().unwrap(), Some(7));

        let missing: ApiResult<u32> = Err(ApiError::from_status(404, ""));
        assert_eq!(missing.optional().unwrap(), None);

        let failed: ApiResult<u32> = Err(ApiError::from_status(500, ""));
        assert!(failed.optional().is_err());
    }
}
