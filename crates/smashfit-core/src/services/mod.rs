//! Typed wrappers around the backend's REST resources.
//!
//! Each family is a thin borrow of the shared [`ApiClient`], obtained through
//! an accessor such as [`ApiClient::tournaments`]. Operations build a path and
//! payload, go through the client's auth pipeline, and return the unwrapped
//! envelope payload. Free-form payloads stay as [`serde_json::Value`]; the
//! resources the CLI renders get typed models.

use serde_json::Value;

use crate::api::{ApiClient, ApiError, ApiResult};

pub mod admin;
pub mod auth;
pub mod billing;
pub mod brackets;
pub mod leaderboard;
pub mod matches;
pub mod notifications;
pub mod organizations;
pub mod payments;
pub mod players;
pub mod schedules;
pub mod teams;
pub mod tournaments;
pub mod users;
pub mod venues;

pub use admin::Admin;
pub use auth::{Auth, AuthSession, User};
pub use billing::Billing;
pub use brackets::Brackets;
pub use leaderboard::{Leaderboard, RankEntry};
pub use matches::{
    MatchPlayer, MatchView, Matches, SetScore, Side, filter_by_status, normalize_status,
};
pub use notifications::Notifications;
pub use organizations::Organizations;
pub use payments::Payments;
pub use players::Players;
pub use schedules::Schedules;
pub use teams::Teams;
pub use tournaments::{Tournament, Tournaments, search_tournaments};
pub use users::Users;
pub use venues::Venues;

macro_rules! service_accessors {
    ($($(#[$doc:meta])* $name:ident => $ty:ident),* $(,)?) => {
        impl ApiClient {
            $(
                $(#[$doc])*
                pub fn $name(&self) -> $ty<'_> {
                    $ty { client: self }
                }
            )*
        }
    };
}

service_accessors! {
    /// Login, registration, profile, logout.
    auth => Auth,
    users => Users,
    /// Tournament lifecycle, entries and participant imports.
    tournaments => Tournaments,
    /// Match listing, scoring and result handling.
    matches => Matches,
    organizations => Organizations,
    players => Players,
    payments => Payments,
    /// Direct notifications, uploads, exports and webhooks.
    notifications => Notifications,
    teams => Teams,
    venues => Venues,
    brackets => Brackets,
    leaderboard => Leaderboard,
    /// Health probes, audit logs, privacy and maintenance controls.
    admin => Admin,
    billing => Billing,
    schedules => Schedules,
}

/// Fills in a per-operation message when the server sent none.
pub(crate) trait FallbackMessage<T> {
    fn or_message(self, fallback: &str) -> ApiResult<T>;
}

impl<T> FallbackMessage<T> for ApiResult<T> {
    fn or_message(self, fallback: &str) -> ApiResult<T> {
        self.map_err(|e: ApiError| e.or_message(fallback))
    }
}

/// Normalizes a list payload: a bare array, or an object carrying the rows
/// under one of the usual keys. Anything else is an empty list.
pub(crate) fn list_items(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut map) => ["items", "results", "rows", "data"]
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Deserializes a string, number or bool as `Option<String>`; null and other
/// shapes become `None`. Backend rows are not consistent about these.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_list_items_accepts_common_shapes() {
        assert_eq!(list_items(json!([1, 2])).len(), 2);
        assert_eq!(list_items(json!({"items": [1]})).len(), 1);
        assert_eq!(list_items(json!({"results": [1, 2, 3]})).len(), 3);
        assert!(list_items(json!({"count": 0})).is_empty());
        assert!(list_items(Value::Null).is_empty());
    }

    #[test]
    fn test_fallback_message_only_when_missing() {
        let err: ApiResult<()> = Err(ApiError::Status {
            status: 500,
            message: None,
        });
        let err = err.or_message("Failed to fetch tournaments").unwrap_err();
        assert_eq!(err.server_message(), Some("Failed to fetch tournaments"));

        let err: ApiResult<()> = Err(ApiError::Rejected {
            message: Some("Category full".to_string()),
        });
        let err = err.or_message("Registration failed").unwrap_err();
        assert_eq!(err.server_message(), Some("Category full"));
    }
}
