//! Core SmashFit client library (session, API client, services, config).

pub mod api;
pub mod config;
pub mod format;
pub mod logging;
pub mod scorepad;
pub mod services;
pub mod session;

pub use api::{ApiClient, ApiError, ApiResult, OptionalExt};
pub use scorepad::{ScorePad, ScoreUpdate};
pub use session::{SessionState, TokenStore};
