//! HTTP plumbing: request pipeline, refresh coordinator, envelope handling.

mod client;
mod envelope;
mod error;
mod refresh;
mod request;

pub use client::{ApiClient, ApiClientBuilder, USER_AGENT};
pub use envelope::{decode, unwrap_envelope};
pub use error::{ApiError, ApiResult, OptionalExt};
pub use request::{AuthPolicy, FilePart, PendingRequest, REFRESH_PATH, RequestBody};
