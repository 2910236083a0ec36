//! Coalesced access token refresh.
//!
//! Every request that hits a 401 funnels through one gate. The first one in
//! performs the refresh; the rest find the store already rotated and reuse
//! the new token. The store is written (or cleared) while the gate is held,
//! so a waiter never observes a half-finished refresh.

use std::future::Future;

use tokio::sync::Mutex;

use super::{ApiError, ApiResult};
use crate::session::TokenStore;

/// Outcome of waiting on the refresh gate.
#[derive(Debug)]
pub(crate) enum RefreshFailure {
    /// This request performed the refresh and it failed. The store is cleared.
    Failed(ApiError),
    /// The store was emptied while waiting (a concurrent refresh failed, or
    /// the user logged out).
    SessionCleared,
}

#[derive(Debug, Default)]
pub(crate) struct RefreshCoordinator {
    gate: Mutex<()>,
}

impl RefreshCoordinator {
    /// Returns a token newer than `stale`, refreshing at most once across all
    /// concurrent callers holding the same stale token.
    pub(crate) async fn renew<F, Fut>(
        &self,
        store: &dyn TokenStore,
        stale: &str,
        refresh: F,
    ) -> Result<String, RefreshFailure>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResult<String>>,
    {
        let _guard = self.gate.lock().await;

        match store.get() {
            None => return Err(RefreshFailure::SessionCleared),
            Some(current) if current != stale => {
                tracing::debug!("reusing token rotated by a concurrent refresh");
                return Ok(current);
            }
            Some(_) => {}
        }

        match refresh().await {
            Ok(token) => {
                store.set(&token).map_err(|e| {
                    tracing::warn!(error = %e, "failed to store refreshed token");
                    RefreshFailure::Failed(ApiError::Storage(e))
                })?;
                tracing::info!("access token refreshed");
                Ok(token)
            }
            Err(e) => {
                tracing::warn!(error = %e, "token refresh failed, clearing session");
                if let Err(clear_err) = store.clear() {
                    tracing::warn!(error = %clear_err, "failed to clear token store");
                }
                Err(RefreshFailure::Failed(e))
            }
        }
    }
}
