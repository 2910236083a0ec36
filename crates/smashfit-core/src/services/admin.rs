//! Platform administration: health probes, audit, privacy, maintenance.

use serde_json::Value;

use crate::api::{ApiClient, ApiResult, PendingRequest};

pub struct Admin<'a> {
    pub(super) client: &'a ApiClient,
}

impl Admin<'_> {
    pub async fn health(&self) -> ApiResult<Value> {
        self.client.send_json(PendingRequest::get("/admin/health")).await
    }

    pub async fn readiness(&self) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::get("/health/readiness"))
            .await
    }

    pub async fn liveness(&self) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::get("/health/liveness"))
            .await
    }

    /// Rebuilds the search index.
    pub async fn reindex(&self) -> ApiResult<Value> {
        self.client.send_json(PendingRequest::post("/admin/reindex")).await
    }

    pub async fn audit_logs(&self, params: &[(&str, &str)]) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::get("/admin/audit-logs").query(params))
            .await
    }

    /// Everything stored about a user, as a downloadable archive.
    pub async fn export_privacy_data(&self, user_id: &str) -> ApiResult<Vec<u8>> {
        self.client
            .send_bytes(PendingRequest::get(format!("/privacy/export-user/{user_id}")))
            .await
    }

    pub async fn delete_privacy_data(&self, user_id: &str) -> ApiResult<Value> {
        tracing::info!(user_id, "requesting user data deletion");
        self.client
            .send_json(PendingRequest::delete(format!("/privacy/delete-user/{user_id}")))
            .await
    }

    pub async fn disputes(&self, params: &[(&str, &str)]) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::get("/admin/disputes").query(params))
            .await
    }

    pub async fn create_api_key(&self, data: Value) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post("/api-keys").json_value(data))
            .await
    }

    pub async fn list_api_keys(&self) -> ApiResult<Value> {
        self.client.send_json(PendingRequest::get("/api-keys")).await
    }

    pub async fn settings(&self) -> ApiResult<Value> {
        self.client.send_json(PendingRequest::get("/settings")).await
    }

    pub async fn start_maintenance(&self) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post("/admin/maintenance/start"))
            .await
    }

    pub async fn stop_maintenance(&self) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post("/admin/maintenance/stop"))
            .await
    }

    pub async fn search(&self, query: &str) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::get("/search").query(&[("q", query)]))
            .await
    }
}
