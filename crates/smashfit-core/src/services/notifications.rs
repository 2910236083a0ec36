//! Notifications, file uploads, exports and webhooks.

use serde_json::Value;

use crate::api::{ApiClient, ApiResult, FilePart, PendingRequest};

pub struct Notifications<'a> {
    pub(super) client: &'a ApiClient,
}

impl Notifications<'_> {
    pub async fn send_direct(&self, data: Value) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post("/notifications/send").json_value(data))
            .await
    }

    /// Notifies every registered player of a tournament.
    pub async fn bulk_notify_players(&self, tournament_id: &str, data: Value) -> ApiResult<Value> {
        let request = PendingRequest::post(format!("/tournaments/{tournament_id}/notify-players"))
            .json_value(data);
        self.client.send_json(request).await
    }

    pub async fn upload_file(
        &self,
        file: FilePart,
        fields: Vec<(String, String)>,
    ) -> ApiResult<Value> {
        tracing::debug!(file = %file.file_name, size = file.bytes.len(), "uploading file");
        self.client
            .send_json(PendingRequest::post("/uploads").multipart(vec![file], fields))
            .await
    }

    pub async fn delete_file(&self, upload_id: &str) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::delete(format!("/uploads/{upload_id}")))
            .await
    }

    /// Tournament entries as CSV.
    pub async fn export_csv(&self, tournament_id: &str) -> ApiResult<Vec<u8>> {
        self.client
            .send_bytes(PendingRequest::get(format!("/tournaments/{tournament_id}/export/csv")))
            .await
    }

    pub async fn report(&self, tournament_id: &str) -> ApiResult<Vec<u8>> {
        self.client
            .send_bytes(PendingRequest::get(format!("/tournaments/{tournament_id}/report")))
            .await
    }

    pub async fn register_webhook(&self, data: Value) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post("/webhooks").json_value(data))
            .await
    }

    pub async fn webhook_logs(&self, webhook_id: &str) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::get(format!("/webhooks/{webhook_id}/logs")))
            .await
    }

    pub async fn manage_sponsors(&self, tournament_id: &str, data: Value) -> ApiResult<Value> {
        self.client
            .send_json(
                PendingRequest::post(format!("/tournaments/{tournament_id}/sponsors"))
                    .json_value(data),
            )
            .await
    }
}
