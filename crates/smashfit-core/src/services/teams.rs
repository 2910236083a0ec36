use serde_json::Value;

use crate::api::{ApiClient, ApiResult, PendingRequest};

pub struct Teams<'a> {
    pub(super) client: &'a ApiClient,
}

impl Teams<'_> {
    pub async fn create(&self, data: Value) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post("/teams").json_value(data))
            .await
    }

    pub async fn manage_roster(&self, team_id: &str, data: Value) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post(format!("/teams/{team_id}/members")).json_value(data))
            .await
    }
}
