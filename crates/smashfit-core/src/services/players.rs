use serde_json::Value;

use crate::api::{ApiClient, ApiResult, PendingRequest};

pub struct Players<'a> {
    pub(super) client: &'a ApiClient,
}

impl Players<'_> {
    pub async fn create(&self, data: Value) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post("/players").json_value(data))
            .await
    }

    pub async fn search(&self, params: &[(&str, &str)]) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::get("/players").query(params))
            .await
    }

    pub async fn get(&self, player_id: &str) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::get(format!("/players/{player_id}")))
            .await
    }

    pub async fn update(&self, player_id: &str, data: Value) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::put(format!("/players/{player_id}")).json_value(data))
            .await
    }

    pub async fn tournaments(&self, player_id: &str) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::get(format!("/players/{player_id}/tournaments")))
            .await
    }

    /// Head-to-head record between two players.
    pub async fn head_to_head(&self, player_id: &str, other_id: &str) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::get(format!("/players/{player_id}/h2h/{other_id}")))
            .await
    }
}
