//! Draws and seeding. Generation and seeding logic live on the backend.

use serde_json::Value;

use crate::api::{ApiClient, ApiResult, PendingRequest};

pub struct Brackets<'a> {
    pub(super) client: &'a ApiClient,
}

impl Brackets<'_> {
    pub async fn visual_data(&self, tournament_id: &str) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::get(format!("/tournaments/{tournament_id}/brackets")))
            .await
    }

    pub async fn generate(&self, tournament_id: &str, data: Option<Value>) -> ApiResult<Value> {
        let request = PendingRequest::post(format!("/tournaments/{tournament_id}/brackets/generate"))
            .maybe_json(data);
        self.client.send_json(request).await
    }

    pub async fn advance_player(
        &self,
        tournament_id: &str,
        bracket_id: &str,
        data: Value,
    ) -> ApiResult<Value> {
        let request = PendingRequest::post(format!(
            "/tournaments/{tournament_id}/brackets/{bracket_id}/advance"
        ))
        .json_value(data);
        self.client.send_json(request).await
    }

    pub async fn auto_seed(&self, tournament_id: &str) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post(format!("/tournaments/{tournament_id}/seeding/auto")))
            .await
    }

    pub async fn apply_manual_seeds(&self, tournament_id: &str, data: Value) -> ApiResult<Value> {
        self.client
            .send_json(
                PendingRequest::post(format!("/tournaments/{tournament_id}/seeding/manual"))
                    .json_value(data),
            )
            .await
    }

    pub async fn seeding_status(&self, tournament_id: &str) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::get(format!("/tournaments/{tournament_id}/seeding/status")))
            .await
    }

    /// Shuffles the draw.
    pub async fn randomize_draw(&self, tournament_id: &str) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post(format!("/tournaments/{tournament_id}/draws/shuffle")))
            .await
    }
}
