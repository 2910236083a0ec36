use serde_json::Value;

use crate::api::{ApiClient, ApiResult, PendingRequest};

pub struct Schedules<'a> {
    pub(super) client: &'a ApiClient,
}

impl Schedules<'_> {
    /// Lets the backend place matches on courts and time slots.
    pub async fn auto_assign(&self, tournament_id: &str, data: Option<Value>) -> ApiResult<Value> {
        let request = PendingRequest::post(format!("/tournaments/{tournament_id}/schedule/auto"))
            .maybe_json(data);
        self.client.send_json(request).await
    }

    pub async fn slot(&self, schedule_id: &str) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::get(format!("/schedules/{schedule_id}")))
            .await
    }
}
