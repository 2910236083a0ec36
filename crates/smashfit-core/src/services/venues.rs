use serde_json::Value;

use crate::api::{ApiClient, ApiResult, PendingRequest};

pub struct Venues<'a> {
    pub(super) client: &'a ApiClient,
}

impl Venues<'_> {
    pub async fn add(&self, data: Value) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post("/venues").json_value(data))
            .await
    }

    pub async fn get(&self, venue_id: &str) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::get(format!("/venues/{venue_id}")))
            .await
    }

    pub async fn define_courts(&self, tournament_id: &str, data: Value) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post(format!("/tournaments/{tournament_id}/courts")).json_value(data))
            .await
    }

    /// Live/available/maintenance state of each court.
    pub async fn court_occupancy(&self, tournament_id: &str) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::get(format!("/tournaments/{tournament_id}/court-occupancy")))
            .await
    }
}
