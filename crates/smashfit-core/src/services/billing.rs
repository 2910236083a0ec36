use serde_json::Value;

use crate::api::{ApiClient, ApiResult, PendingRequest};

pub struct Billing<'a> {
    pub(super) client: &'a ApiClient,
}

impl Billing<'_> {
    pub async fn organization(&self, org_id: &str) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::get(format!("/billing/organization/{org_id}")))
            .await
    }

    pub async fn plans(&self) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::get("/billing/plans"))
            .await
    }

    pub async fn manage_subscription(&self, data: Value) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post("/billing/subscriptions").json_value(data))
            .await
    }

    pub async fn payouts(&self, params: &[(&str, &str)]) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::get("/billing/payouts").query(params))
            .await
    }
}
