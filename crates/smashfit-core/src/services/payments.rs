use serde_json::Value;

use crate::api::{ApiClient, ApiResult, PendingRequest};

pub struct Payments<'a> {
    pub(super) client: &'a ApiClient,
}

impl Payments<'_> {
    /// Opens a checkout session with the payment provider.
    pub async fn create_checkout(&self, data: Value) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post("/payments/create-checkout").json_value(data))
            .await
    }

    pub async fn refund(&self, data: Value) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post("/payments/refund").json_value(data))
            .await
    }

    /// Marks an offline payment as received.
    pub async fn verify_manual(&self, data: Value) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post("/payments/verify").json_value(data))
            .await
    }

    pub async fn history(&self, params: &[(&str, &str)]) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::get("/payments/history").query(params))
            .await
    }
}
