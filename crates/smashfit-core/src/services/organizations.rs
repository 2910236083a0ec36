use serde_json::Value;

use super::FallbackMessage;
use crate::api::{ApiClient, ApiResult, PendingRequest};

const ROUTE: &str = "/organizations";

pub struct Organizations<'a> {
    pub(super) client: &'a ApiClient,
}

impl Organizations<'_> {
    pub async fn list(&self) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::get(format!("{ROUTE}/")))
            .await
            .or_message("Failed to fetch organizations")
    }

    pub async fn get(&self, id: &str) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::get(format!("{ROUTE}/{id}")))
            .await
            .or_message("Failed to fetch organization details")
    }

    pub async fn create(&self, data: Value) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post(format!("{ROUTE}/")).json_value(data))
            .await
            .or_message("Failed to create organization")
    }

    pub async fn update(&self, id: &str, data: Value) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::put(format!("{ROUTE}/{id}")).json_value(data))
            .await
            .or_message("Failed to update organization")
    }

    pub async fn delete(&self, id: &str) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::delete(format!("{ROUTE}/{id}")))
            .await
            .or_message("Failed to delete organization")
    }

    pub async fn invite_member(&self, id: &str, data: Value) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post(format!("{ROUTE}/{id}/invite")).json_value(data))
            .await
    }

    pub async fn accept_invite(&self, id: &str, data: Value) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post(format!("{ROUTE}/{id}/accept-invite")).json_value(data))
            .await
    }

    pub async fn manage_roles(&self, id: &str, data: Value) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post(format!("{ROUTE}/{id}/roles")).json_value(data))
            .await
    }

    pub async fn create_voucher(&self, id: &str, data: Value) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post(format!("{ROUTE}/{id}/vouchers")).json_value(data))
            .await
    }

    pub async fn members(&self, id: &str) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::get(format!("{ROUTE}/{id}/members")))
            .await
    }
}
