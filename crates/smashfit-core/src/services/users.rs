use serde_json::{Value, json};

use super::FallbackMessage;
use super::auth::User;
use crate::api::{ApiClient, ApiResult, PendingRequest};

pub struct Users<'a> {
    pub(super) client: &'a ApiClient,
}

impl Users<'_> {
    pub async fn me(&self) -> ApiResult<User> {
        self.client
            .send(PendingRequest::get("/users/me"))
            .await
            .or_message("Failed to fetch user")
    }

    pub async fn get(&self, id: &str) -> ApiResult<User> {
        self.client
            .send(PendingRequest::get(format!("/users/{id}")))
            .await
            .or_message("Failed to fetch user")
    }

    pub async fn update_profile(&self, id: &str, data: Value) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::put(format!("/users/{id}")).json_value(data))
            .await
    }

    pub async fn list(&self, params: &[(&str, &str)]) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::get("/users").query(params))
            .await
    }

    pub async fn assign_roles(&self, id: &str, roles: &[String]) -> ApiResult<Value> {
        self.client
            .send_json(
                PendingRequest::post(format!("/users/{id}/roles"))
                    .json_value(json!({ "roles": roles })),
            )
            .await
    }

    pub async fn activity(&self, id: &str) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::get(format!("/users/{id}/activity")))
            .await
    }

    pub async fn notifications(&self, id: &str) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::get(format!("/users/{id}/notifications")))
            .await
    }

    pub async fn update_settings(&self, id: &str, settings: Value) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::put(format!("/users/{id}/settings")).json_value(settings))
            .await
    }
}
