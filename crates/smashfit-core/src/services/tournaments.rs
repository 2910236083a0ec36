//! Tournament lifecycle: creation, listing, registration, entries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::matches::MatchView;
use super::{FallbackMessage, lenient_string, list_items};
use crate::api::{ApiClient, ApiResult, FilePart, PendingRequest, decode};

const ROUTE: &str = "/tournaments";

/// A tournament as listed in the feed and shown on the detail page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, alias = "start", alias = "startDate")]
    pub start_date: Option<String>,
    #[serde(default, alias = "endDate")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "banner")]
    pub banner_url: Option<String>,
    #[serde(default)]
    pub organization_name: Option<String>,
    #[serde(default)]
    pub tournament_type: Option<String>,
    #[serde(default)]
    pub registration_deadline: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub prize: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub participants: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Tournament {
    /// Short badge text for the tournament status.
    pub fn status_label(&self) -> String {
        let status = self.status.as_deref().unwrap_or_default();
        match status.to_ascii_uppercase().as_str() {
            "LIVE" | "ONGOING" => "Live Now".to_string(),
            "REGISTRATION_OPEN" => "Registering".to_string(),
            "COMPLETED" => "Completed".to_string(),
            _ => status.to_string(),
        }
    }

    /// Case-insensitive match on name or location.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self
                .location
                .as_deref()
                .is_some_and(|l| l.to_lowercase().contains(&query))
    }
}

/// Tournaments whose name or location contains `query`.
pub fn search_tournaments<'a>(tournaments: &'a [Tournament], query: &str) -> Vec<&'a Tournament> {
    tournaments.iter().filter(|t| t.matches_query(query)).collect()
}

pub struct Tournaments<'a> {
    pub(super) client: &'a ApiClient,
}

impl Tournaments<'_> {
    pub async fn create(&self, data: Value) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post(format!("{ROUTE}/")).json_value(data))
            .await
            .or_message("Failed to create tournament")
    }

    /// The tournament feed.
    pub async fn list(&self) -> ApiResult<Vec<Tournament>> {
        let payload = self
            .client
            .send_json(PendingRequest::get(format!("{ROUTE}/")))
            .await
            .or_message("Failed to fetch tournaments")?;
        decode(Value::Array(list_items(payload)))
    }

    pub async fn get(&self, id: &str) -> ApiResult<Tournament> {
        self.client
            .send(PendingRequest::get(format!("{ROUTE}/{id}")))
            .await
            .or_message("Failed to fetch tournament details")
    }

    /// Registers the current user for a tournament category.
    pub async fn register(&self, category_id: &str) -> ApiResult<Value> {
        let request = PendingRequest::post(format!("{ROUTE}/register"))
            .json_value(json!({ "category_id": category_id }));
        self.client
            .send_json(request)
            .await
            .or_message("Registration failed")
    }

    pub async fn publish(&self, id: &str) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post(format!("{ROUTE}/{id}/publish")))
            .await
    }

    /// Copies a tournament as a template.
    pub async fn clone(&self, id: &str) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post(format!("{ROUTE}/{id}/clone")))
            .await
    }

    pub async fn cancel_registration(&self, id: &str, data: Option<Value>) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post(format!("{ROUTE}/{id}/cancel-registration")).maybe_json(data))
            .await
    }

    pub async fn check_in(&self, id: &str, data: Value) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post(format!("{ROUTE}/{id}/check-in")).json_value(data))
            .await
    }

    pub async fn submit_waiver(&self, id: &str, data: Value) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post(format!("{ROUTE}/{id}/waivers")).json_value(data))
            .await
    }

    pub async fn entries(&self, id: &str) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::get(format!("{ROUTE}/{id}/entries")))
            .await
    }

    pub async fn waitlist(&self, id: &str) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::get(format!("{ROUTE}/{id}/waitlist")))
            .await
    }

    /// Bulk participant import from a CSV or Excel sheet.
    pub async fn import_participants(&self, id: &str, file: FilePart) -> ApiResult<Value> {
        tracing::info!(tournament_id = id, file = %file.file_name, "importing participants");
        let request = PendingRequest::post(format!("{ROUTE}/{id}/import/participants"))
            .multipart(vec![file], Vec::new());
        self.client.send_json(request).await
    }

    /// Records shuttlecock usage.
    pub async fn manage_shuttles(&self, id: &str, data: Value) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post(format!("{ROUTE}/{id}/shuttles")).json_value(data))
            .await
    }

    pub async fn update(&self, id: &str, data: Value) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::put(format!("{ROUTE}/{id}")).json_value(data))
            .await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::delete(format!("{ROUTE}/{id}")))
            .await
    }

    /// Matches of one tournament, normalized.
    pub async fn matches(&self, id: &str) -> ApiResult<Vec<MatchView>> {
        let payload = self
            .client
            .send_json(PendingRequest::get(format!("{ROUTE}/{id}/matches")))
            .await?;
        Ok(list_items(payload).into_iter().map(MatchView::from_row).collect())
    }
}
