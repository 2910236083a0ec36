//! Rankings and dashboard analytics.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{FallbackMessage, lenient_string, list_items};
use crate::api::{ApiClient, ApiResult, PendingRequest, decode};

/// One row of a leaderboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankEntry {
    #[serde(default, alias = "player_id")]
    pub id: String,
    #[serde(default, alias = "fullName", alias = "name")]
    pub full_name: String,
    #[serde(default, alias = "rank")]
    pub global_rank: Option<u32>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub tier: Option<String>,
    #[serde(default)]
    pub points: f64,
    #[serde(default)]
    pub played: u32,
    #[serde(default)]
    pub won: u32,
    #[serde(default)]
    pub lost: u32,
    #[serde(default, deserialize_with = "lenient_string")]
    pub current_streak: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RankEntry {
    /// Case-insensitive name search.
    pub fn matches_query(&self, query: &str) -> bool {
        self.full_name.to_lowercase().contains(&query.to_lowercase())
    }
}

pub struct Leaderboard<'a> {
    pub(super) client: &'a ApiClient,
}

impl Leaderboard<'_> {
    pub async fn global(&self, params: &[(&str, &str)]) -> ApiResult<Vec<RankEntry>> {
        let payload = self
            .client
            .send_json(PendingRequest::get("/leaderboard/global").query(params))
            .await
            .or_message("Failed to fetch leaderboard")?;
        decode(Value::Array(list_items(payload)))
    }

    pub async fn tournament(
        &self,
        tournament_id: &str,
        params: &[(&str, &str)],
    ) -> ApiResult<Vec<RankEntry>> {
        let request =
            PendingRequest::get(format!("/tournaments/{tournament_id}/leaderboard")).query(params);
        let payload = self
            .client
            .send_json(request)
            .await
            .or_message("Failed to fetch tournament standings")?;
        decode(Value::Array(list_items(payload)))
    }

    pub async fn recalculate(&self) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post("/rankings/recalculate"))
            .await
    }

    pub async fn organization_dashboard(&self, org_id: &str) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::get(format!("/dashboard/organization/{org_id}")))
            .await
    }

    pub async fn tournament_dashboard(&self, tournament_id: &str) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::get(format!("/dashboard/tournament/{tournament_id}")))
            .await
    }

    pub async fn player_growth(&self) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::get("/analytics/players/growth"))
            .await
    }
}
