//! Matches: listing, live scoring and result handling.
//!
//! The backend returns flat rows (`player1_id`, `player1_score`, ...). They
//! are normalized into [`MatchView`] with two sides and a set list, the shape
//! every screen renders.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::{FallbackMessage, list_items};
use crate::api::{ApiClient, ApiError, ApiResult, PendingRequest};
use crate::scorepad::ScoreUpdate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "Side_A")]
    SideA,
    #[serde(rename = "Side_B")]
    SideB,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPlayer {
    #[serde(default)]
    pub id: String,
    #[serde(default, alias = "full_name")]
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Score of one set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetScore {
    #[serde(default)]
    pub set_number: Option<u32>,
    #[serde(default)]
    pub side_a_score: u32,
    #[serde(default)]
    pub side_b_score: u32,
}

/// A match normalized for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchView {
    pub id: String,
    pub tournament_id: Option<String>,
    pub tournament_name: Option<String>,
    pub category: Option<String>,
    pub court_name: Option<String>,
    pub scheduled_at: Option<String>,
    pub match_number: Option<String>,
    pub side_a_players: Vec<MatchPlayer>,
    pub side_b_players: Vec<MatchPlayer>,
    pub scores: Vec<SetScore>,
    pub winner_side: Option<Side>,
    pub round_name: String,
    pub status: Option<String>,
    pub final_score: Option<String>,
    /// Every field of the backend row, as received.
    pub raw: Map<String, Value>,
}

impl MatchView {
    /// Normalizes one backend row. Non-object rows yield an empty view.
    pub fn from_row(row: Value) -> Self {
        let Value::Object(raw) = row else {
            return Self::default();
        };

        let p1_id = text(&raw, "player1_id");
        let p2_id = text(&raw, "player2_id");
        let p1_score = raw.get("player1_score").filter(|v| !v.is_null());

        let side_a_players = match &p1_id {
            Some(id) => vec![flat_player(&raw, id, "player1", "Player 1")],
            None => nested(&raw, "side_a_players"),
        };
        let side_b_players = match &p2_id {
            Some(id) => vec![flat_player(&raw, id, "player2", "Player 2")],
            None => nested(&raw, "side_b_players"),
        };

        let (scores, final_score) = match p1_score {
            Some(p1) => {
                let p2 = raw.get("player2_score").unwrap_or(&Value::Null);
                let set = SetScore {
                    set_number: None,
                    side_a_score: score_value(p1),
                    side_b_score: score_value(p2),
                };
                (vec![set], Some(format!("{} - {}", display(p1), display(p2))))
            }
            None => (nested(&raw, "scores"), text(&raw, "final_score")),
        };

        let winner_side = match text(&raw, "winner_id") {
            // Any winner that is not player 1 is side B, even without a player 1 id.
            Some(winner) if p1_id.as_deref() == Some(winner.as_str()) => Some(Side::SideA),
            Some(_) => Some(Side::SideB),
            None => raw
                .get("winner_side")
                .cloned()
                .and_then(|v| serde_json::from_value(v).ok()),
        };

        let round_name = text(&raw, "round_name")
            .or_else(|| text(&raw, "round"))
            .unwrap_or_default();

        Self {
            id: text(&raw, "id").or_else(|| text(&raw, "_id")).unwrap_or_default(),
            tournament_id: text(&raw, "tournament_id"),
            tournament_name: text(&raw, "tournament_name"),
            category: text(&raw, "category"),
            court_name: text(&raw, "court_name").or_else(|| text(&raw, "court_number")),
            scheduled_at: text(&raw, "scheduled_at"),
            match_number: text(&raw, "match_number"),
            side_a_players,
            side_b_players,
            scores,
            winner_side,
            round_name,
            status: text(&raw, "status").map(|s| normalize_status(&s)),
            final_score,
            raw,
        }
    }

    /// The most recent set, if any has been played.
    pub fn last_set(&self) -> Option<&SetScore> {
        self.scores.last()
    }
}

/// `LIVE` → `Live`, `scheduled` → `Scheduled`.
pub fn normalize_status(status: &str) -> String {
    let mut chars = status.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Matches whose normalized status equals the normalized `tab`.
pub fn filter_by_status<'a>(matches: &'a [MatchView], tab: &str) -> Vec<&'a MatchView> {
    let tab = normalize_status(tab);
    matches
        .iter()
        .filter(|m| m.status.as_deref() == Some(tab.as_str()))
        .collect()
}

fn text(row: &Map<String, Value>, key: &str) -> Option<String> {
    match row.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn flat_player(row: &Map<String, Value>, id: &str, prefix: &str, default_name: &str) -> MatchPlayer {
    MatchPlayer {
        id: id.to_string(),
        name: text(row, &format!("{prefix}_name")).unwrap_or_else(|| default_name.to_string()),
        avatar_url: text(row, &format!("{prefix}_avatar")),
    }
}

fn nested<T: serde::de::DeserializeOwned>(row: &Map<String, Value>, key: &str) -> Vec<T> {
    row.get(key)
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}

fn score_value(value: &Value) -> u32 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

pub struct Matches<'a> {
    pub(super) client: &'a ApiClient,
}

impl Matches<'_> {
    /// All matches, optionally filtered server-side (`status`, `tournament_id`, ...).
    pub async fn list(&self, params: &[(&str, &str)]) -> ApiResult<Vec<MatchView>> {
        let payload = self
            .client
            .send_json(PendingRequest::get("/matches").query(params))
            .await
            .or_message("Failed to fetch matches")?;
        Ok(list_items(payload).into_iter().map(MatchView::from_row).collect())
    }

    pub async fn for_tournament(&self, tournament_id: &str) -> ApiResult<Vec<MatchView>> {
        self.client.tournaments().matches(tournament_id).await
    }

    pub async fn get(&self, match_id: &str) -> ApiResult<MatchView> {
        let payload = self
            .client
            .send_json(PendingRequest::get(format!("/matches/{match_id}")))
            .await
            .or_message("Failed to fetch match")?;
        if !payload.is_object() {
            return Err(ApiError::Decode(format!("match {match_id}: unexpected payload")));
        }
        Ok(MatchView::from_row(payload))
    }

    /// Generates bracket matches for a tournament.
    pub async fn generate(&self, tournament_id: &str, data: Option<Value>) -> ApiResult<Value> {
        let request = PendingRequest::post(format!("/tournaments/{tournament_id}/matches/generate"))
            .maybe_json(data);
        self.client.send_json(request).await
    }

    pub async fn update_metadata(&self, match_id: &str, data: Value) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::put(format!("/matches/{match_id}")).json_value(data))
            .await
    }

    pub async fn update_score(&self, match_id: &str, score: &ScoreUpdate) -> ApiResult<Value> {
        let request = PendingRequest::patch(format!("/matches/{match_id}/score")).json(score)?;
        self.client
            .send_json(request)
            .await
            .or_message("Score update failed")
    }

    pub async fn update_status(&self, match_id: &str, status: &str) -> ApiResult<Value> {
        let request = PendingRequest::patch(format!("/matches/{match_id}/status"))
            .json_value(json!({ "status": status }));
        self.client
            .send_json(request)
            .await
            .or_message("Status update failed")
    }

    pub async fn confirm_result(&self, match_id: &str) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post(format!("/matches/{match_id}/confirm-result")))
            .await
    }

    pub async fn assign_umpire(&self, match_id: &str, data: Value) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post(format!("/matches/{match_id}/assign-umpire")).json_value(data))
            .await
    }

    pub async fn dispute(&self, match_id: &str, data: Value) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post(format!("/matches/{match_id}/dispute")).json_value(data))
            .await
    }

    pub async fn resolve_dispute(&self, match_id: &str, data: Value) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post(format!("/matches/{match_id}/resolve-dispute")).json_value(data))
            .await
    }

    pub async fn cancel(&self, match_id: &str) -> ApiResult<Value> {
        self.client
            .send_json(PendingRequest::post(format!("/matches/{match_id}/cancel")))
            .await
    }
}
