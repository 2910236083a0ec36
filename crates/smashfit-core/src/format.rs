//! Display helpers shared by the CLI views.
//!
//! Timestamps are shown in the offset they were sent with.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::services::MatchPlayer;

const PLACEHOLDER: &str = "TBD";

/// `"Lin / Chen"`, or `"TBD"` for an empty side.
pub fn format_players(players: &[MatchPlayer]) -> String {
    let names: Vec<&str> = players
        .iter()
        .map(|p| p.name.trim())
        .filter(|n| !n.is_empty())
        .collect();
    if names.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        names.join(" / ")
    }
}

/// `"7 Mar"`.
pub fn format_date(value: &str) -> String {
    match parse(value) {
        Some(Parsed::DateTime(dt)) => dt.format("%-d %b").to_string(),
        Some(Parsed::Date(d)) => d.format("%-d %b").to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

/// `"14:05"`. Date-only values have no time to show.
pub fn format_time(value: &str) -> String {
    match parse(value) {
        Some(Parsed::DateTime(dt)) => dt.format("%H:%M").to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

enum Parsed {
    DateTime(NaiveDateTime),
    Date(NaiveDate),
}

fn parse(value: &str) -> Option<Parsed> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(Parsed::DateTime(dt.naive_local()));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, pattern) {
            return Some(Parsed::DateTime(dt));
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(Parsed::Date)
}
