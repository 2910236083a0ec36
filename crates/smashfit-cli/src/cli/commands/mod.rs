//! CLI command handlers.

use comfy_table::{ContentArrangement, Table};

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod leaderboard;
pub mod matches;
pub mod tournaments;
pub mod umpire;

/// A table with the shared look of every listing.
fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => "-",
    }
}
