//! Leaderboard command handler.

use anyhow::{Context, Result};
use smashfit_core::ApiClient;

use super::{or_dash, table};

pub async fn show(client: &ApiClient, tournament: Option<&str>, search: Option<&str>) -> Result<()> {
    let rows = match tournament {
        Some(id) => client
            .leaderboard()
            .tournament(id, &[])
            .await
            .with_context(|| format!("load standings for '{id}'"))?,
        None => client
            .leaderboard()
            .global(&[])
            .await
            .context("load global leaderboard")?,
    };

    let query = search.unwrap_or_default();
    let rows: Vec<_> = rows.iter().filter(|r| r.matches_query(query)).collect();
    if rows.is_empty() {
        println!("No players found.");
        return Ok(());
    }

    let mut table = table(&["#", "Player", "Tier", "Points", "Played", "Lost", "Streak"]);
    for (idx, row) in rows.iter().enumerate() {
        let rank = row.global_rank.unwrap_or(idx as u32 + 1);
        table.add_row(vec![
            rank.to_string(),
            row.full_name.clone(),
            or_dash(row.tier.as_deref()).to_string(),
            row.points.to_string(),
            row.played.to_string(),
            row.lost.to_string(),
            or_dash(row.current_streak.as_deref()).to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}
