//! Match command handlers.

use anyhow::{Context, Result};
use smashfit_core::format::{format_date, format_players, format_time};
use smashfit_core::services::{MatchView, Side, filter_by_status};
use smashfit_core::{ApiClient, OptionalExt};

use super::{or_dash, table};

pub async fn list(client: &ApiClient, status: Option<&str>, tournament: Option<&str>) -> Result<()> {
    let matches = match tournament {
        Some(id) => client.matches().for_tournament(id).await,
        None => client.matches().list(&[]).await,
    }
    .context("list matches")?;

    let shown: Vec<&MatchView> = match status {
        Some(tab) => filter_by_status(&matches, tab),
        None => matches.iter().collect(),
    };

    if shown.is_empty() {
        println!("No matches found.");
        return Ok(());
    }

    let mut table = table(&["ID", "Round", "Side A", "Side B", "Score", "Status", "When"]);
    for m in shown {
        table.add_row(vec![
            m.id.clone(),
            or_dash(Some(m.round_name.as_str())).to_string(),
            format_players(&m.side_a_players),
            format_players(&m.side_b_players),
            or_dash(m.final_score.as_deref()).to_string(),
            or_dash(m.status.as_deref()).to_string(),
            when(m),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn show(client: &ApiClient, id: &str) -> Result<()> {
    let Some(m) = client
        .matches()
        .get(id)
        .await
        .optional()
        .with_context(|| format!("load match '{id}'"))?
    else {
        println!("Match '{id}' not found.");
        return Ok(());
    };

    let side_a = format_players(&m.side_a_players);
    let side_b = format_players(&m.side_b_players);
    println!("{side_a} vs {side_b}");
    println!("  Status:     {}", or_dash(m.status.as_deref()));
    println!("  Round:      {}", or_dash(Some(m.round_name.as_str())));
    println!("  Tournament: {}", or_dash(m.tournament_name.as_deref()));
    println!("  Court:      {}", or_dash(m.court_name.as_deref()));
    println!("  When:       {}", when(&m));

    if !m.scores.is_empty() {
        let mut table = table(&["Set", side_a.as_str(), side_b.as_str()]);
        for (idx, set) in m.scores.iter().enumerate() {
            let number = set.set_number.unwrap_or(idx as u32 + 1);
            table.add_row(vec![
                number.to_string(),
                set.side_a_score.to_string(),
                set.side_b_score.to_string(),
            ]);
        }
        println!("{table}");
    }

    if let Some(winner) = m.winner_side {
        let name = match winner {
            Side::SideA => side_a,
            Side::SideB => side_b,
        };
        println!("Winner: {name}");
    }
    Ok(())
}

fn when(m: &MatchView) -> String {
    match m.scheduled_at.as_deref() {
        Some(at) => format!("{} {}", format_date(at), format_time(at)),
        None => "TBD".to_string(),
    }
}
