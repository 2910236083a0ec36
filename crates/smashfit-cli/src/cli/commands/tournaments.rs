//! Tournament command handlers.

use anyhow::{Context, Result};
use smashfit_core::format::{format_date, format_players};
use smashfit_core::services::search_tournaments;
use smashfit_core::{ApiClient, OptionalExt};

use super::{or_dash, table};

pub async fn list(client: &ApiClient, search: Option<&str>) -> Result<()> {
    let tournaments = client
        .tournaments()
        .list()
        .await
        .context("list tournaments")?;
    let shown = search_tournaments(&tournaments, search.unwrap_or_default());

    if shown.is_empty() {
        println!("No tournaments found.");
        return Ok(());
    }

    let mut table = table(&["ID", "Name", "Location", "Starts", "Status"]);
    for t in shown {
        table.add_row(vec![
            t.id.clone(),
            t.name.clone(),
            or_dash(t.location.as_deref()).to_string(),
            format_date(t.start_date.as_deref().unwrap_or_default()),
            t.status_label(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn show(client: &ApiClient, id: &str) -> Result<()> {
    let Some(t) = client
        .tournaments()
        .get(id)
        .await
        .optional()
        .with_context(|| format!("load tournament '{id}'"))?
    else {
        println!("Tournament '{id}' not found.");
        return Ok(());
    };

    println!("{}", t.name);
    println!("  Status:     {}", or_dash(Some(t.status_label().as_str())));
    println!("  Location:   {}", or_dash(t.location.as_deref()));
    println!(
        "  Dates:      {} → {}",
        format_date(t.start_date.as_deref().unwrap_or_default()),
        format_date(t.end_date.as_deref().unwrap_or_default())
    );
    if let Some(deadline) = t.registration_deadline.as_deref() {
        println!("  Register by: {}", format_date(deadline));
    }
    println!("  Organizer:  {}", or_dash(t.organization_name.as_deref()));
    println!("  Type:       {}", or_dash(t.tournament_type.as_deref()));
    println!("  Prize:      {}", or_dash(t.prize.as_deref()));
    println!("  Players:    {}", or_dash(t.participants.as_deref()));

    // Matches are extra detail; the tournament itself is already shown.
    match client.tournaments().matches(id).await {
        Ok(matches) if !matches.is_empty() => {
            println!();
            let mut table = table(&["Round", "Side A", "Side B", "Score", "Status"]);
            for m in &matches {
                table.add_row(vec![
                    or_dash(Some(m.round_name.as_str())).to_string(),
                    format_players(&m.side_a_players),
                    format_players(&m.side_b_players),
                    or_dash(m.final_score.as_deref()).to_string(),
                    or_dash(m.status.as_deref()).to_string(),
                ]);
            }
            println!("{table}");
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(tournament_id = id, error = %e, "failed to load tournament matches"),
    }
    Ok(())
}
