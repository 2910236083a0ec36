//! Umpire score pad commands.

use anyhow::{Context, Result};
use smashfit_core::format::format_players;
use smashfit_core::services::{Side, normalize_status};
use smashfit_core::{ApiClient, ScorePad};

pub async fn score(
    client: &ApiClient,
    match_id: &str,
    side: Side,
    delta: i32,
    set_number: Option<u32>,
) -> Result<()> {
    let view = client
        .matches()
        .get(match_id)
        .await
        .with_context(|| format!("load match '{match_id}'"))?;

    let mut pad = match set_number {
        Some(set) => ScorePad::at_set(&view, set),
        None => ScorePad::from_match(&view),
    };

    let update = pad.adjust(side, delta);
    tracing::info!(match_id, set = update.set_number, delta, "sending score update");

    if let Err(e) = client.matches().update_score(match_id, &update).await {
        pad.revert();
        let (a, b) = pad.scores();
        eprintln!("Score not saved; still {a} - {b}");
        return Err(e).context("update score");
    }

    println!(
        "Set {}: {} {} - {} {}",
        update.set_number,
        format_players(&view.side_a_players),
        update.side_a_score,
        update.side_b_score,
        format_players(&view.side_b_players)
    );
    Ok(())
}

pub async fn status(client: &ApiClient, match_id: &str, status: &str) -> Result<()> {
    let status = normalize_status(status.trim());
    if status.is_empty() {
        anyhow::bail!("Status cannot be empty");
    }
    client
        .matches()
        .update_status(match_id, &status)
        .await
        .with_context(|| format!("update status of '{match_id}'"))?;
    println!("✓ Match {match_id} is now {status}");
    Ok(())
}
