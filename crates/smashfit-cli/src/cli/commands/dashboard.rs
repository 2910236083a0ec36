//! Dashboard: three independent widgets fetched concurrently.

use anyhow::Result;
use smashfit_core::format::{format_date, format_players};
use smashfit_core::services::filter_by_status;
use smashfit_core::{ApiClient, ApiResult, SessionState};

use super::{or_dash, table};

const TOP_PLAYERS: usize = 5;
const UPCOMING: usize = 5;

pub async fn show(client: &ApiClient) -> Result<()> {
    let (tournament_api, match_api, leaderboard_api) =
        (client.tournaments(), client.matches(), client.leaderboard());
    let (tournaments, matches, leaders) = tokio::join!(
        tournament_api.list(),
        match_api.list(&[]),
        leaderboard_api.global(&[]),
    );

    // Widgets degrade to an empty state on their own, but an expired session
    // fails them all.
    if client.session_state() == SessionState::LoginRequired {
        anyhow::bail!("Could not load the dashboard");
    }

    let tournaments = or_empty("tournaments", tournaments);
    let matches = or_empty("matches", matches);
    let leaders = or_empty("leaderboard", leaders);

    println!("Upcoming tournaments");
    if tournaments.is_empty() {
        println!("  No tournaments yet.");
    } else {
        let mut table = table(&["Name", "Location", "Starts", "Status"]);
        for t in tournaments.iter().take(UPCOMING) {
            table.add_row(vec![
                t.name.clone(),
                or_dash(t.location.as_deref()).to_string(),
                format_date(t.start_date.as_deref().unwrap_or_default()),
                t.status_label(),
            ]);
        }
        println!("{table}");
    }

    println!();
    println!("Live matches");
    let live = filter_by_status(&matches, "Live");
    if live.is_empty() {
        println!("  No live matches.");
    } else {
        let mut table = table(&["Side A", "Side B", "Score", "Court"]);
        for m in live {
            table.add_row(vec![
                format_players(&m.side_a_players),
                format_players(&m.side_b_players),
                or_dash(m.final_score.as_deref()).to_string(),
                or_dash(m.court_name.as_deref()).to_string(),
            ]);
        }
        println!("{table}");
    }

    println!();
    println!("Top players");
    if leaders.is_empty() {
        println!("  No rankings yet.");
    } else {
        let mut table = table(&["#", "Player", "Points"]);
        for (idx, row) in leaders.iter().take(TOP_PLAYERS).enumerate() {
            table.add_row(vec![
                row.global_rank.unwrap_or(idx as u32 + 1).to_string(),
                row.full_name.clone(),
                row.points.to_string(),
            ]);
        }
        println!("{table}");
    }
    Ok(())
}

fn or_empty<T>(widget: &str, result: ApiResult<Vec<T>>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!(widget, error = %e, "dashboard widget failed to load");
        Vec::new()
    })
}
