//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use smashfit_core::services::Side;
use smashfit_core::{ApiClient, SessionState, config, logging};

mod commands;

#[derive(Parser)]
#[command(name = "smashfit")]
#[command(version)]
#[command(about = "SmashFit badminton tournament client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    #[command(flatten)]
    Api(ApiCommands),

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Commands that talk to the backend.
#[derive(clap::Subcommand)]
enum ApiCommands {
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,
        /// Prompted for when omitted
        #[arg(long, env = "SMASHFIT_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Log out and forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,

    /// Browse tournaments
    Tournaments {
        #[command(subcommand)]
        command: TournamentCommands,
    },
    /// Browse matches
    Matches {
        #[command(subcommand)]
        command: MatchCommands,
    },
    /// Show the global or a tournament leaderboard
    Leaderboard {
        /// Tournament standings instead of global rankings
        #[arg(long, value_name = "TOURNAMENT_ID")]
        tournament: Option<String>,
        /// Filter players by name
        #[arg(long)]
        search: Option<String>,
    },
    /// Tournaments, live matches and top players at a glance
    Dashboard,

    /// Umpire: change a side's score in the current set
    Score {
        #[arg(value_name = "MATCH_ID")]
        match_id: String,
        #[arg(long, value_enum)]
        side: SideArg,
        /// Points to add (negative to correct)
        #[arg(long, allow_negative_numbers = true, default_value_t = 1)]
        delta: i32,
        /// Score this set instead of the match's latest
        #[arg(long = "set", value_name = "N")]
        set_number: Option<u32>,
    },
    /// Umpire: set a match status (Scheduled, Live, Completed, ...)
    Status {
        #[arg(value_name = "MATCH_ID")]
        match_id: String,
        status: String,
    },
}

#[derive(clap::Subcommand)]
enum TournamentCommands {
    /// List tournaments
    List {
        /// Filter by name or location
        #[arg(long)]
        search: Option<String>,
    },
    /// Show a tournament
    Show {
        #[arg(value_name = "TOURNAMENT_ID")]
        id: String,
    },
}

#[derive(clap::Subcommand)]
enum MatchCommands {
    /// List matches
    List {
        /// Only matches with this status (Live, Scheduled, Completed)
        #[arg(long)]
        status: Option<String>,
        /// Only matches of this tournament
        #[arg(long, value_name = "TOURNAMENT_ID")]
        tournament: Option<String>,
    },
    /// Show a match
    Show {
        #[arg(value_name = "MATCH_ID")]
        id: String,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Generate a fresh config from Rust defaults (for xtask)
    Generate,
    /// Point the client at another backend
    SetBaseUrl {
        #[arg(value_name = "URL")]
        url: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SideArg {
    A,
    B,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::A => Side::SideA,
            SideArg::B => Side::SideB,
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = config::Config::load().context("load config")?;

    let _log_guard = match logging::init(&config.log_level) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: file logging disabled: {e:#}");
            None
        }
    };

    let command = match cli.command {
        Commands::Api(command) => command,
        Commands::Config { command } => {
            return match command {
                ConfigCommands::Path => {
                    commands::config::path();
                    Ok(())
                }
                ConfigCommands::Init => commands::config::init(),
                ConfigCommands::Generate => commands::config::generate(),
                ConfigCommands::SetBaseUrl { url } => commands::config::set_base_url(&url),
            };
        }
    };

    let client = ApiClient::from_config(&config)?;
    let result = run_api_command(&client, command).await;

    if result.is_err() && client.session_state() == SessionState::LoginRequired {
        tracing::info!("command failed with expired session");
        return result.context("Session expired. Run `smashfit login`.");
    }
    result
}

async fn run_api_command(client: &ApiClient, command: ApiCommands) -> Result<()> {
    match command {
        ApiCommands::Login { email, password } => {
            commands::auth::login(client, &email, password).await
        }
        ApiCommands::Logout => commands::auth::logout(client).await,
        ApiCommands::Whoami => commands::auth::whoami(client).await,

        ApiCommands::Tournaments { command } => match command {
            TournamentCommands::List { search } => {
                commands::tournaments::list(client, search.as_deref()).await
            }
            TournamentCommands::Show { id } => commands::tournaments::show(client, &id).await,
        },

        ApiCommands::Matches { command } => match command {
            MatchCommands::List { status, tournament } => {
                commands::matches::list(client, status.as_deref(), tournament.as_deref()).await
            }
            MatchCommands::Show { id } => commands::matches::show(client, &id).await,
        },

        ApiCommands::Leaderboard { tournament, search } => {
            commands::leaderboard::show(client, tournament.as_deref(), search.as_deref()).await
        }
        ApiCommands::Dashboard => commands::dashboard::show(client).await,

        ApiCommands::Score {
            match_id,
            side,
            delta,
            set_number,
        } => commands::umpire::score(client, &match_id, side.into(), delta, set_number).await,
        ApiCommands::Status { match_id, status } => {
            commands::umpire::status(client, &match_id, &status).await
        }
    }
}
