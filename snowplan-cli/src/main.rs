// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Snowplan CLI - debt snowball planning against the YNAB budgeting API.
//!
//! # Examples
//!
//! ```bash
//! # Start the login flow, then complete it with the redirect URL
//! snowplan login
//! snowplan login --redirect 'https://localhost:8080/#access_token=...&expires_in=7200'
//!
//! # Pick a budget and the debt accounts to pay down
//! snowplan budgets
//! snowplan select 1b2d...
//! snowplan accounts
//! snowplan track acc-1 acc-2
//!
//! # Enter interest and minimum-payment details
//! snowplan configure acc-1 --rate 19.99 --min-percent 1 --min-payment 25
//!
//! # See where you are, then compute the payoff plan
//! snowplan status
//! snowplan plan --extra 200
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use snowplan_api::{ApiClient, Session};
use snowplan_store::{FileStorage, SettingsStore};

use commands::{accounts, budgets, configure, login, plan, select, status, track};

// ============================================================================
// CLI Definition
// ============================================================================

/// Snowplan CLI - debt snowball planning.
#[derive(Parser)]
#[command(name = "snowplan")]
#[command(about = "Debt snowball planning against the YNAB budgeting API")]
#[command(long_about = r#"
Snowplan walks you from an empty state to a debt payoff plan:

  1. login      authorize against the budgeting service
  2. budgets    list your budgets, select one
  3. accounts   list its debt accounts, track the ones to pay down
  4. configure  enter interest rate and minimum payment per account
  5. plan       compute the snowball payoff schedule

`snowplan status` tells you which step is next at any point.
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run. If none, shows the current status.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// API base URL (e.g. a local forwarding proxy during development).
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Directory holding the persisted state file.
    #[arg(long, global = true)]
    pub state_dir: Option<std::path::PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Start or complete the OAuth login flow.
    Login(login::LoginArgs),

    /// Forget the stored session.
    Logout,

    /// Show the current wizard step and what to do next.
    #[command(visible_alias = "s")]
    Status,

    /// Fetch and list your budgets.
    #[command(visible_alias = "b")]
    Budgets,

    /// Select the budget to plan against.
    Select(select::SelectArgs),

    /// List the selected budget's accounts.
    #[command(visible_alias = "a")]
    Accounts(accounts::AccountsArgs),

    /// Choose the debt accounts to pay down.
    Track(track::TrackArgs),

    /// Set interest and minimum-payment details for a tracked account.
    Configure(configure::ConfigureArgs),

    /// Compute the snowball payoff plan.
    #[command(visible_alias = "p")]
    Plan(plan::PlanArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// General error.
    Error = 1,
}

impl Cli {
    /// Opens the settings store over file storage.
    async fn open_store(&self) -> SettingsStore {
        let storage = match &self.state_dir {
            Some(dir) => FileStorage::new(dir.clone()),
            None => FileStorage::default_path(),
        };
        SettingsStore::load(Arc::new(storage)).await
    }

    /// Builds the API client, honoring `--base-url`.
    fn api_client(&self) -> Result<ApiClient> {
        let client = match &self.base_url {
            Some(base) => ApiClient::with_base_url(base.clone())?,
            None => ApiClient::new()?,
        };
        Ok(client)
    }
}

/// Returns the live session or instructs the user to log in.
async fn require_session(store: &SettingsStore) -> Result<Session> {
    store
        .current_session()
        .await
        .ok_or_else(|| anyhow::anyhow!("Not logged in or token expired. Run `snowplan login`."))
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("snowplan=debug,info")
    } else {
        EnvFilter::new("snowplan=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::Login(args)) => login::run(args, &cli).await,
        Some(Commands::Logout) => login::run_logout(&cli).await,
        Some(Commands::Budgets) => budgets::run(&cli).await,
        Some(Commands::Select(args)) => select::run(args, &cli).await,
        Some(Commands::Accounts(args)) => accounts::run(args, &cli).await,
        Some(Commands::Track(args)) => track::run(args, &cli).await,
        Some(Commands::Configure(args)) => configure::run(args, &cli).await,
        Some(Commands::Plan(args)) => plan::run(args, &cli).await,
        Some(Commands::Status) | None => status::run(&cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(ExitCode::Error as i32);
    }

    Ok(())
}
