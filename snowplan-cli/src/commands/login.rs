//! Login command - the OAuth implicit-grant flow, CLI style.
//!
//! Without `--redirect` this prints the authorize URL; the user opens it,
//! authorizes, and pastes the callback URL back via `--redirect`, which
//! persists the session. The pasted fragment is consumed and never stored
//! in raw form.

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use tracing::info;

use snowplan_api::{authorize_url, grant_from_redirect, Session};

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Environment variable fallback for the OAuth client id.
const CLIENT_ID_ENV: &str = "SNOWPLAN_CLIENT_ID";

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    /// The callback URL (or just its fragment) pasted after authorizing.
    #[arg(long)]
    pub redirect: Option<String>,

    /// OAuth client id registered with the budgeting service.
    /// Falls back to $SNOWPLAN_CLIENT_ID.
    #[arg(long)]
    pub client_id: Option<String>,

    /// Redirect URI registered for the client.
    #[arg(long, default_value = "https://localhost:8080")]
    pub redirect_uri: String,
}

/// Runs the login command.
pub async fn run(args: &LoginArgs, cli: &Cli) -> Result<()> {
    match &args.redirect {
        Some(redirect) => complete_login(redirect, cli).await,
        None => start_login(args, cli),
    }
}

/// Runs the logout command.
pub async fn run_logout(cli: &Cli) -> Result<()> {
    let store = cli.open_store().await;
    store.clear_session().await;

    match cli.format {
        OutputFormat::Text => println!("Logged out."),
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&serde_json::json!({"logged_in": false}))?);
        }
    }
    Ok(())
}

fn start_login(args: &LoginArgs, cli: &Cli) -> Result<()> {
    let client_id = args
        .client_id
        .clone()
        .or_else(|| std::env::var(CLIENT_ID_ENV).ok())
        .ok_or_else(|| {
            anyhow::anyhow!("No OAuth client id. Pass --client-id or set ${CLIENT_ID_ENV}.")
        })?;

    let url = authorize_url(&client_id, &args.redirect_uri);

    match cli.format {
        OutputFormat::Text => {
            println!("Open this URL in your browser and authorize access:");
            println!();
            println!("  {url}");
            println!();
            println!("Then finish logging in with:");
            println!("  snowplan login --redirect '<the URL your browser lands on>'");
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!(
                "{}",
                formatter.format(&serde_json::json!({"authorize_url": url.as_str()}))?
            );
        }
    }
    Ok(())
}

async fn complete_login(redirect: &str, cli: &Cli) -> Result<()> {
    let grant = grant_from_redirect(redirect).ok_or_else(|| {
        anyhow::anyhow!(
            "No token in the redirect; expected a fragment like #access_token=...&expires_in=..."
        )
    })?;

    let session = Session::from_grant(&grant, Utc::now());
    let expires_at = session.expires_at;

    let store = cli.open_store().await;
    store.save_session(session).await;
    info!(expires_at = %expires_at, "Session saved");

    match cli.format {
        OutputFormat::Text => {
            println!("Logged in. Token expires {}.", expires_at.format("%Y-%m-%d %H:%M UTC"));
            println!("Next: `snowplan budgets`");
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!(
                "{}",
                formatter.format(
                    &serde_json::json!({"logged_in": true, "expires_at": expires_at})
                )?
            );
        }
    }
    Ok(())
}
