//! Select command - pick the budget to plan against.
//!
//! Selection is not complete until the account fetch for the chosen budget
//! lands in the cache, so the next step has something to list.

use anyhow::Result;
use clap::Args;

use crate::output::JsonFormatter;
use crate::{require_session, Cli, OutputFormat};

/// Arguments for the select command.
#[derive(Args)]
pub struct SelectArgs {
    /// The budget id to select (see `snowplan budgets`).
    pub budget_id: String,
}

/// Runs the select command.
pub async fn run(args: &SelectArgs, cli: &Cli) -> Result<()> {
    let store = cli.open_store().await;
    let session = require_session(&store).await?;

    // Validate against the cache when we have one.
    let state = store.state().await;
    if !state.user_budgets.is_empty()
        && !state.user_budgets.iter().any(|b| b.id == args.budget_id)
    {
        anyhow::bail!(
            "Unknown budget id {:?}. Run `snowplan budgets` to list them.",
            args.budget_id
        );
    }

    store.select_budget(&args.budget_id).await;

    let client = cli.api_client()?;
    let accounts = client
        .accounts(&session.access_token, &args.budget_id)
        .await?;
    store
        .save_user_accounts(&args.budget_id, accounts.clone())
        .await;

    let debt_count = accounts.iter().filter(|a| a.is_debt()).count();

    match cli.format {
        OutputFormat::Text => {
            println!(
                "Selected budget {} ({} accounts, {debt_count} carrying debt).",
                args.budget_id,
                accounts.len()
            );
            println!("Next: `snowplan accounts`");
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            let payload = serde_json::json!({
                "selected_budget": args.budget_id,
                "accounts": accounts.len(),
                "debt_accounts": debt_count,
            });
            println!("{}", formatter.format(&payload)?);
        }
    }
    Ok(())
}
