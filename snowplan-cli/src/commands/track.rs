//! Track command - choose the debt accounts to pay down.

use anyhow::Result;
use clap::Args;

use snowplan_store::AccountSettings;

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the track command.
#[derive(Args)]
pub struct TrackArgs {
    /// Account ids to track (see `snowplan accounts`).
    #[arg(required = true)]
    pub account_ids: Vec<String>,
}

/// Runs the track command.
pub async fn run(args: &TrackArgs, cli: &Cli) -> Result<()> {
    let store = cli.open_store().await;

    let state = store.state().await;
    let Some(budget) = state.settings.selected_budget() else {
        anyhow::bail!("No budget selected. Run `snowplan select <budget-id>` first.");
    };
    let budget_id = budget.budget_id.clone();

    // Validate against the cache when we have one.
    if let Some(cached) = state.user_accounts.get(&budget_id) {
        for id in &args.account_ids {
            if !cached.iter().any(|a| &a.id == id) {
                anyhow::bail!(
                    "Unknown account id {id:?}. Run `snowplan accounts` to list them."
                );
            }
        }
    }

    // Keep details already entered for accounts that stay tracked.
    let selection: Vec<AccountSettings> = args
        .account_ids
        .iter()
        .map(|id| {
            budget
                .accounts
                .iter()
                .find(|a| &a.account_id == id)
                .cloned()
                .unwrap_or_else(|| AccountSettings::new(id.clone()))
        })
        .collect();

    store.save_account_selection(&budget_id, selection).await;

    match cli.format {
        OutputFormat::Text => {
            println!("Tracking {} account(s).", args.account_ids.len());
            println!("Next: `snowplan configure <account-id> --rate ...`");
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            let payload = serde_json::json!({
                "budget_id": budget_id,
                "tracked": args.account_ids,
            });
            println!("{}", formatter.format(&payload)?);
        }
    }
    Ok(())
}
