//! Accounts command - list the selected budget's accounts.
//!
//! Reads the cache written at selection time; `--refresh` refetches first.

use anyhow::Result;
use clap::Args;

use snowplan_core::Account;

use crate::output::{divider, money, JsonFormatter};
use crate::{require_session, Cli, OutputFormat};

/// Arguments for the accounts command.
#[derive(Args)]
pub struct AccountsArgs {
    /// Include non-debt accounts (checking, savings, paid-off cards).
    #[arg(long)]
    pub all: bool,

    /// Refetch accounts from the API before listing.
    #[arg(long)]
    pub refresh: bool,
}

/// Runs the accounts command.
pub async fn run(args: &AccountsArgs, cli: &Cli) -> Result<()> {
    let store = cli.open_store().await;

    let state = store.state().await;
    let Some(budget) = state.settings.selected_budget() else {
        anyhow::bail!("No budget selected. Run `snowplan select <budget-id>` first.");
    };
    let budget_id = budget.budget_id.clone();
    let tracked: Vec<String> = budget
        .accounts
        .iter()
        .map(|a| a.account_id.clone())
        .collect();

    if args.refresh || state.user_accounts.get(&budget_id).is_none() {
        let session = require_session(&store).await?;
        let client = cli.api_client()?;
        let fetched = client.accounts(&session.access_token, &budget_id).await?;
        store.save_user_accounts(&budget_id, fetched).await;
    }

    let state = store.state().await;
    let cached = state
        .user_accounts
        .get(&budget_id)
        .cloned()
        .unwrap_or_default();
    let accounts: Vec<&Account> = cached
        .iter()
        .filter(|a| args.all || a.is_debt())
        .collect();

    match cli.format {
        OutputFormat::Text => {
            println!("Accounts in {budget_id}");
            println!("{}", divider());
            println!();
            if accounts.is_empty() {
                println!("No debt accounts found. Try `--all` to see everything.");
            }
            for account in &accounts {
                let marker = if tracked.contains(&account.id) { "*" } else { " " };
                println!(
                    "{marker} {}  {:<24} {:>12}  {}",
                    account.id,
                    account.name,
                    money(account.balance),
                    account.account_type.display_name()
                );
            }
            println!();
            println!("* tracked. Next: `snowplan track <account-id>...`");
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            let payload = serde_json::json!({
                "budget_id": budget_id,
                "accounts": accounts,
                "tracked": tracked,
            });
            println!("{}", formatter.format(&payload)?);
        }
    }
    Ok(())
}
