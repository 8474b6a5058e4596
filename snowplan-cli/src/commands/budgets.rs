//! Budgets command - fetch, cache, and list the user's budgets.

use anyhow::Result;

use crate::output::{divider, JsonFormatter};
use crate::{require_session, Cli, OutputFormat};

/// Runs the budgets command.
pub async fn run(cli: &Cli) -> Result<()> {
    let store = cli.open_store().await;
    let session = require_session(&store).await?;
    let client = cli.api_client()?;

    let budgets = client.budgets(&session.access_token).await?;
    store.save_user_budgets(budgets.clone()).await;

    let state = store.state().await;
    let selected = state
        .settings
        .selected_budget()
        .map(|b| b.budget_id.clone());

    match cli.format {
        OutputFormat::Text => {
            println!("Budgets");
            println!("{}", divider());
            println!();
            if budgets.is_empty() {
                println!("No budgets on this account.");
            }
            for budget in &budgets {
                let marker = if selected.as_deref() == Some(budget.id.as_str()) {
                    "*"
                } else {
                    " "
                };
                println!("{marker} {}  {}", budget.id, budget.name);
            }
            println!();
            println!("Next: `snowplan select <budget-id>`");
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            let payload = serde_json::json!({
                "budgets": budgets,
                "selected_budget": selected,
            });
            println!("{}", formatter.format(&payload)?);
        }
    }
    Ok(())
}
