//! Status command - where in the wizard the user is.

use anyhow::Result;

use snowplan_store::WizardStep;

use crate::output::{divider, JsonFormatter};
use crate::{Cli, OutputFormat};

/// What to do next for each wizard step.
fn hint(step: WizardStep) -> &'static str {
    match step {
        WizardStep::NeedsAuth => "Run `snowplan login` to authorize.",
        WizardStep::NeedsBudget => "Run `snowplan budgets`, then `snowplan select <budget-id>`.",
        WizardStep::NeedsAccounts => {
            "Run `snowplan accounts`, then `snowplan track <account-id>...`."
        }
        WizardStep::NeedsAccountDetails => {
            "Run `snowplan configure <account-id> --rate ... --min-percent ... --min-payment ...`."
        }
        WizardStep::Complete => "Run `snowplan plan` to compute the payoff schedule.",
    }
}

/// Runs the status command.
pub async fn run(cli: &Cli) -> Result<()> {
    let store = cli.open_store().await;
    let state = store.state().await;
    let step = store.wizard_step().await;

    match cli.format {
        OutputFormat::Text => {
            println!("Snowplan Status");
            println!("{}", divider());
            println!();
            println!("Wizard step: {step}");
            if let Some(budget) = state.settings.selected_budget() {
                let name = state
                    .user_budgets
                    .iter()
                    .find(|b| b.id == budget.budget_id)
                    .map_or(budget.budget_id.as_str(), |b| b.name.as_str());
                println!("Budget:      {name}");
                println!("Tracked:     {} account(s)", budget.accounts.len());
            }
            println!();
            println!("{}", hint(step));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            let payload = serde_json::json!({
                "wizard_step": step,
                "selected_budget": state.settings.selected_budget().map(|b| &b.budget_id),
                "tracked_accounts": state
                    .settings
                    .selected_budget()
                    .map_or(0, |b| b.accounts.len()),
                "hint": hint(step),
            });
            println!("{}", formatter.format(&payload)?);
        }
    }
    Ok(())
}
