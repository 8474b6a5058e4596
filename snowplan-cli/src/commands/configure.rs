//! Configure command - interest and minimum-payment details per account.

use anyhow::Result;
use clap::Args;

use snowplan_core::Amount;
use snowplan_store::MinimumPayment;

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the configure command.
#[derive(Args)]
pub struct ConfigureArgs {
    /// The tracked account to configure.
    pub account_id: String,

    /// Annual interest rate as a percentage, e.g. 19.99.
    #[arg(long)]
    pub rate: Option<f64>,

    /// Minimum payment as a percentage of the balance, e.g. 1.
    #[arg(long)]
    pub min_percent: Option<f64>,

    /// Minimum payment floor in currency units, e.g. 25.
    #[arg(long)]
    pub min_payment: Option<f64>,
}

/// Runs the configure command.
pub async fn run(args: &ConfigureArgs, cli: &Cli) -> Result<()> {
    if args.rate.is_none() && args.min_percent.is_none() && args.min_payment.is_none() {
        anyhow::bail!("Nothing to set. Pass --rate, --min-percent, and/or --min-payment.");
    }

    let store = cli.open_store().await;

    let state = store.state().await;
    let Some(budget) = state.settings.selected_budget() else {
        anyhow::bail!("No budget selected. Run `snowplan select <budget-id>` first.");
    };
    let budget_id = budget.budget_id.clone();

    let mut details = budget
        .accounts
        .iter()
        .find(|a| a.account_id == args.account_id)
        .cloned()
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Account {:?} is not tracked. Run `snowplan track {}` first.",
                args.account_id,
                args.account_id
            )
        })?;

    if let Some(rate) = args.rate {
        details.rate = Some(rate);
    }

    if args.min_percent.is_some() || args.min_payment.is_some() {
        let previous = details.minimum_payment.take();
        let percentage = args
            .min_percent
            .or(previous.as_ref().map(|m| m.percentage))
            .unwrap_or(0.0);
        let minimum = args
            .min_payment
            .map(Amount::from_units_f64)
            .or(previous.map(|m| m.minimum))
            .unwrap_or(Amount::ZERO);
        details.minimum_payment = Some(MinimumPayment {
            percentage,
            minimum,
        });
    }

    store.save_account_details(&budget_id, details.clone()).await;

    match cli.format {
        OutputFormat::Text => {
            println!("Configured {}.", args.account_id);
            if details.is_complete() {
                let step = store.wizard_step().await;
                println!("Wizard step: {step}");
            } else {
                println!("Still missing rate or minimum payment for this account.");
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            let payload = serde_json::json!({
                "budget_id": budget_id,
                "account": details,
            });
            println!("{}", formatter.format(&payload)?);
        }
    }
    Ok(())
}
