//! Plan command - compute and print the snowball payoff schedule.

use anyhow::Result;
use clap::Args;

use snowplan_core::{Amount, PayoffPlan};
use snowplan_store::WizardStep;

use crate::output::{divider, money, JsonFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the plan command.
#[derive(Args)]
pub struct PlanArgs {
    /// Extra payment on top of the minimums each month, in currency units.
    #[arg(long, default_value_t = 0.0)]
    pub extra: f64,
}

/// Runs the plan command.
pub async fn run(args: &PlanArgs, cli: &Cli) -> Result<()> {
    let store = cli.open_store().await;
    let step = store.wizard_step().await;
    if step != WizardStep::Complete {
        anyhow::bail!("Setup is not finished (wizard step: {step}). Run `snowplan status`.");
    }

    let state = store.state().await;
    let debts = state.debts()?;
    let plan = PayoffPlan::compute(&debts, Amount::from_units_f64(args.extra))?;

    match cli.format {
        OutputFormat::Text => {
            println!("Snowball Payoff Plan");
            println!("{}", divider());
            println!();
            println!("Monthly budget: {}", money(plan.monthly_budget));
            println!("Debt-free in:   {} month(s)", plan.months);
            println!("Total interest: {}", money(plan.total_interest));
            println!();
            println!("{:<24} {:>10} {:>8} {:>10}", "Account", "Balance", "Month", "Interest");
            for debt in &plan.debts {
                println!(
                    "{:<24} {:>10} {:>8} {:>10}",
                    debt.name,
                    money(debt.starting_balance),
                    debt.payoff_month,
                    money(debt.interest_paid)
                );
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&plan)?);
        }
    }
    Ok(())
}
