//! Debt-snowball payoff simulation.
//!
//! The snowball strategy orders debts smallest balance first. Every month
//! each open debt receives its minimum payment, interest accrues on what
//! remains, and the whole monthly budget minus those minimums lands on the
//! current target. When a debt closes, its minimum stays in the budget and
//! rolls onto the next target.

use serde::Serialize;

use crate::error::CoreError;
use crate::models::Amount;

/// Months to simulate before concluding something is wrong with the input.
/// A 100-year horizon is far past any payable consumer debt.
const MAX_MONTHS: u32 = 1200;

/// One debt entering the simulation.
#[derive(Debug, Clone)]
pub struct Debt {
    /// Account id the debt belongs to.
    pub account_id: String,

    /// Display name.
    pub name: String,

    /// Amount owed, as a positive value.
    pub balance: Amount,

    /// Annual percentage rate, e.g. `19.99`.
    pub rate: f64,

    /// Minimum payment as a percentage of the running balance.
    pub minimum_percentage: f64,

    /// Minimum payment floor.
    pub minimum_floor: Amount,
}

impl Debt {
    /// The minimum payment due on the current balance: the greater of the
    /// percentage-of-balance and the floor, capped at the balance itself.
    fn minimum_due(&self, balance: Amount) -> Amount {
        let percentage = Amount::from_units_f64(balance.to_units() * self.minimum_percentage / 100.0);
        percentage.max(self.minimum_floor).min(balance)
    }

    /// Interest accrued on the balance over one month.
    fn monthly_interest(&self, balance: Amount) -> Amount {
        Amount::from_units_f64(balance.to_units() * self.rate / 100.0 / 12.0)
    }
}

/// The payoff result for a single debt.
#[derive(Debug, Clone, Serialize)]
pub struct DebtPayoff {
    /// Account id.
    pub account_id: String,

    /// Display name.
    pub name: String,

    /// Starting balance.
    pub starting_balance: Amount,

    /// Month (1-based) in which the debt reaches zero.
    pub payoff_month: u32,

    /// Interest paid over the life of the debt.
    pub interest_paid: Amount,
}

/// A computed debt-snowball plan.
#[derive(Debug, Clone, Serialize)]
pub struct PayoffPlan {
    /// Total paid toward debts each month (initial minimums plus extra).
    pub monthly_budget: Amount,

    /// Months until the last debt reaches zero.
    pub months: u32,

    /// Interest paid across all debts.
    pub total_interest: Amount,

    /// Per-debt results, in payoff order.
    pub debts: Vec<DebtPayoff>,
}

impl PayoffPlan {
    /// Simulates the snowball payoff for `debts` with `extra` paid on top
    /// of the minimums each month.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::PlanDiverges`] when the budget never outpaces
    /// accrued interest, i.e. the balances stop shrinking.
    pub fn compute(debts: &[Debt], extra: Amount) -> Result<PayoffPlan, CoreError> {
        // Smallest balance first: the snowball ordering.
        let mut order: Vec<&Debt> = debts.iter().collect();
        order.sort_by_key(|d| d.balance);

        // The budget is fixed at month zero so paid-off minimums roll over.
        let initial_minimums: Amount = order
            .iter()
            .map(|d| d.minimum_due(d.balance))
            .fold(Amount::ZERO, |acc, m| acc + m);
        let monthly_budget = initial_minimums + extra;

        let mut balances: Vec<Amount> = order.iter().map(|d| d.balance).collect();
        let mut interest_paid: Vec<Amount> = vec![Amount::ZERO; order.len()];
        let mut payoff_month: Vec<u32> = vec![0; order.len()];

        let mut month = 0u32;
        while balances.iter().any(|b| *b > Amount::ZERO) {
            month += 1;
            if month > MAX_MONTHS {
                return Err(diverges(&order, &balances));
            }

            let total_before: Amount = balances.iter().fold(Amount::ZERO, |acc, b| acc + *b);

            // Interest accrues before payments are applied.
            for (i, debt) in order.iter().enumerate() {
                if balances[i] > Amount::ZERO {
                    let interest = debt.monthly_interest(balances[i]);
                    balances[i] += interest;
                    interest_paid[i] += interest;
                }
            }

            // Minimums for every open debt.
            let mut available = monthly_budget;
            for (i, debt) in order.iter().enumerate() {
                if balances[i] > Amount::ZERO {
                    let payment = debt.minimum_due(balances[i]).min(available);
                    balances[i] -= payment;
                    available -= payment;
                }
            }

            // Everything left goes to the smallest open balance.
            for (i, balance) in balances.iter_mut().enumerate() {
                if *balance > Amount::ZERO && available > Amount::ZERO {
                    let payment = available.min(*balance);
                    *balance -= payment;
                    available -= payment;
                }
                if *balance == Amount::ZERO && payoff_month[i] == 0 {
                    payoff_month[i] = month;
                }
            }

            let total_after: Amount = balances.iter().fold(Amount::ZERO, |acc, b| acc + *b);
            if total_after >= total_before && total_after > Amount::ZERO {
                return Err(diverges(&order, &balances));
            }
        }

        let mut results: Vec<DebtPayoff> = order
            .iter()
            .enumerate()
            .map(|(i, debt)| DebtPayoff {
                account_id: debt.account_id.clone(),
                name: debt.name.clone(),
                starting_balance: debt.balance,
                payoff_month: payoff_month[i],
                interest_paid: interest_paid[i],
            })
            .collect();
        results.sort_by_key(|r| r.payoff_month);

        Ok(PayoffPlan {
            monthly_budget,
            months: month,
            total_interest: interest_paid.iter().fold(Amount::ZERO, |acc, i| acc + *i),
            debts: results,
        })
    }
}

/// Names the first still-open debt in the divergence error.
fn diverges(order: &[&Debt], balances: &[Amount]) -> CoreError {
    let name = order
        .iter()
        .zip(balances)
        .find(|(_, b)| **b > Amount::ZERO)
        .map_or_else(|| "unknown".to_string(), |(d, _)| d.name.clone());
    CoreError::PlanDiverges(name)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn debt(name: &str, balance: i64, rate: f64, floor: i64) -> Debt {
        Debt {
            account_id: format!("acc-{name}"),
            name: name.to_string(),
            balance: Amount(balance),
            rate,
            minimum_percentage: 1.0,
            minimum_floor: Amount(floor),
        }
    }

    #[test]
    fn test_empty_plan() {
        let plan = PayoffPlan::compute(&[], Amount::ZERO).unwrap();
        assert_eq!(plan.months, 0);
        assert_eq!(plan.total_interest, Amount::ZERO);
        assert!(plan.debts.is_empty());
    }

    #[test]
    fn test_smallest_balance_paid_first() {
        let debts = vec![
            debt("big", 5_000_000, 19.99, 25_000),
            debt("small", 500_000, 24.99, 25_000),
        ];

        let plan = PayoffPlan::compute(&debts, Amount::from_units(200)).unwrap();

        assert_eq!(plan.debts[0].name, "small");
        assert!(plan.debts[0].payoff_month < plan.debts[1].payoff_month);
        assert!(plan.months > 0);
    }

    #[test]
    fn test_freed_minimum_rolls_over() {
        let debts = vec![
            debt("a", 500_000, 0.0, 100_000),
            debt("b", 1_500_000, 0.0, 100_000),
        ];

        // Fixed budget of 200/month against 2000 total: exactly 10 months,
        // which only works out if a's freed 100 keeps flowing to b after
        // month 5. Without the rollover b alone would need 10 more months.
        let plan = PayoffPlan::compute(&debts, Amount::ZERO).unwrap();
        assert_eq!(plan.months, 10);
        assert_eq!(plan.debts[0].name, "a");
        assert_eq!(plan.debts[0].payoff_month, 5);
        assert_eq!(plan.total_interest, Amount::ZERO);
    }

    #[test]
    fn test_interest_accrues() {
        let debts = vec![debt("card", 1_000_000, 12.0, 0)];
        let plan = PayoffPlan::compute(&debts, Amount::from_units(100)).unwrap();

        // 1% monthly interest on a shrinking 1000 balance, ~110/month paid.
        assert!(plan.total_interest > Amount::ZERO);
        assert!(plan.months >= 9);
    }

    #[test]
    fn test_diverging_plan_is_an_error() {
        // 1% minimum on the balance never outruns ~2.1% monthly interest.
        let debts = vec![Debt {
            account_id: "acc-stuck".to_string(),
            name: "stuck".to_string(),
            balance: Amount(10_000_000),
            rate: 25.0,
            minimum_percentage: 1.0,
            minimum_floor: Amount::ZERO,
        }];

        let err = PayoffPlan::compute(&debts, Amount::ZERO).unwrap_err();
        assert!(matches!(err, CoreError::PlanDiverges(name) if name == "stuck"));
    }

    #[test]
    fn test_monthly_budget_includes_extra() {
        let debts = vec![debt("card", 1_000_000, 0.0, 50_000)];
        let plan = PayoffPlan::compute(&debts, Amount::from_units(75)).unwrap();
        assert_eq!(plan.monthly_budget, Amount(125_000));
    }
}
