//! Settings and persisted state shapes.
//!
//! Everything here carries `#[serde(default)]` so a partially written or
//! older persisted document still deserializes field by field; whatever a
//! document does not say falls back to the default value.

use serde::{Deserialize, Serialize};
use snowplan_api::Session;
use snowplan_core::{Account, Amount, BudgetSummary, CoreError, Debt};
use std::collections::HashMap;

/// The canonical persisted-schema version.
///
/// A document claiming any other version is discarded in favor of defaults
/// rather than guessed at.
pub const SCHEMA_VERSION: u32 = 1;

// ============================================================================
// Settings Types
// ============================================================================

/// Minimum-payment rule for a debt account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimumPayment {
    /// Percentage of the running balance, e.g. `1.0`.
    pub percentage: f64,

    /// Payment floor in milliunits.
    pub minimum: Amount,
}

/// User-entered configuration for one chosen debt account.
///
/// The optional fields stay absent until the user completes the
/// account-details wizard step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountSettings {
    /// Account id.
    pub account_id: String,

    /// Annual interest rate as a percentage, e.g. `19.99`.
    pub rate: Option<f64>,

    /// Minimum-payment rule.
    pub minimum_payment: Option<MinimumPayment>,
}

impl AccountSettings {
    /// A fresh selection for an account, with no details yet.
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            rate: None,
            minimum_payment: None,
        }
    }

    /// True once both rate and minimum payment have been entered.
    pub fn is_complete(&self) -> bool {
        self.rate.is_some() && self.minimum_payment.is_some()
    }
}

impl Default for AccountSettings {
    fn default() -> Self {
        Self::new(String::new())
    }
}

/// The account selection and configuration under one budget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetSettings {
    /// Budget id.
    pub budget_id: String,

    /// Chosen debt accounts with their configuration.
    pub accounts: Vec<AccountSettings>,
}

/// User settings: the session plus the selected budget's configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The current bearer session, if the user has logged in.
    pub session: Option<Session>,

    /// Per-budget settings. At most one entry is authoritative; budget
    /// selection replaces the list wholesale, and only the first element
    /// is read back.
    pub budgets: Vec<BudgetSettings>,
}

impl Settings {
    /// The selected budget's settings, if a budget has been selected.
    pub fn selected_budget(&self) -> Option<&BudgetSettings> {
        self.budgets.first()
    }
}

/// A partial settings object for the merge operation.
///
/// Each `Some` field replaces the corresponding settings slice; `None`
/// fields are left untouched. This is deliberately field-wise rather than
/// a recursive merge, so structurally invalid data has nowhere to hide.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsPatch {
    /// Replacement session.
    pub session: Option<Session>,

    /// Replacement per-budget settings.
    pub budgets: Option<Vec<BudgetSettings>>,
}

impl SettingsPatch {
    /// Applies the patch to `settings`.
    pub fn apply_to(self, settings: &mut Settings) {
        if let Some(session) = self.session {
            settings.session = Some(session);
        }
        if let Some(budgets) = self.budgets {
            settings.budgets = budgets;
        }
    }
}

// ============================================================================
// Persisted State
// ============================================================================

/// The full persisted store state: settings plus the API-result caches.
///
/// Serialized as one JSON document under a single storage key. The caches
/// are owned exclusively by the store and overwritten wholesale on each
/// fetch, never merged field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreState {
    /// Persisted-schema version; see [`SCHEMA_VERSION`].
    pub schema_version: u32,

    /// User settings.
    pub settings: Settings,

    /// Cache of the user's budgets, as last fetched.
    pub user_budgets: Vec<BudgetSummary>,

    /// Cache of each budget's accounts, keyed by budget id.
    pub user_accounts: HashMap<String, Vec<Account>>,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            settings: Settings::default(),
            user_budgets: Vec::new(),
            user_accounts: HashMap::new(),
        }
    }
}

impl StoreState {
    /// The cached accounts of the selected budget.
    pub fn selected_budget_accounts(&self) -> Option<&Vec<Account>> {
        let budget = self.settings.selected_budget()?;
        self.user_accounts.get(&budget.budget_id)
    }

    /// Assembles the debts entering the payoff simulation from the chosen
    /// accounts and their configuration.
    ///
    /// # Errors
    ///
    /// Fails when a chosen account is absent from the cache or still
    /// missing its rate or minimum payment.
    pub fn debts(&self) -> Result<Vec<Debt>, CoreError> {
        let Some(budget) = self.settings.selected_budget() else {
            return Ok(Vec::new());
        };

        let accounts = self
            .user_accounts
            .get(&budget.budget_id)
            .map(Vec::as_slice)
            .unwrap_or_default();

        budget
            .accounts
            .iter()
            .map(|chosen| {
                let account = accounts
                    .iter()
                    .find(|a| a.id == chosen.account_id)
                    .ok_or_else(|| CoreError::AccountNotFound(chosen.account_id.clone()))?;
                let rate = chosen.rate.ok_or_else(|| {
                    CoreError::MissingAccountDetail(chosen.account_id.clone(), "rate")
                })?;
                let minimum = chosen.minimum_payment.as_ref().ok_or_else(|| {
                    CoreError::MissingAccountDetail(chosen.account_id.clone(), "minimum payment")
                })?;

                Ok(Debt {
                    account_id: account.id.clone(),
                    name: account.name.clone(),
                    balance: account.owed(),
                    rate,
                    minimum_percentage: minimum.percentage,
                    minimum_floor: minimum.minimum,
                })
            })
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
