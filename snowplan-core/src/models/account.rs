//! Account resources.

use serde::{Deserialize, Serialize};

use super::Amount;

/// The kind of financial account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    /// A checking account.
    Checking,
    /// A savings account.
    Savings,
    /// A credit card account.
    CreditCard,
}

impl AccountType {
    /// Returns the display name for this account type.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Checking => "Checking",
            Self::Savings => "Savings",
            Self::CreditCard => "Credit Card",
        }
    }
}

/// A financial account belonging to a budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Account id.
    pub id: String,

    /// Account display name.
    pub name: String,

    /// Account kind.
    #[serde(rename = "type")]
    pub account_type: AccountType,

    /// Whether the account participates in the budget.
    pub on_budget: bool,

    /// Whether the account has been closed.
    pub closed: bool,

    /// Free-form note.
    #[serde(default)]
    pub note: Option<String>,

    /// Current balance in milliunits.
    pub balance: Amount,

    /// Cleared balance in milliunits.
    pub cleared_balance: Amount,

    /// Uncleared balance in milliunits.
    pub uncleared_balance: Amount,
}

impl Account {
    /// True for accounts the snowball planner can work with: open credit
    /// cards carrying a balance owed.
    pub fn is_debt(&self) -> bool {
        self.account_type == AccountType::CreditCard && !self.closed && self.balance.is_negative()
    }

    /// The amount owed on the account, as a positive value.
    pub fn owed(&self) -> Amount {
        if self.balance.is_negative() {
            self.balance.abs()
        } else {
            Amount::ZERO
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
