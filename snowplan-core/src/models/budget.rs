//! Budget resources.
//!
//! Read-only shapes for the budgeting API's budget endpoints. Optional
//! fields carry `#[serde(default)]` so older API variants that omit them
//! still deserialize.

use serde::{Deserialize, Serialize};

use super::Account;

/// Currency formatting metadata attached to a budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    /// Locale identifier, e.g. `en_US`.
    pub locale: String,
}

/// Date formatting metadata attached to a budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateFormat {
    /// Locale identifier, e.g. `en_US`.
    pub locale: String,
}

/// A budget as returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    /// Budget id.
    pub id: String,

    /// Budget display name.
    pub name: String,

    /// Last modification timestamp, RFC 3339.
    #[serde(default)]
    pub last_modified_on: Option<String>,

    /// Date formatting preferences.
    #[serde(default)]
    pub date_format: Option<DateFormat>,

    /// Currency formatting preferences.
    #[serde(default)]
    pub currency_format: Option<CurrencyFormat>,
}

/// A single budget with its optional sub-resources.
///
/// The single-budget endpoint can inline accounts; everything else the API
/// can inline (categories, payees, transactions) is outside this tool's
/// concern and left unmodeled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// Summary fields.
    #[serde(flatten)]
    pub summary: BudgetSummary,

    /// Accounts, when the endpoint inlines them.
    #[serde(default)]
    pub accounts: Option<Vec<Account>>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_budget_summary() {
        let json = r#"{
            "id": "a1b2c3",
            "name": "My Budget",
            "last_modified_on": "2018-03-05T12:00:00+00:00",
            "date_format": { "locale": "en_US" },
            "currency_format": { "locale": "en_US" }
        }"#;

        let summary: BudgetSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.id, "a1b2c3");
        assert_eq!(summary.name, "My Budget");
        assert_eq!(summary.currency_format.unwrap().locale, "en_US");
    }

    #[test]
    fn test_parse_budget_summary_minimal() {
        let json = r#"{ "id": "a1b2c3", "name": "My Budget" }"#;

        let summary: BudgetSummary = serde_json::from_str(json).unwrap();
        assert!(summary.last_modified_on.is_none());
        assert!(summary.date_format.is_none());
    }

    #[test]
    fn test_parse_budget_with_accounts() {
        let json = r#"{
            "id": "a1b2c3",
            "name": "My Budget",
            "accounts": [{
                "id": "acc-1",
                "name": "Visa",
                "type": "CreditCard",
                "on_budget": true,
                "closed": false,
                "note": null,
                "balance": -450000,
                "cleared_balance": -450000,
                "uncleared_balance": 0
            }]
        }"#;

        let budget: Budget = serde_json::from_str(json).unwrap();
        assert_eq!(budget.summary.name, "My Budget");
        let accounts = budget.accounts.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].name, "Visa");
    }
}
