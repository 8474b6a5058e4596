//! Wizard-step derivation.
//!
//! The onboarding stage is never stored; it is recomputed from the merged
//! settings and caches whenever someone asks. [`wizard_step`] is a pure
//! function so it is safe to call on every render of every surface.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::settings::{AccountSettings, StoreState};

/// The onboarding stage the user must complete next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardStep {
    /// No usable access token: the user must authorize.
    NeedsAuth,
    /// Authorized, but no budget selected.
    NeedsBudget,
    /// Budget selected, but no debt accounts chosen.
    NeedsAccounts,
    /// Accounts chosen, but at least one is missing rate or minimum
    /// payment data.
    NeedsAccountDetails,
    /// Everything is in place; the payoff plan can be computed.
    Complete,
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WizardStep::NeedsAuth => "needs-auth",
            WizardStep::NeedsBudget => "needs-budget",
            WizardStep::NeedsAccounts => "needs-accounts",
            WizardStep::NeedsAccountDetails => "needs-account-details",
            WizardStep::Complete => "complete",
        };
        write!(f, "{name}")
    }
}

/// Derives the wizard step from store state.
///
/// First-matching rule wins, in this precedence order:
///
/// 1. no session, or the session expired at `now` → [`WizardStep::NeedsAuth`]
/// 2. no budget selected → [`WizardStep::NeedsBudget`]
/// 3. the selected budget has zero accounts chosen → [`WizardStep::NeedsAccounts`]
/// 4. any chosen account missing rate or minimum payment →
///    [`WizardStep::NeedsAccountDetails`]
/// 5. otherwise → [`WizardStep::Complete`]
///
/// An expired token routes through here as a normal state, not an error.
pub fn wizard_step(state: &StoreState, now: DateTime<Utc>) -> WizardStep {
    let authorized = state
        .settings
        .session
        .as_ref()
        .is_some_and(|s| !s.is_expired(now));
    if !authorized {
        return WizardStep::NeedsAuth;
    }

    let Some(budget) = state.settings.selected_budget() else {
        return WizardStep::NeedsBudget;
    };

    if budget.accounts.is_empty() {
        return WizardStep::NeedsAccounts;
    }

    if !budget.accounts.iter().all(AccountSettings::is_complete) {
        return WizardStep::NeedsAccountDetails;
    }

    WizardStep::Complete
}

// ============================================================================
// Tests
// ============================================================================
