//! The session/settings store.
//!
//! One `SettingsStore` owns the whole [`StoreState`] and persists it
//! through the injected [`Storage`] after every named mutation. Mutations
//! are atomic with respect to the in-memory state: each one is a single
//! synchronous change under the write lock, so no reader ever observes a
//! half-applied transition.

use chrono::Utc;
use snowplan_api::Session;
use snowplan_core::{Account, BudgetSummary};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::settings::{AccountSettings, BudgetSettings, SettingsPatch, StoreState, SCHEMA_VERSION};
use crate::storage::Storage;
use crate::wizard::{wizard_step, WizardStep};

/// The single key the serialized state lives under.
pub const STORAGE_KEY: &str = "snowplan-state";

/// Persistent settings store.
pub struct SettingsStore {
    state: Arc<RwLock<StoreState>>,
    storage: Arc<dyn Storage>,
}

impl SettingsStore {
    /// Creates a store with default state, without reading the backend.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
            storage,
        }
    }

    /// Loads the store from the backend.
    ///
    /// Missing, malformed, or mis-versioned persisted state is not an
    /// error: it falls back to defaults, logging at most a warning.
    pub async fn load(storage: Arc<dyn Storage>) -> Self {
        let state = match storage.read(STORAGE_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<StoreState>(&raw) {
                Ok(state) if state.schema_version == SCHEMA_VERSION => {
                    debug!("Loaded persisted state");
                    state
                }
                Ok(state) => {
                    warn!(
                        version = state.schema_version,
                        "Unknown persisted schema version, using defaults"
                    );
                    StoreState::default()
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse persisted state, using defaults");
                    StoreState::default()
                }
            },
            Ok(None) => {
                debug!("No persisted state found, using defaults");
                StoreState::default()
            }
            Err(e) => {
                warn!(error = %e, "Failed to read persisted state, using defaults");
                StoreState::default()
            }
        };

        Self {
            state: Arc::new(RwLock::new(state)),
            storage,
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// A snapshot of the current state.
    pub async fn state(&self) -> StoreState {
        self.state.read().await.clone()
    }

    /// The current session, only when present and unexpired.
    pub async fn current_session(&self) -> Option<Session> {
        let now = Utc::now();
        self.state
            .read()
            .await
            .settings
            .session
            .clone()
            .filter(|s| !s.is_expired(now))
    }

    /// The wizard step derived from the current state.
    pub async fn wizard_step(&self) -> WizardStep {
        wizard_step(&*self.state.read().await, Utc::now())
    }

    // ========================================================================
    // Named Mutations
    // ========================================================================

    /// Saves a new session.
    pub async fn save_session(&self, session: Session) {
        self.update(|s| s.settings.session = Some(session)).await;
    }

    /// Clears the session, forcing the logged-out state.
    pub async fn clear_session(&self) {
        self.update(|s| s.settings.session = None).await;
    }

    /// Selects a budget, replacing any previous selection with an empty
    /// account list.
    pub async fn select_budget(&self, budget_id: &str) {
        let budget_id = budget_id.to_string();
        self.update(move |s| {
            s.settings.budgets = vec![BudgetSettings {
                budget_id,
                accounts: Vec::new(),
            }];
        })
        .await;
    }

    /// Replaces the chosen-account list for a budget.
    pub async fn save_account_selection(&self, budget_id: &str, accounts: Vec<AccountSettings>) {
        let budget_id = budget_id.to_string();
        self.update(move |s| {
            s.settings.budgets = vec![BudgetSettings { budget_id, accounts }];
        })
        .await;
    }

    /// Upserts one account's configuration without disturbing its
    /// siblings.
    pub async fn save_account_details(&self, budget_id: &str, details: AccountSettings) {
        let budget_id = budget_id.to_string();
        self.update(move |s| {
            let budgets = &mut s.settings.budgets;
            let budget_idx = match budgets.iter().position(|b| b.budget_id == budget_id) {
                Some(idx) => idx,
                None => {
                    budgets.push(BudgetSettings {
                        budget_id,
                        accounts: Vec::new(),
                    });
                    budgets.len() - 1
                }
            };

            let accounts = &mut budgets[budget_idx].accounts;
            match accounts
                .iter()
                .position(|a| a.account_id == details.account_id)
            {
                Some(idx) => accounts[idx] = details,
                None => accounts.push(details),
            }
        })
        .await;
    }

    /// Merges a partial settings object, field-wise.
    pub async fn merge_settings(&self, patch: SettingsPatch) {
        self.update(move |s| patch.apply_to(&mut s.settings)).await;
    }

    /// Overwrites the budgets cache wholesale.
    pub async fn save_user_budgets(&self, budgets: Vec<BudgetSummary>) {
        self.update(move |s| s.user_budgets = budgets).await;
    }

    /// Overwrites one budget's accounts cache wholesale.
    pub async fn save_user_accounts(&self, budget_id: &str, accounts: Vec<Account>) {
        let budget_id = budget_id.to_string();
        self.update(move |s| {
            s.user_accounts.insert(budget_id, accounts);
        })
        .await;
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Writes the current state to the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the backend write fails.
    pub async fn persist(&self) -> Result<(), StoreError> {
        let raw = {
            let state = self.state.read().await;
            serde_json::to_string_pretty(&*state)?
        };
        self.storage.write(STORAGE_KEY, &raw).await
    }

    /// Applies one mutation and persists.
    ///
    /// Persistence is fire-and-forget: a failed write is logged at warn
    /// level and never fails the mutation.
    async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut StoreState),
    {
        {
            let mut state = self.state.write().await;
            f(&mut state);
        }
        if let Err(e) = self.persist().await {
            warn!(error = %e, "Failed to persist state");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MinimumPayment;
    use crate::storage::MemoryStorage;
    use chrono::Duration;
    use snowplan_core::Amount;

    fn memory() -> Arc<MemoryStorage> {
        Arc::new(MemoryStorage::new())
    }

    fn live_session() -> Session {
        Session {
            access_token: "abc123".to_string(),
            expires_at: Utc::now() + Duration::hours(2),
        }
    }

    #[tokio::test]
    async fn test_missing_state_loads_defaults() {
        let store = SettingsStore::load(memory()).await;
        assert_eq!(store.state().await, StoreState::default());
    }

    #[tokio::test]
    async fn test_malformed_state_loads_defaults() {
        for garbage in ["", "not json", "[1,2,3]", r#"{"settings": 42}"#] {
            let storage = Arc::new(MemoryStorage::with_entry(STORAGE_KEY, garbage));
            let store = SettingsStore::load(storage).await;
            assert_eq!(store.state().await, StoreState::default(), "input: {garbage:?}");
        }
    }

    #[tokio::test]
    async fn test_unknown_schema_version_loads_defaults() {
        let storage = Arc::new(MemoryStorage::with_entry(
            STORAGE_KEY,
            r#"{"schema_version": 99, "settings": {"budgets": [{"budget_id": "b-1"}]}}"#,
        ));
        let store = SettingsStore::load(storage).await;
        assert_eq!(store.state().await, StoreState::default());
    }

    #[tokio::test]
    async fn test_round_trip_through_storage() {
        let storage = memory();

        let store = SettingsStore::load(Arc::clone(&storage) as Arc<dyn Storage>).await;
        store.save_session(live_session()).await;
        store.select_budget("b-1").await;
        store
            .save_account_selection("b-1", vec![AccountSettings::new("acc-1")])
            .await;
        let written = store.state().await;

        let reloaded = SettingsStore::load(storage).await;
        assert_eq!(reloaded.state().await, written);
    }

    #[tokio::test]
    async fn test_select_budget_replaces_previous_selection() {
        let store = SettingsStore::new(memory());

        store.select_budget("b-1").await;
        store
            .save_account_selection("b-1", vec![AccountSettings::new("acc-1")])
            .await;
        store.select_budget("b-2").await;

        let state = store.state().await;
        assert_eq!(state.settings.budgets.len(), 1);
        assert_eq!(state.settings.budgets[0].budget_id, "b-2");
        assert!(state.settings.budgets[0].accounts.is_empty());
    }

    #[tokio::test]
    async fn test_sequential_detail_updates_are_both_kept() {
        let store = SettingsStore::new(memory());
        store.select_budget("b-1").await;
        store
            .save_account_selection(
                "b-1",
                vec![AccountSettings::new("acc-1"), AccountSettings::new("acc-2")],
            )
            .await;

        let mut first = AccountSettings::new("acc-1");
        first.rate = Some(19.99);
        store.save_account_details("b-1", first).await;

        let mut second = AccountSettings::new("acc-2");
        second.minimum_payment = Some(MinimumPayment {
            percentage: 1.0,
            minimum: Amount(25_000),
        });
        store.save_account_details("b-1", second).await;

        let state = store.state().await;
        let accounts = &state.settings.budgets[0].accounts;
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].rate, Some(19.99));
        assert!(accounts[1].minimum_payment.is_some());
    }

    #[tokio::test]
    async fn test_detail_update_survives_reload() {
        let storage = memory();
        let store = SettingsStore::load(Arc::clone(&storage) as Arc<dyn Storage>).await;

        store.select_budget("b-1").await;
        let mut details = AccountSettings::new("acc-1");
        details.rate = Some(12.5);
        store.save_account_details("b-1", details).await;

        let reloaded = SettingsStore::load(storage).await;
        let state = reloaded.state().await;
        assert_eq!(state.settings.budgets[0].accounts[0].rate, Some(12.5));
    }

    #[tokio::test]
    async fn test_merge_settings_is_field_wise() {
        let store = SettingsStore::new(memory());
        store.select_budget("b-1").await;

        store
            .merge_settings(SettingsPatch {
                session: Some(live_session()),
                budgets: None,
            })
            .await;

        let state = store.state().await;
        assert!(state.settings.session.is_some());
        // The untouched field keeps its value
        assert_eq!(state.settings.budgets[0].budget_id, "b-1");
    }

    #[tokio::test]
    async fn test_current_session_filters_expired() {
        let store = SettingsStore::new(memory());

        store
            .save_session(Session {
                access_token: "stale".to_string(),
                expires_at: Utc::now() - Duration::seconds(1),
            })
            .await;
        assert!(store.current_session().await.is_none());

        store.save_session(live_session()).await;
        assert_eq!(
            store.current_session().await.unwrap().access_token,
            "abc123"
        );
    }

    #[tokio::test]
    async fn test_clear_session_forces_logged_out() {
        let store = SettingsStore::new(memory());
        store.save_session(live_session()).await;
        store.clear_session().await;

        assert!(store.current_session().await.is_none());
        assert_eq!(store.wizard_step().await, WizardStep::NeedsAuth);
    }

    #[tokio::test]
    async fn test_cache_overwritten_wholesale() {
        let store = SettingsStore::new(memory());

        store
            .save_user_budgets(vec![BudgetSummary {
                id: "b-1".to_string(),
                name: "First".to_string(),
                last_modified_on: None,
                date_format: None,
                currency_format: None,
            }])
            .await;
        store
            .save_user_budgets(vec![BudgetSummary {
                id: "b-2".to_string(),
                name: "Second".to_string(),
                last_modified_on: None,
                date_format: None,
                currency_format: None,
            }])
            .await;

        let state = store.state().await;
        assert_eq!(state.user_budgets.len(), 1);
        assert_eq!(state.user_budgets[0].id, "b-2");
    }

    #[tokio::test]
    async fn test_persist_failure_does_not_fail_mutation() {
        struct BrokenStorage;

        #[async_trait::async_trait]
        impl Storage for BrokenStorage {
            async fn read(&self, _key: &str) -> Result<Option<String>, StoreError> {
                Ok(None)
            }

            async fn write(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
                Err(StoreError::Storage("disk on fire".to_string()))
            }
        }

        let store = SettingsStore::new(Arc::new(BrokenStorage));
        store.select_budget("b-1").await;

        // In-memory state still advanced
        let state = store.state().await;
        assert_eq!(state.settings.budgets[0].budget_id, "b-1");

        // And the explicit persist surfaces the failure
        assert!(store.persist().await.is_err());
    }
}
