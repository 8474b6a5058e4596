// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Snowplan Store
//!
//! The session/settings store and its derived wizard state.
//!
//! This crate provides:
//!
//! - **`SettingsStore`**: the single holder of user settings (session,
//!   selected budget, per-account debt configuration) and the read-only
//!   caches of API results, persisted through an injected [`Storage`]
//!   capability after every mutation
//! - **`wizard_step`**: the pure derivation of the onboarding stage from
//!   store state
//! - **`FileStorage`** / **`MemoryStorage`**: the disk-backed storage used
//!   by the CLI and the in-memory fake used by tests
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use snowplan_store::{FileStorage, SettingsStore};
//!
//! let storage = Arc::new(FileStorage::default_path());
//! let store = SettingsStore::load(storage).await;
//!
//! store.select_budget("budget-id").await;
//! let step = store.wizard_step().await;
//! ```
//!
//! Loading tolerates missing, malformed, or mis-versioned persisted state
//! by substituting defaults; nothing above a warning is ever logged for it.

pub mod error;
pub mod persistence;
pub mod settings;
pub mod storage;
pub mod store;
pub mod wizard;

pub use error::StoreError;
pub use persistence::{default_config_dir, default_state_path, FileStorage};
pub use settings::{
    AccountSettings, BudgetSettings, MinimumPayment, Settings, SettingsPatch, StoreState,
    SCHEMA_VERSION,
};
pub use storage::{MemoryStorage, Storage};
pub use store::{SettingsStore, STORAGE_KEY};
pub use wizard::{wizard_step, WizardStep};
