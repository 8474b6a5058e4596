// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Snowplan Core
//!
//! Core types and the payoff-plan calculator for the Snowplan application.
//!
//! This crate provides the foundational abstractions used across all other
//! Snowplan crates, including:
//!
//! - Domain models for the budgeting API's resources (budgets, accounts)
//! - Milliunit currency amounts
//! - The debt-snowball payoff simulation
//! - Error types
//!
//! ## Key Types
//!
//! ### Resource Types
//! - [`BudgetSummary`] - A budget as listed by the API
//! - [`Budget`] - A single budget with its optional sub-resources
//! - [`Account`] - A financial account belonging to a budget
//! - [`AccountType`] - Checking, savings, or credit card
//!
//! ### Money
//! - [`Amount`] - Milliunit currency amount (1/1000 of the currency unit)
//!
//! ### Planning
//! - [`Debt`] - One debt entering the payoff simulation
//! - [`PayoffPlan`] - The computed plan (per-debt payoff month, interest)

pub mod error;
pub mod models;
pub mod plan;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    Account, AccountType, Amount, Budget, BudgetSummary, CurrencyFormat, DateFormat,
};

// Re-export planning types
pub use plan::{Debt, DebtPayoff, PayoffPlan};
