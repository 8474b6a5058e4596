//! Core error types for Snowplan.

use thiserror::Error;

/// Core error type for Snowplan operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Account not found in the selected budget.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// An account is missing the data the plan needs.
    #[error("Account {0} has no {1} configured")]
    MissingAccountDetail(String, &'static str),

    /// The plan never amortizes: payments do not outpace interest.
    #[error("Plan diverges: monthly payments never exceed accrued interest for {0}")]
    PlanDiverges(String),

    /// Invalid data from an API response.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
