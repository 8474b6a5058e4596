//! Budgeting API client.
//!
//! One authenticated GET per operation, returning the resource's `data`
//! payload. No caching here: the store decides what to keep.

use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use snowplan_core::{Account, Budget, BudgetSummary};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::error::{ApiError, RemoteError};

// ============================================================================
// Constants
// ============================================================================

/// Production API base.
const DEFAULT_API_BASE: &str = "https://api.youneedabudget.com/papi/v1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Response Envelopes
// ============================================================================

/// Success envelope: `{"data": ...}`.
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// Error envelope: `{"error": {...}}`.
///
/// The API has been observed returning this under HTTP 200, so it is
/// checked before the status code is consulted.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: RemoteError,
}

/// Payload of `GET /budgets`.
#[derive(Debug, Deserialize)]
struct BudgetsPayload {
    budgets: Vec<BudgetSummary>,
}

/// Payload of `GET /budgets/{id}`.
#[derive(Debug, Deserialize)]
struct BudgetPayload {
    budget: Budget,
}

/// Payload of `GET /budgets/{id}/accounts`.
#[derive(Debug, Deserialize)]
struct AccountsPayload {
    accounts: Vec<Account>,
}

// ============================================================================
// API Client
// ============================================================================

/// Budgeting API client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client against the production API.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(DEFAULT_API_BASE)
    }

    /// Creates a client against a custom base URL (e.g. a local forwarding
    /// proxy during development).
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(concat!("snowplan/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Lists the user's budgets.
    ///
    /// # Errors
    ///
    /// Fails on transport errors or an API error body.
    #[instrument(skip(self, token))]
    pub async fn budgets(&self, token: &str) -> Result<Vec<BudgetSummary>, ApiError> {
        let payload: BudgetsPayload = self.get(token, "/budgets").await?;
        Ok(payload.budgets)
    }

    /// Fetches a single budget.
    ///
    /// # Errors
    ///
    /// Fails on transport errors or an API error body.
    #[instrument(skip(self, token))]
    pub async fn budget(&self, token: &str, budget_id: &str) -> Result<Budget, ApiError> {
        let payload: BudgetPayload = self.get(token, &format!("/budgets/{budget_id}")).await?;
        Ok(payload.budget)
    }

    /// Fetches the accounts of a budget.
    ///
    /// # Errors
    ///
    /// Fails on transport errors or an API error body.
    #[instrument(skip(self, token))]
    pub async fn accounts(&self, token: &str, budget_id: &str) -> Result<Vec<Account>, ApiError> {
        let payload: AccountsPayload = self
            .get(token, &format!("/budgets/{budget_id}/accounts"))
            .await?;
        Ok(payload.accounts)
    }

    /// Issues one authenticated GET and unwraps the envelope.
    async fn get<T: DeserializeOwned>(&self, token: &str, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "GET");

        let response = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        parse_payload(status, &body)
    }
}

/// Unwraps a response body, error envelope first.
///
/// The error envelope wins regardless of status: an `{"error": ...}` body
/// under HTTP 200 must fail the call.
fn parse_payload<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, ApiError> {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        debug!(status = %status, code = %envelope.error.id, "API returned error body");
        return Err(ApiError::from_remote(envelope.error));
    }

    if !status.is_success() {
        return Err(ApiError::InvalidResponse(format!("HTTP {status}")));
    }

    let envelope: DataEnvelope<T> = serde_json::from_str(body)?;
    Ok(envelope.data)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_budgets_payload() {
        let body = r#"{
            "data": {
                "budgets": [
                    { "id": "b-1", "name": "Household" },
                    { "id": "b-2", "name": "Side Business" }
                ]
            }
        }"#;

        let payload: BudgetsPayload = parse_payload(StatusCode::OK, body).unwrap();
        assert_eq!(payload.budgets.len(), 2);
        assert_eq!(payload.budgets[1].name, "Side Business");
    }

    #[test]
    fn test_error_body_under_200_fails_the_call() {
        let body = r#"{
            "error": { "id": "429", "name": "rate_limited", "detail": "Too many requests" }
        }"#;

        let result: Result<BudgetsPayload, ApiError> = parse_payload(StatusCode::OK, body);
        let err = result.unwrap_err();
        assert_eq!(err.remote_code(), Some(429));
        match err {
            ApiError::Api { name, detail, .. } => {
                assert_eq!(name, "rate_limited");
                assert_eq!(detail, "Too many requests");
            }
            other => panic!("expected ApiError::Api, got {other:?}"),
        }
    }

    #[test]
    fn test_error_body_under_error_status() {
        let body = r#"{
            "error": { "id": "404.2", "name": "resource_not_found", "detail": "Budget not found" }
        }"#;

        let result: Result<BudgetPayload, ApiError> = parse_payload(StatusCode::NOT_FOUND, body);
        assert_eq!(result.unwrap_err().remote_code(), Some(404));
    }

    #[test]
    fn test_error_status_without_error_body() {
        let result: Result<BudgetsPayload, ApiError> =
            parse_payload(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert!(matches!(result.unwrap_err(), ApiError::InvalidResponse(_)));
    }

    #[test]
    fn test_malformed_success_body() {
        let result: Result<BudgetsPayload, ApiError> =
            parse_payload(StatusCode::OK, r#"{"data": {"nope": true}}"#);
        assert!(matches!(result.unwrap_err(), ApiError::Json(_)));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::with_base_url("http://localhost:9090/papi/v1/").unwrap();
        assert_eq!(client.base_url, "http://localhost:9090/papi/v1");
    }
}
