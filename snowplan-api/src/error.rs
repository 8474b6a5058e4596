//! API error types.

use serde::Deserialize;
use thiserror::Error;

/// The error object the API embeds in failing response bodies.
///
/// `id` is the stringified numeric error code ("429", "401.1", ...).
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteError {
    /// Stringified error code.
    pub id: String,

    /// Machine-readable error name, e.g. `rate_limited`.
    pub name: String,

    /// Human-readable detail.
    pub detail: String,
}

/// Error type for API client operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure: network unreachable, TLS, timeout.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API reported an error body, regardless of transport status.
    #[error("API error {code} ({name}): {detail}")]
    Api {
        /// Stringified error code from the response body.
        code: String,
        /// Machine-readable error name.
        name: String,
        /// Human-readable detail.
        detail: String,
    },

    /// The response body matched neither the data nor the error envelope.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// Wraps a remote error body.
    pub fn from_remote(remote: RemoteError) -> Self {
        ApiError::Api {
            code: remote.id,
            name: remote.name,
            detail: remote.detail,
        }
    }

    /// The numeric error code, when the API sent one.
    ///
    /// Codes like `"401.1"` report their integer prefix.
    pub fn remote_code(&self) -> Option<u16> {
        match self {
            ApiError::Api { code, .. } => {
                let digits: String = code.chars().take_while(char::is_ascii_digit).collect();
                digits.parse().ok()
            }
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
