// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Snowplan API
//!
//! Client facade for the budgeting API and OAuth session handling.
//!
//! This crate provides:
//!
//! - **`ApiClient`**: thin typed wrapper over the API's read endpoints,
//!   translating an access token into authenticated calls and normalizing
//!   error responses into [`ApiError`]
//! - **OAuth helpers**: the implicit-grant authorize URL and redirect
//!   fragment parsing
//! - **`Session`**: a bearer token with its absolute expiry
//!
//! ## Usage
//!
//! ```ignore
//! use snowplan_api::{ApiClient, Session};
//!
//! let client = ApiClient::new()?;
//! let budgets = client.budgets(&session.access_token).await?;
//! let accounts = client.accounts(&session.access_token, &budgets[0].id).await?;
//! ```
//!
//! The API wraps every success payload in `{"data": ...}` and reports
//! errors as `{"error": {"id", "name", "detail"}}` — sometimes under an
//! HTTP 200, so the client inspects the body before trusting the status.

pub mod client;
pub mod error;
pub mod oauth;

pub use client::ApiClient;
pub use error::{ApiError, RemoteError};
pub use oauth::{authorize_url, grant_from_redirect, parse_fragment, Session, TokenGrant};
