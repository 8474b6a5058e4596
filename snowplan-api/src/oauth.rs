//! OAuth implicit-grant helpers and the bearer session.
//!
//! The budgeting service hands tokens back through the implicit grant: the
//! user is sent to the authorize endpoint and returns on the registered
//! redirect URI with `access_token` and `expires_in` in the URL fragment.
//! Nothing here talks to the network; this module only builds the outbound
//! URL and digests the inbound fragment.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

// ============================================================================
// Constants
// ============================================================================

/// The service's OAuth authorize endpoint.
const AUTHORIZE_URL: &str = "https://app.youneedabudget.com/oauth/authorize";

// ============================================================================
// Token Grant
// ============================================================================

/// The raw result of a successful implicit-grant redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    /// The bearer access token.
    pub access_token: String,

    /// Seconds until the token expires, relative to when it was granted.
    pub expires_in: u64,
}

/// Parses an OAuth redirect fragment.
///
/// The fragment is `&`-joined `key=value` pairs, with or without the
/// leading `#`. Returns `Some` only when both `access_token` and a numeric
/// `expires_in` are present; anything else is not a grant.
pub fn parse_fragment(fragment: &str) -> Option<TokenGrant> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);

    let mut access_token = None;
    let mut expires_in = None;

    for pair in fragment.split('&') {
        match pair.split_once('=') {
            Some(("access_token", value)) if !value.is_empty() => {
                access_token = Some(value.to_string());
            }
            Some(("expires_in", value)) => {
                expires_in = value.parse::<u64>().ok();
            }
            _ => {}
        }
    }

    Some(TokenGrant {
        access_token: access_token?,
        expires_in: expires_in?,
    })
}

/// Extracts a grant from a pasted redirect.
///
/// Accepts either the full callback URL or just its fragment, since users
/// paste both.
pub fn grant_from_redirect(input: &str) -> Option<TokenGrant> {
    if let Ok(url) = Url::parse(input) {
        if let Some(fragment) = url.fragment() {
            return parse_fragment(fragment);
        }
    }
    parse_fragment(input)
}

/// Builds the authorize URL the user's browser must visit.
///
/// # Panics
///
/// Never: the base is a valid constant URL.
pub fn authorize_url(client_id: &str, redirect_uri: &str) -> Url {
    let mut url = Url::parse(AUTHORIZE_URL).expect("authorize endpoint is a valid URL");
    url.query_pairs_mut()
        .append_pair("client_id", client_id)
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("response_type", "token")
        .finish();
    url
}

// ============================================================================
// Session
// ============================================================================

/// A bearer token with its absolute expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The bearer access token.
    pub access_token: String,

    /// When the token stops being valid.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Anchors a grant's relative expiry to an absolute timestamp.
    #[allow(clippy::cast_possible_wrap)]
    pub fn from_grant(grant: &TokenGrant, now: DateTime<Utc>) -> Self {
        Self {
            access_token: grant.access_token.clone(),
            expires_at: now + Duration::seconds(grant.expires_in as i64),
        }
    }

    /// True once the token's expiry has passed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fragment() {
        let grant = parse_fragment("#access_token=abc123&expires_in=7200").unwrap();
        assert_eq!(grant.access_token, "abc123");
        assert_eq!(grant.expires_in, 7200);
    }

    #[test]
    fn test_parse_fragment_without_hash() {
        let grant = parse_fragment("access_token=abc123&expires_in=7200&token_type=bearer");
        assert_eq!(grant.unwrap().access_token, "abc123");
    }

    #[test]
    fn test_parse_fragment_missing_token() {
        assert!(parse_fragment("expires_in=7200").is_none());
    }

    #[test]
    fn test_parse_fragment_missing_expiry() {
        assert!(parse_fragment("access_token=abc123").is_none());
    }

    #[test]
    fn test_parse_fragment_non_numeric_expiry() {
        assert!(parse_fragment("access_token=abc123&expires_in=soon").is_none());
    }

    #[test]
    fn test_grant_from_full_redirect_url() {
        let grant =
            grant_from_redirect("https://localhost:8080/#access_token=abc123&expires_in=7200")
                .unwrap();
        assert_eq!(grant.access_token, "abc123");
        assert_eq!(grant.expires_in, 7200);
    }

    #[test]
    fn test_authorize_url() {
        let url = authorize_url("my-client-id", "https://localhost:8080");
        assert_eq!(url.host_str(), Some("app.youneedabudget.com"));
        assert_eq!(url.path(), "/oauth/authorize");

        let query: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(query.contains(&("client_id".to_string(), "my-client-id".to_string())));
        assert!(query.contains(&("redirect_uri".to_string(), "https://localhost:8080".to_string())));
        assert!(query.contains(&("response_type".to_string(), "token".to_string())));
    }

    #[test]
    fn test_session_expiry_from_grant() {
        let grant = parse_fragment("#access_token=abc123&expires_in=7200").unwrap();
        let now = Utc::now();
        let session = Session::from_grant(&grant, now);

        assert_eq!(session.access_token, "abc123");
        assert_eq!(session.expires_at, now + Duration::seconds(7200));
        assert!(!session.is_expired(now));
        assert!(session.is_expired(now + Duration::seconds(7200)));
        assert!(session.is_expired(now + Duration::seconds(7201)));
    }

    #[test]
    fn test_session_round_trip() {
        let session = Session {
            access_token: "abc123".to_string(),
            expires_at: Utc::now(),
        };
        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }
}
