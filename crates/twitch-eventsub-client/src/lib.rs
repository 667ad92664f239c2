//! Twitch EventSub webhook client library.
//!
//! Acquires an app access token through the OAuth client-credentials
//! grant, keeps it fresh, and manages webhook EventSub subscriptions
//! (list + create) against the Helix API.

pub mod api;
pub mod auth;
pub mod client;

use std::fmt;
use std::time::Duration;

/// Request timeout applied to every outgoing HTTP call.
pub(crate) const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// App access token obtained through the client-credentials grant.
///
/// Owned by [`auth::AppAuth`]; API calls borrow it for the duration of
/// one request.
#[derive(Clone)]
pub struct Token {
    pub access_token: String,
    /// Unix timestamp (UTC seconds) after which the token is invalid.
    pub expires_at: i64,
}

impl Token {
    /// Whether the token is still valid by the local clock.
    pub fn is_fresh(&self, now: i64) -> bool {
        self.expires_at > now
    }
}

// The access token is a bearer credential; keep it out of logs.
impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Unified error type for the twitch-eventsub-client crate.
#[derive(Debug, thiserror::Error)]
pub enum TwitchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(&'static str),

    #[error("token request failed (status {status}): {message}")]
    TokenRequest { status: u16, message: String },

    #[error("token validation failed (status {status})")]
    Validation { status: u16 },

    #[error("Twitch API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}
