//! App access token management.
//!
//! Implements the OAuth client-credentials grant: fetch a token, cache it
//! alongside its expiry, and revalidate it before reuse.

use std::fmt;

use chrono::Utc;
use serde::Deserialize;
use tokio::sync::Mutex;
use url::Url;

use crate::{HTTP_TIMEOUT, Token, TwitchError};

const AUTH_BASE: &str = "https://id.twitch.tv";

/// Token endpoint response for the client-credentials grant.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Validation endpoint response. Only the client ID matters here; the
/// remaining fields (`login`, `scopes`, `user_id`, `expires_in`) are
/// ignored.
#[derive(Debug, Deserialize)]
struct ValidationResponse {
    #[serde(default)]
    client_id: String,
}

/// Manages the app access token for one client-credentials pair.
///
/// The cached token lives behind a mutex that is held across the whole
/// validate-or-fetch sequence, so concurrent callers collapse into a
/// single refresh.
pub struct AppAuth {
    client_id: String,
    client_secret: String,
    base_url: String,
    http: reqwest::Client,
    token: Mutex<Option<Token>>,
}

impl AppAuth {
    /// Create an auth manager for the given credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            base_url: AUTH_BASE.to_string(),
            http: reqwest::Client::new(),
            token: Mutex::new(None),
        }
    }

    /// Override the OAuth host (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Ensure a valid app access token is cached.
    ///
    /// Credentials are checked before any network call. A cached token
    /// that is fresh by the local clock is still confirmed against the
    /// validation endpoint; a token that fails either check is replaced
    /// by a fresh fetch.
    pub async fn connect(&self) -> Result<(), TwitchError> {
        self.ensure_token().await.map(|_| ())
    }

    /// Like [`AppAuth::connect`], returning a clone of the valid token.
    pub async fn ensure_token(&self) -> Result<Token, TwitchError> {
        if self.client_id.is_empty() {
            return Err(TwitchError::Config("client ID is not set"));
        }
        if self.client_secret.is_empty() {
            return Err(TwitchError::Config("client secret is not set"));
        }

        let mut cache = self.token.lock().await;
        if let Some(token) = cache.as_ref() {
            // Local expiry is the fast-path gate; the validation endpoint
            // has the final say on tokens that still look fresh.
            if token.is_fresh(Utc::now().timestamp()) && self.validate(token).await? {
                return Ok(token.clone());
            }
        }

        let token = self.fetch_token().await?;
        *cache = Some(token.clone());
        Ok(token)
    }

    /// Clone of the cached token, if any.
    pub async fn token(&self) -> Option<Token> {
        self.token.lock().await.clone()
    }

    async fn fetch_token(&self) -> Result<Token, TwitchError> {
        let mut url = Url::parse(&format!("{}/oauth2/token", self.base_url))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("client_secret", &self.client_secret)
            .append_pair("grant_type", "client_credentials");

        let resp = self.http.post(url).timeout(HTTP_TIMEOUT).send().await?;

        let status = resp.status();
        let body = resp.text().await?;
        if status != reqwest::StatusCode::OK {
            return Err(TwitchError::TokenRequest {
                status: status.as_u16(),
                message: body,
            });
        }

        let token_resp: TokenResponse = serde_json::from_str(&body)?;
        let expires_at = Utc::now().timestamp() + token_resp.expires_in;
        tracing::info!(
            expires_in = token_resp.expires_in,
            "Fetched app access token"
        );

        Ok(Token {
            access_token: token_resp.access_token,
            expires_at,
        })
    }

    /// Ask the validation endpoint whether the token is still good.
    ///
    /// 401 means the token is dead server-side; that is a regular
    /// `false`, not an error, so the caller falls through to a fresh
    /// fetch. A 200 counts as valid only when the body decodes and
    /// carries a non-empty client ID.
    async fn validate(&self, token: &Token) -> Result<bool, TwitchError> {
        let url = format!("{}/oauth2/validate", self.base_url);
        let resp = self
            .http
            .get(&url)
            .timeout(HTTP_TIMEOUT)
            .header("Authorization", format!("Bearer {}", token.access_token))
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            tracing::info!("Cached token rejected by validation endpoint");
            return Ok(false);
        }
        if status != reqwest::StatusCode::OK {
            return Err(TwitchError::Validation {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        match serde_json::from_str::<ValidationResponse>(&body) {
            Ok(validation) => Ok(!validation.client_id.is_empty()),
            Err(_) => Ok(false),
        }
    }

    #[cfg(test)]
    async fn seed_token(&self, token: Token) {
        *self.token.lock().await = Some(token);
    }
}

// The client secret must never end up in logs.
impl fmt::Debug for AppAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppAuth")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}
