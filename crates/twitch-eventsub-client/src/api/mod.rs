//! Twitch Helix EventSub REST client.
//!
//! Webhook-transport subscription management: list existing subscriptions
//! (following pagination) and create new ones, with automatic Bearer
//! token + Client-ID header injection.

mod eventsub;
mod request;

pub mod models;

pub use models::{
    Condition, Pagination, Subscription, SubscriptionList, SubscriptionRequest,
    SubscriptionsResponse, Transport,
};

use std::fmt;

use crate::{Token, TwitchError};

const HELIX_BASE: &str = "https://api.twitch.tv/helix";

/// The EventSub subscription type this client manages.
pub const EVENT_STREAM_ONLINE: &str = "stream.online";

/// Webhook delivery endpoint: where Twitch POSTs event payloads, and the
/// shared secret used to sign them.
#[derive(Clone)]
pub struct WebhookTransport {
    pub callback: String,
    pub secret: String,
}

// The shared secret must never end up in logs.
impl fmt::Debug for WebhookTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookTransport")
            .field("callback", &self.callback)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Helix EventSub API client.
///
/// Operations borrow a [`Token`]; keeping it valid is the caller's
/// concern (see [`crate::auth::AppAuth`]).
#[derive(Debug)]
pub struct EventSubClient {
    http: reqwest::Client,
    client_id: String,
    webhook: WebhookTransport,
    base_url: String,
}

impl EventSubClient {
    /// Create a client for the given application and webhook endpoint.
    pub fn new(client_id: impl Into<String>, webhook: WebhookTransport) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id: client_id.into(),
            webhook,
            base_url: HELIX_BASE.to_string(),
        }
    }

    /// Override the Helix host (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
