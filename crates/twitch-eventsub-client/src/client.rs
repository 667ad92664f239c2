//! High-level client aggregating token management and EventSub
//! subscription operations.

use crate::TwitchError;
use crate::api::{EventSubClient, Subscription, SubscriptionList, WebhookTransport};
use crate::auth::AppAuth;

/// One object for the whole flow: connect, list, subscribe.
///
/// Every subscription operation refreshes the token first when needed,
/// so callers do not have to sequence `connect` themselves. All failures
/// are returned as [`TwitchError`].
#[derive(Debug)]
pub struct TwitchClient {
    auth: AppAuth,
    api: EventSubClient,
}

impl TwitchClient {
    /// Create a client for the given credentials and webhook endpoint.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        webhook: WebhookTransport,
    ) -> Self {
        let client_id = client_id.into();
        Self {
            api: EventSubClient::new(client_id.clone(), webhook),
            auth: AppAuth::new(client_id, client_secret.into()),
        }
    }

    /// Override the OAuth host (tests, proxies).
    pub fn with_auth_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.auth = self.auth.with_base_url(base_url);
        self
    }

    /// Override the Helix host (tests, proxies).
    pub fn with_api_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api = self.api.with_base_url(base_url);
        self
    }

    /// Ensure a valid app access token is available.
    pub async fn connect(&self) -> Result<(), TwitchError> {
        self.auth.connect().await
    }

    /// All EventSub subscriptions for this client, across pages.
    pub async fn list_subscriptions(&self) -> Result<SubscriptionList, TwitchError> {
        let token = self.auth.ensure_token().await?;
        self.api.list_subscriptions(&token).await
    }

    /// Subscribe to `stream.online` for the broadcaster, reusing a live
    /// existing subscription when one is found.
    pub async fn subscribe_stream_online(
        &self,
        broadcaster_user_id: &str,
    ) -> Result<Subscription, TwitchError> {
        let token = self.auth.ensure_token().await?;
        self.api
            .ensure_stream_online(&token, broadcaster_user_id)
            .await
    }

    /// Subscribe without the duplicate pre-check.
    pub async fn create_stream_online(
        &self,
        broadcaster_user_id: &str,
    ) -> Result<Subscription, TwitchError> {
        let token = self.auth.ensure_token().await?;
        self.api
            .create_stream_online(&token, broadcaster_user_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(server: &mockito::ServerGuard) -> TwitchClient {
        TwitchClient::new(
            "test_client_id",
            "test_secret",
            WebhookTransport {
                callback: "https://example.com/hook".into(),
                secret: "shhh".into(),
            },
        )
        .with_auth_base_url(server.url())
        .with_api_base_url(server.url())
    }

    #[tokio::test]
    async fn subscribe_flow_fetches_token_once_and_creates() {
        let mut server = mockito::Server::new_async().await;
        let token_mock = server
            .mock("POST", "/oauth2/token")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"access_token":"abc","expires_in":3600}"#)
            .expect(1)
            .create_async()
            .await;
        server
            .mock("GET", "/eventsub/subscriptions")
            .match_header("authorization", "Bearer abc")
            .with_status(200)
            .with_body(r#"{"data":[],"total":0,"total_cost":0,"max_total_cost":10000}"#)
            .create_async()
            .await;
        let create_mock = server
            .mock("POST", "/eventsub/subscriptions")
            .match_header("authorization", "Bearer abc")
            .with_status(202)
            .with_body(
                r#"{
                  "data": [{
                    "id": "new-sub",
                    "status": "webhook_callback_verification_pending",
                    "type": "stream.online",
                    "version": "1",
                    "condition": { "broadcaster_user_id": "57576022" },
                    "created_at": "2026-08-01T10:11:12.123Z",
                    "transport": { "method": "webhook", "callback": "https://example.com/hook" },
                    "cost": 1
                  }],
                  "total": 1,
                  "total_cost": 1,
                  "max_total_cost": 10000
                }"#,
            )
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let sub = client.subscribe_stream_online("57576022").await.unwrap();

        token_mock.assert_async().await;
        create_mock.assert_async().await;
        assert_eq!(sub.id, "new-sub");
        assert_eq!(sub.status, "webhook_callback_verification_pending");
    }

    #[tokio::test]
    async fn errors_propagate_to_the_caller() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/oauth2/token")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .with_body("oops")
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.list_subscriptions().await.unwrap_err();
        assert!(matches!(err, TwitchError::TokenRequest { status: 500, .. }));
    }
}
