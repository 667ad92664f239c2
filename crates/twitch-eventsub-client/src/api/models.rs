use serde::{Deserialize, Serialize};

/// Identifier fields scoping an EventSub subscription.
///
/// Sparse by design: each subscription type populates its own subset.
/// `stream.online` uses only `broadcaster_user_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broadcaster_user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_broadcaster_user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_broadcaster_user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Condition {
    /// Condition scoped to a single broadcaster.
    pub fn broadcaster(user_id: impl Into<String>) -> Self {
        Self {
            broadcaster_user_id: Some(user_id.into()),
            ..Self::default()
        }
    }
}

/// Wire form of the delivery transport.
///
/// The shared secret is sent on creation but never echoed back by the
/// server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transport {
    pub method: String,
    pub callback: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

/// Request body for POST /eventsub/subscriptions.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub version: String,
    pub condition: Condition,
    pub transport: Transport,
}

/// Server-owned subscription record, read-only to this client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub status: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub version: String,
    pub condition: Condition,
    #[serde(default)]
    pub created_at: String,
    pub transport: Transport,
    #[serde(default)]
    pub cost: u64,
}

impl Subscription {
    /// Whether the subscription is delivering or awaiting callback
    /// verification, as opposed to one of the revoked/failed states.
    pub fn is_live(&self) -> bool {
        matches!(
            self.status.as_str(),
            "enabled" | "webhook_callback_verification_pending"
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub cursor: Option<String>,
}

/// Response shape shared by the list and create endpoints.
#[derive(Debug, Deserialize)]
pub struct SubscriptionsResponse {
    pub data: Vec<Subscription>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub total_cost: u64,
    #[serde(default)]
    pub max_total_cost: u64,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// All subscriptions for the client, accumulated across pages.
#[derive(Debug)]
pub struct SubscriptionList {
    pub subscriptions: Vec<Subscription>,
    pub total: u64,
    pub total_cost: u64,
    pub max_total_cost: u64,
}
