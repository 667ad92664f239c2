use super::*;

impl EventSubClient {
    /// Fetch one page of subscriptions.
    pub async fn list_subscriptions_page(
        &self,
        token: &Token,
        after: Option<&str>,
    ) -> Result<SubscriptionsResponse, TwitchError> {
        let mut url = format!("{}/eventsub/subscriptions", self.base_url);
        if let Some(cursor) = after.filter(|v| !v.is_empty()) {
            url.push_str("?after=");
            url.push_str(cursor);
        }
        let body = self.authenticated_get(&url, token).await?;
        let resp: SubscriptionsResponse = serde_json::from_str(&body)?;
        Ok(resp)
    }

    /// Fetch all subscriptions, following the pagination cursor until the
    /// server stops returning one.
    pub async fn list_subscriptions(
        &self,
        token: &Token,
    ) -> Result<SubscriptionList, TwitchError> {
        let first = self.list_subscriptions_page(token, None).await?;
        let mut cursor = first.pagination.and_then(|p| p.cursor);
        let mut list = SubscriptionList {
            subscriptions: first.data,
            total: first.total,
            total_cost: first.total_cost,
            max_total_cost: first.max_total_cost,
        };
        while let Some(after) = cursor.filter(|c| !c.is_empty()) {
            let mut page = self.list_subscriptions_page(token, Some(&after)).await?;
            list.subscriptions.append(&mut page.data);
            cursor = page.pagination.and_then(|p| p.cursor);
        }
        Ok(list)
    }

    /// Create a subscription.
    ///
    /// 200, 201 and 202 are all success: webhook subscriptions come back
    /// 202 while callback verification is pending. Any other status is an
    /// error carrying the raw response body.
    pub async fn create_subscription(
        &self,
        token: &Token,
        request: &SubscriptionRequest,
    ) -> Result<Subscription, TwitchError> {
        let url = format!("{}/eventsub/subscriptions", self.base_url);
        let (status, body) = self.authenticated_post(&url, token, request).await?;
        if !matches!(status, 200 | 201 | 202) {
            return Err(TwitchError::Api {
                status,
                message: body,
            });
        }
        let resp: SubscriptionsResponse = serde_json::from_str(&body)?;
        resp.data
            .into_iter()
            .next()
            .ok_or_else(|| TwitchError::Api {
                status,
                message: "created subscription missing from response".into(),
            })
    }

    /// Create a `stream.online` subscription for the broadcaster using
    /// the configured webhook transport.
    pub async fn create_stream_online(
        &self,
        token: &Token,
        broadcaster_user_id: &str,
    ) -> Result<Subscription, TwitchError> {
        if broadcaster_user_id.is_empty() {
            return Err(TwitchError::Config("broadcaster user ID is not set"));
        }
        let request = SubscriptionRequest {
            kind: EVENT_STREAM_ONLINE.into(),
            version: "1".into(),
            condition: Condition::broadcaster(broadcaster_user_id),
            transport: Transport {
                method: "webhook".into(),
                callback: self.webhook.callback.clone(),
                secret: Some(self.webhook.secret.clone()),
            },
        };
        let sub = self.create_subscription(token, &request).await?;
        tracing::info!(
            broadcaster_user_id,
            status = %sub.status,
            "Created stream.online subscription"
        );
        Ok(sub)
    }

    /// Create a `stream.online` subscription unless a live one already
    /// exists for the broadcaster.
    pub async fn ensure_stream_online(
        &self,
        token: &Token,
        broadcaster_user_id: &str,
    ) -> Result<Subscription, TwitchError> {
        if broadcaster_user_id.is_empty() {
            return Err(TwitchError::Config("broadcaster user ID is not set"));
        }
        let existing = self.list_subscriptions(token).await?;
        let wanted = Condition::broadcaster(broadcaster_user_id);
        if let Some(sub) = existing
            .subscriptions
            .into_iter()
            .find(|s| s.kind == EVENT_STREAM_ONLINE && s.condition == wanted && s.is_live())
        {
            tracing::info!(
                broadcaster_user_id,
                id = %sub.id,
                "Reusing existing stream.online subscription"
            );
            return Ok(sub);
        }
        self.create_stream_online(token, broadcaster_user_id).await
    }
}
