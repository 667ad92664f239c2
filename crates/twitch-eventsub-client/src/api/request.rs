use serde::Serialize;

use super::*;
use crate::HTTP_TIMEOUT;

impl EventSubClient {
    /// Execute a GET with Bearer + Client-Id headers. Any non-200 status
    /// is an error carrying the raw response body for diagnostics.
    pub(super) async fn authenticated_get(
        &self,
        url: &str,
        token: &Token,
    ) -> Result<String, TwitchError> {
        let resp = self
            .http
            .get(url)
            .timeout(HTTP_TIMEOUT)
            .header("Authorization", format!("Bearer {}", token.access_token))
            .header("Client-Id", &self.client_id)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if status != reqwest::StatusCode::OK {
            return Err(TwitchError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(body)
    }

    /// Execute a POST with auth headers and JSON body.
    ///
    /// Returns the status and raw body; creation endpoints have their own
    /// idea of which statuses count as success.
    pub(super) async fn authenticated_post(
        &self,
        url: &str,
        token: &Token,
        body: &impl Serialize,
    ) -> Result<(u16, String), TwitchError> {
        let resp = self
            .http
            .post(url)
            .timeout(HTTP_TIMEOUT)
            .header("Authorization", format!("Bearer {}", token.access_token))
            .header("Client-Id", &self.client_id)
            .json(body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let resp_body = resp.text().await?;
        Ok((status, resp_body))
    }
}
