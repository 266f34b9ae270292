//! HTTP implementation of the outbound [`Messenger`].

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::ClientBuilder;
use serde_json::json;
use tracing::{debug, warn};

use parley_core::{ApiError, ApiResult, DialogToken, Messenger};

use crate::config::ClientConfig;

/// Outbound messenger posting dialog messages over HTTP.
///
/// Sends `POST {api_url}/bots/sendDialogMessage` with a JSON body of
/// `{ "dialogToken": ..., "text": ... }` and an optional bearer token.
/// Transport-level failures are retried per the configured
/// [`RetryPolicy`](crate::config::RetryPolicy); server rejections are
/// returned as [`ApiError::Rejected`] without retrying.
pub struct HttpMessenger {
    client: reqwest::Client,
    config: ClientConfig,
    send_url: String,
}

impl HttpMessenger {
    /// Creates a messenger from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let client = ClientBuilder::new()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let send_url = format!(
            "{}/bots/sendDialogMessage",
            config.api_url.trim_end_matches('/')
        );

        Ok(Self {
            client,
            config,
            send_url,
        })
    }

    /// Returns the configured API base URL.
    pub fn api_url(&self) -> &str {
        &self.config.api_url
    }

    async fn post_message(&self, dialog_token: &DialogToken, text: &str) -> ApiResult<()> {
        let body = json!({
            "dialogToken": dialog_token,
            "text": text,
        });

        let mut req = self.client.post(&self.send_url).json(&body);
        if let Some(token) = &self.config.access_token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout
            } else {
                ApiError::Transport(e.to_string())
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl Messenger for HttpMessenger {
    fn id(&self) -> &str {
        &self.config.api_url
    }

    async fn send_text(&self, dialog_token: &DialogToken, text: &str) -> ApiResult<()> {
        debug!(dialog_token = %dialog_token, "Sending dialog message");

        let mut attempt: u32 = 0;
        loop {
            match self.post_message(dialog_token, text).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    let retries_left = self
                        .config
                        .retry
                        .as_ref()
                        .is_some_and(|r| attempt < r.max_retries);

                    if !e.is_retryable() || !retries_left {
                        return Err(e);
                    }

                    attempt += 1;
                    let delay = self
                        .config
                        .retry
                        .as_ref()
                        .map(|r| r.delay_for(attempt))
                        .unwrap_or_default();

                    warn!(
                        dialog_token = %dialog_token,
                        attempt = attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Send failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_url_joins_without_double_slash() {
        let messenger = HttpMessenger::new(ClientConfig {
            api_url: "http://localhost:8080/".into(),
            ..ClientConfig::default()
        })
        .unwrap();

        assert_eq!(
            messenger.send_url,
            "http://localhost:8080/bots/sendDialogMessage"
        );
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        // Reserved TEST-NET address, nothing listens there.
        let messenger = HttpMessenger::new(ClientConfig {
            api_url: "http://192.0.2.1:9".into(),
            timeout_ms: 100,
            ..ClientConfig::default()
        })
        .unwrap();

        let err = messenger
            .send_text(&DialogToken::new("d1"), "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_) | ApiError::Timeout));
    }
}
