//! HttpCompletionClient - JSON-over-HTTP client for the chat completion endpoint.
//!
//! Posts `{ prompt, mode, imageName?, imageData? }` and reads back
//! `{ response }` (or `{ message }`). Every failure is mapped onto one of the
//! three completion error kinds; nothing is retried here.

use async_trait::async_trait;
use charla_core::completion::{
    CompletionClient, CompletionReply, CompletionRequest, parse_reply_body,
};
use charla_core::config::EngineConfig;
use charla_core::error::{ChatError, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// Client implementation that talks to the completion endpoint over HTTP.
#[derive(Clone)]
pub struct HttpCompletionClient {
    client: Client,
    endpoint: String,
}

impl HttpCompletionClient {
    /// Creates a client for `endpoint` with a per-request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let endpoint = endpoint.into();
        reqwest::Url::parse(&endpoint)
            .map_err(|err| ChatError::config(format!("Invalid endpoint '{endpoint}': {err}")))?;
        if timeout.is_zero() {
            return Err(ChatError::config("Request timeout must be positive"));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ChatError::config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self { client, endpoint })
    }

    /// Creates a client from the engine configuration.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Self::new(config.endpoint.clone(), config.request_timeout())
    }

    async fn send_request(&self, body: &CompletionRequest) -> Result<CompletionReply> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| ChatError::network(format!("Completion request failed: {err}")))?;

        let status = response.status();
        let body_text = response
            .text()
            .await
            .map_err(|err| ChatError::network(format!("Failed to read completion body: {err}")))?;

        if !status.is_success() {
            return Err(map_http_error(status, body_text));
        }

        parse_reply_body(&body_text)
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionReply> {
        tracing::debug!(
            "[CompletionClient] POST {} (mode: {}, image: {})",
            self.endpoint,
            request.mode,
            request.image_name.as_deref().unwrap_or("-")
        );

        let result = self.send_request(request).await;
        if let Err(err) = &result {
            tracing::debug!("[CompletionClient] request failed ({}): {}", err.kind(), err);
        }
        result
    }
}

#[derive(Deserialize)]
struct ErrorResponse {
    #[serde(alias = "message")]
    error: String,
}

fn map_http_error(status: StatusCode, body: String) -> ChatError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error)
        .unwrap_or(body);

    let message = if message.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("empty error body")
            .to_string()
    } else {
        message
    };

    ChatError::service(status.as_u16(), message)
}
