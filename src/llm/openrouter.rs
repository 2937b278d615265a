//! OpenRouter chat completions provider.
//!
//! Calls `POST {base_url}/chat/completions` with an OpenAI-style
//! `{model, messages}` body and classifies the decoded JSON:
//! - `error` object present → provider failure carrying its message.
//! - `choices` missing or empty, or no text in the first choice →
//!   invalid response carrying the raw payload.
//! - Otherwise → the text of the first choice.
//!
//! The HTTP status is not consulted. OpenRouter reports failures in the
//! body and we want its message rather than a bare status code.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use super::client::{ChatBackend, Message};
use super::ChatError;
use crate::config::ProviderConfig;

/// `/chat/completions` request body.
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
}

/// Client for the OpenRouter API.
pub struct OpenRouterClient {
    client: Client,
    config: ProviderConfig,
    api_key: Option<String>,
}

impl OpenRouterClient {
    /// Creates a client, taking the credential from the config or `OPENROUTER_API_KEY`.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let api_key = config.resolve_api_key();
        Self::with_api_key(config, api_key)
    }

    pub fn with_api_key(config: ProviderConfig, api_key: Option<String>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            client: builder.build()?,
            config,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }
}

#[async_trait]
impl ChatBackend for OpenRouterClient {
    async fn complete(&self, model: &str, messages: &[Message]) -> Result<String, ChatError> {
        let api_key = self.api_key.as_deref().ok_or(ChatError::MissingApiKey)?;

        let request = CompletionRequest { model, messages };
        let url = self.config.completions_url();

        debug!("Calling OpenRouter ({model}) with {} messages", messages.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let data: Value = serde_json::from_str(&body)
            .map_err(|e| ChatError::Decode(format!("{e} (HTTP {status})")))?;

        let text = classify_reply(&data)?;
        info!("OpenRouter response ({model}): {} chars", text.len());
        Ok(text)
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn description(&self) -> String {
        format!("openrouter ({})", self.config.base_url)
    }
}

/// Maps a decoded completions payload to the reply text or a failure.
pub fn classify_reply(data: &Value) -> Result<String, ChatError> {
    if let Some(error) = data.get("error").filter(|e| !e.is_null()) {
        let message = error
            .as_str()
            .or_else(|| error.get("message").and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(ChatError::Provider(message));
    }

    data.get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.pointer("/message/content"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ChatError::InvalidResponse(data.to_string()))
}
