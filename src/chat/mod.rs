//! Request dispatcher: resolves the model, assembles messages, calls the
//! backend and folds every outcome into a [`ChatResult`].

pub mod models;
pub mod session;

#[cfg(test)]
pub(crate) mod test_utils;

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::llm::{ChatBackend, ChatError, Message};

fn default_model() -> String {
    "auto".to_string()
}

/// A single chat turn as received from the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub prompt: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub history: Vec<Message>,
}

impl ChatRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: default_model(),
            history: Vec::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_history(mut self, history: Vec<Message>) -> Self {
        self.history = history;
        self
    }

    /// Rejects blank prompts before anything is dispatched.
    pub fn validate(&self) -> Result<()> {
        if self.prompt.trim().is_empty() {
            anyhow::bail!("Message is required and must not be empty");
        }
        Ok(())
    }
}

/// Uniform outcome of a chat call. Failures are values, never errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatResult {
    pub success: bool,
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ChatResult {
    pub fn success(response: String, model: String) -> Self {
        Self {
            success: true,
            response,
            model: Some(model),
        }
    }

    /// The model is only reported when the provider actually answered.
    pub fn failure(error: &ChatError, model: String) -> Self {
        Self {
            success: false,
            response: error.to_string(),
            model: error.reached_provider().then_some(model),
        }
    }

    pub fn is_quota_error(&self) -> bool {
        !self.success && self.response.to_lowercase().contains("quota")
    }
}

/// Snapshot for `devwell-chat health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub provider_available: bool,
    pub backend: String,
    pub default_model: String,
}

pub struct Chatbot {
    backend: Box<dyn ChatBackend>,
    system_prompt: String,
}

impl Chatbot {
    pub fn new(backend: Box<dyn ChatBackend>, system_prompt: impl Into<String>) -> Self {
        Self {
            backend,
            system_prompt: system_prompt.into(),
        }
    }

    /// System prompt, then history in order, then the new user message.
    pub fn build_messages(&self, history: &[Message], prompt: &str) -> Vec<Message> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(self.system_prompt.as_str()));
        messages.extend_from_slice(history);
        messages.push(Message::user(prompt));
        messages
    }

    pub async fn chat(&self, request: &ChatRequest) -> ChatResult {
        let resolved = models::resolve(&request.model);
        let messages = self.build_messages(&request.history, &request.prompt);

        match self.backend.complete(&resolved.backend, &messages).await {
            Ok(text) => {
                info!(
                    "Chat reply from {} ({}): {} chars",
                    resolved.reported,
                    resolved.backend,
                    text.len()
                );
                ChatResult::success(text, resolved.reported)
            }
            Err(e) => {
                warn!("Chat request failed ({}): {e}", resolved.backend);
                ChatResult::failure(&e, resolved.reported)
            }
        }
    }

    pub fn health(&self, default_model: &str) -> HealthStatus {
        HealthStatus {
            status: "healthy".to_string(),
            provider_available: self.backend.is_configured(),
            backend: self.backend.description(),
            default_model: default_model.to_string(),
        }
    }
}

/// Reads a JSON array of `{role, content}` objects.
pub fn load_history(path: &Path) -> Result<Vec<Message>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read history file {}", path.display()))?;
    let history: Vec<Message> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid history file {}", path.display()))?;
    Ok(history)
}
