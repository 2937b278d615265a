//! `ChatBackend` trait: abstraction over the hosted completion API.
//!
//! The dispatcher only talks to this trait, so tests can swap the
//! HTTP client for an in-memory backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ChatError;

/// Author of a conversation message.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One `{role, content}` entry of the `messages` array.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Sends the full message list for `model` and returns the reply text.
    ///
    /// `messages` already contains the system prompt and history; the
    /// backend forwards it as-is.
    async fn complete(&self, model: &str, messages: &[Message]) -> Result<String, ChatError>;

    /// Whether a credential is available. Does not contact the provider.
    fn is_configured(&self) -> bool;

    /// Human-readable description of the backend, e.g. `"openrouter (https://openrouter.ai/api/v1)"`.
    fn description(&self) -> String;
}
