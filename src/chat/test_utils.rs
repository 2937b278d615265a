//! Shared test utilities for the `chat` module.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::llm::{ChatBackend, ChatError, Message};

/// One dispatched call: the backend model id and the full message list.
pub(crate) type RecordedCall = (String, Vec<Message>);

/// Backend with a pre-programmed queue of replies.
///
/// Replies are returned in FIFO order. Once the queue is exhausted every
/// call fails with `ChatError::Decode("no more mock responses")`.
pub(crate) struct MockBackend {
    replies: Mutex<VecDeque<Result<String, ChatError>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    configured: bool,
}

impl MockBackend {
    pub(crate) fn new(replies: Vec<Result<String, ChatError>>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from(replies)),
            calls: Arc::new(Mutex::new(Vec::new())),
            configured: true,
        }
    }

    pub(crate) fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new(vec![Err(ChatError::MissingApiKey)])
        }
    }

    /// Handle for inspecting calls after the backend has been moved into a `Chatbot`.
    pub(crate) fn call_handle(&self) -> Arc<Mutex<Vec<RecordedCall>>> {
        self.calls.clone()
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    async fn complete(&self, model: &str, messages: &[Message]) -> Result<String, ChatError> {
        self.calls
            .lock()
            .unwrap()
            .push((model.to_string(), messages.to_vec()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ChatError::Decode("no more mock responses".to_string())))
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    fn description(&self) -> String {
        "mock".to_string()
    }
}
