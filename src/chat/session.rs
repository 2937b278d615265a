use std::time::Instant;

use tracing::info;

use super::{models, ChatRequest, Chatbot};
use crate::llm::Message;

/// What the REPL should do with a line of input.
#[derive(Debug, PartialEq, Eq)]
pub enum SessionReply {
    /// Assistant reply or slash command output
    Text(String),
    /// The call failed; history is unchanged
    Failed(String),
    /// Blank line
    Ignored,
    Quit,
}

/// Interactive conversation over a [`Chatbot`].
///
/// Keeps the running history between turns. Slash commands are
/// intercepted here and never reach the provider.
pub struct ChatSession {
    chatbot: Chatbot,
    model: String,
    history: Vec<Message>,
    max_history: usize,
    start_time: Instant,
}

impl ChatSession {
    pub fn new(chatbot: Chatbot, model: impl Into<String>, max_history: usize) -> Self {
        Self {
            chatbot,
            model: model.into(),
            history: Vec::new(),
            max_history,
            start_time: Instant::now(),
        }
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn handle_input(&mut self, input: &str) -> SessionReply {
        let input = input.trim();
        if input.is_empty() {
            return SessionReply::Ignored;
        }
        if input.starts_with('/') {
            return self.handle_command(input);
        }

        let request = ChatRequest::new(input)
            .with_model(self.model.as_str())
            .with_history(self.history.clone());
        let result = self.chatbot.chat(&request).await;

        if !result.success {
            return SessionReply::Failed(result.response);
        }

        self.history.push(Message::user(input));
        self.history.push(Message::assistant(result.response.as_str()));
        self.trim_history();
        SessionReply::Text(result.response)
    }

    /// Keeps at most `max_history` recent messages, dropping whole
    /// user/assistant exchanges so the history never opens on a reply.
    fn trim_history(&mut self) {
        if self.history.len() > self.max_history {
            let excess = self.history.len() - self.max_history;
            let excess = excess + excess % 2;
            self.history.drain(..excess.min(self.history.len()));
        }
    }

    // ── Slash commands ────────────────────────────────────

    fn handle_command(&mut self, input: &str) -> SessionReply {
        let mut parts = input.splitn(2, ' ');
        let command = parts.next().unwrap_or_default().to_lowercase();
        let arg = parts.next().map(str::trim).unwrap_or_default();

        info!("Slash command: {command}");

        match command.as_str() {
            "/new" | "/reset" => {
                let cleared = self.history.len();
                self.history.clear();
                SessionReply::Text(format!("Started a new conversation ({cleared} messages cleared)"))
            }
            "/model" => SessionReply::Text(self.cmd_model(arg)),
            "/status" => SessionReply::Text(self.cmd_status()),
            "/help" => SessionReply::Text(Self::cmd_help()),
            "/quit" | "/exit" => SessionReply::Quit,
            _ => SessionReply::Text(format!(
                "Unknown command: {command}\nType /help for available commands."
            )),
        }
    }

    /// /model: show or switch the model
    fn cmd_model(&mut self, arg: &str) -> String {
        if arg.is_empty() {
            let resolved = models::resolve(&self.model);
            return format!("Current model: {} ({})", self.model, resolved.backend);
        }

        self.model = arg.to_string();
        let resolved = models::resolve(arg);
        if models::is_known(arg) {
            format!("Switched to {arg} ({})", resolved.backend)
        } else {
            format!(
                "Unknown model '{arg}', using the default ({})",
                resolved.backend
            )
        }
    }

    /// /status: session overview
    fn cmd_status(&self) -> String {
        let uptime = self.start_time.elapsed();
        let minutes = uptime.as_secs() / 60;
        let seconds = uptime.as_secs() % 60;
        let health = self.chatbot.health(&self.model);

        format!(
            "DevWell AI Assistant status\n\
             Uptime: {minutes}m {seconds}s\n\
             Backend: {}\n\
             Credential: {}\n\
             Model: {} ({})\n\
             History: {}/{} messages",
            health.backend,
            if health.provider_available { "configured" } else { "missing" },
            self.model,
            models::resolve(&self.model).backend,
            self.history.len(),
            self.max_history,
        )
    }

    /// /help: list available commands
    fn cmd_help() -> String {
        "\
Commands:\n\
  /new            Start a new conversation\n\
  /model [name]   Show or switch the model (auto, llama, qwen, openrouter:<id>)\n\
  /status         Backend, model and history size\n\
  /help           This message\n\
  /quit           Leave the session"
            .to_string()
    }
}
