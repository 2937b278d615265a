mod chat;
mod config;
mod llm;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::chat::models::{self, EXPLICIT_PREFIX, MODEL_TABLE};
use crate::chat::session::{ChatSession, SessionReply};
use crate::chat::{ChatRequest, Chatbot};
use crate::config::Config;
use crate::llm::OpenRouterClient;

const DEFAULT_CONFIG_PATH: &str = "config/chat.toml";

/// DevWell AI assistant: health, productivity and coding advice via OpenRouter.
///
/// The credential is read from OPENROUTER_API_KEY (a `.env` file in the
/// working directory is loaded first) or from `provider.api_key` in the config.
/// Set RUST_LOG (e.g. `devwell_chat=debug`) to control logging on stderr.
#[derive(Parser, Debug)]
#[command(name = "devwell-chat", version, about, long_about)]
struct Cli {
    /// Path to TOML configuration file [default: config/chat.toml, optional]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send one prompt and print the reply
    Ask {
        /// The message to send
        prompt: String,
        /// auto, llama, qwen, gemini, openrouter or openrouter:<model-id>
        #[arg(short, long)]
        model: Option<String>,
        /// JSON file with previous messages: [{"role": "user", "content": "..."}]
        #[arg(long)]
        history: Option<PathBuf>,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Report whether the provider credential is configured
    Health,
    /// List model aliases and the models they map to
    Models,
    /// Interactive conversation with running history
    Repl {
        #[arg(short, long)]
        model: Option<String>,
    },
}

#[derive(Serialize)]
struct Capabilities {
    models: &'static [models::ModelAlias],
    explicit: String,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Optional .env with OPENROUTER_API_KEY
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for replies and JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("devwell_chat=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => Config::load_or_default(path, true)?,
        None => Config::load_or_default(Path::new(DEFAULT_CONFIG_PATH), false)?,
    };

    match cli.command {
        Command::Ask {
            prompt,
            model,
            history,
            json,
        } => {
            let history = match history {
                Some(path) => chat::load_history(&path)?,
                None => Vec::new(),
            };
            let model = model.unwrap_or_else(|| config.assistant.default_model.clone());
            let request = ChatRequest::new(prompt)
                .with_model(model)
                .with_history(history);
            run_ask(&config, request, json).await
        }
        Command::Health => {
            let chatbot = build_chatbot(&config)?;
            let health = chatbot.health(&config.assistant.default_model);
            println!("{}", serde_json::to_string_pretty(&health)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Models => {
            let capabilities = Capabilities {
                models: MODEL_TABLE,
                explicit: format!("{EXPLICIT_PREFIX}<model-id>"),
            };
            println!("{}", serde_json::to_string_pretty(&capabilities)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Repl { model } => {
            let model = model.unwrap_or_else(|| config.assistant.default_model.clone());
            run_repl(&config, model).await
        }
    }
}

fn build_chatbot(config: &Config) -> Result<Chatbot> {
    let backend = OpenRouterClient::new(config.provider.clone())?;
    Ok(Chatbot::new(
        Box::new(backend),
        config.assistant.system_prompt.clone(),
    ))
}

fn warn_unknown_model(model: &str) {
    if !models::is_known(model) {
        warn!(
            "Unknown model '{model}', falling back to {}",
            models::DEFAULT_MODEL
        );
    }
}

async fn run_ask(config: &Config, request: ChatRequest, json: bool) -> Result<ExitCode> {
    request.validate()?;
    warn_unknown_model(&request.model);

    let chatbot = build_chatbot(config)?;
    info!(
        "Sending prompt ({} chars, {} history messages) to model '{}'",
        request.prompt.len(),
        request.history.len(),
        request.model
    );
    let result = chatbot.chat(&request).await;

    if result.is_quota_error() {
        warn!("API quota exceeded. Please wait a few minutes or try a different model.");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if result.success {
        println!("{}", result.response);
    } else {
        eprintln!("{}", result.response);
    }

    Ok(if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn run_repl(config: &Config, model: String) -> Result<ExitCode> {
    warn_unknown_model(&model);
    let chatbot = build_chatbot(config)?;
    let mut session = ChatSession::new(chatbot, model, config.assistant.max_history);

    println!(
        "DevWell AI Assistant v{} ({}). Type /help for commands.",
        env!("CARGO_PKG_VERSION"),
        session.model()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match session.handle_input(&line).await {
            SessionReply::Text(text) => println!("{text}"),
            SessionReply::Failed(text) => eprintln!("{text}"),
            SessionReply::Ignored => {}
            SessionReply::Quit => break,
        }
    }

    info!("Session ended with {} messages", session.history().len());
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask() {
        let cli = Cli::parse_from([
            "devwell-chat",
            "ask",
            "How do I sit?",
            "--model",
            "qwen",
            "--json",
        ]);
        match cli.command {
            Command::Ask {
                prompt,
                model,
                history,
                json,
            } => {
                assert_eq!(prompt, "How do I sit?");
                assert_eq!(model.as_deref(), Some("qwen"));
                assert!(history.is_none());
                assert!(json);
            }
            other => panic!("expected ask, got {other:?}"),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::parse_from(["devwell-chat", "health", "--config", "/tmp/chat.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/chat.toml")));
        assert!(matches!(cli.command, Command::Health));
    }

    #[test]
    fn test_capabilities_listing() {
        let capabilities = Capabilities {
            models: MODEL_TABLE,
            explicit: format!("{EXPLICIT_PREFIX}<model-id>"),
        };
        let json = serde_json::to_value(&capabilities).unwrap();
        let names: Vec<&str> = json["models"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["auto", "openrouter", "gemini", "llama", "qwen"]);
        assert_eq!(json["explicit"], "openrouter:<model-id>");
    }

    #[tokio::test]
    async fn test_ask_rejects_blank_prompt() {
        let result = run_ask(&Config::default(), ChatRequest::new("  "), false).await;
        assert!(result.is_err());
    }
}
