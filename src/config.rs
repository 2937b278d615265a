use serde::Deserialize;
use std::path::Path;
use tracing::warn;

/// Environment variable holding the OpenRouter credential.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

const DEFAULT_SYSTEM_PROMPT: &str = "You are DevWell AI Assistant. You help developers \
improve their health, productivity, and coding skills. Provide practical advice on \
work-life balance, ergonomics, code quality, and the latest development trends.";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Supports ${ENV_VAR} substitution. Falls back to OPENROUTER_API_KEY when absent.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Sent as `HTTP-Referer` for OpenRouter app attribution
    #[serde(default = "default_referer")]
    pub referer: String,
    /// Sent as `X-Title`
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssistantConfig {
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Messages kept by the interactive session
    #[serde(default = "default_max_history")]
    pub max_history: usize,
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_referer() -> String {
    "http://localhost:5173".to_string()
}

fn default_title() -> String {
    "DevWell AI Assistant".to_string()
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_model() -> String {
    "auto".to_string()
}

fn default_max_history() -> usize {
    20
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            referer: default_referer(),
            title: default_title(),
            timeout_secs: None,
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            default_model: default_model(),
            max_history: default_max_history(),
        }
    }
}

impl ProviderConfig {
    /// Returns the credential, preferring the config value over the environment.
    ///
    /// Empty values count as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        pick_api_key(self.api_key.as_deref(), std::env::var(API_KEY_ENV).ok())
    }

    /// Full URL of the chat completions endpoint
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// A blank config value falls through to the environment; a blank
/// environment value is as good as none.
fn pick_api_key(configured: Option<&str>, env: Option<String>) -> Option<String> {
    configured
        .filter(|key| !key.trim().is_empty())
        .map(str::to_string)
        .or(env)
        .filter(|key| !key.trim().is_empty())
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Loads `path` when it exists. A missing file is only an error when
    /// the caller asked for it explicitly.
    pub fn load_or_default(path: &Path, explicit: bool) -> anyhow::Result<Self> {
        if !explicit && !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        // Expand environment variables like ${OPENROUTER_API_KEY}.
        // Unset ones become empty so a missing key surfaces at call time.
        let expanded = shellexpand::env_with_context_no_errors(content, |var| {
            Some(std::env::var(var).unwrap_or_else(|_| {
                warn!("Config references unset environment variable ${{{var}}}");
                String::new()
            }))
        });
        let config: Config = toml::from_str(&expanded)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let url = url::Url::parse(&self.provider.base_url)
            .map_err(|e| anyhow::anyhow!("Invalid provider.base_url '{}': {e}", self.provider.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!(
                "provider.base_url must be http or https, got '{}'",
                url.scheme()
            );
        }
        if self.assistant.max_history == 0 {
            anyhow::bail!("assistant.max_history must be greater than zero");
        }
        Ok(())
    }
}
