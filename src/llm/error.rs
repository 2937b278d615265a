//! Dispatcher failures.
//!
//! The `Display` text of each variant is exactly what ends up in
//! `ChatResult.response` when a call fails.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    /// No credential in the config file or the environment.
    #[error("OpenRouter API key not configured. Please add OPENROUTER_API_KEY to .env file.")]
    MissingApiKey,

    /// The provider answered with an `error` object.
    #[error("OpenRouter error: {0}")]
    Provider(String),

    /// The payload has no usable `choices`. Carries the raw JSON.
    #[error("Invalid response from OpenRouter: {0}")]
    InvalidResponse(String),

    /// Connection, TLS or body read failure.
    #[error("Error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body was not JSON.
    #[error("Error: {0}")]
    Decode(String),
}

impl ChatError {
    /// True when the provider was reached and answered with something we
    /// could inspect. Only these failures carry a model name.
    pub fn reached_provider(&self) -> bool {
        matches!(self, ChatError::Provider(_) | ChatError::InvalidResponse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_message() {
        assert_eq!(
            ChatError::MissingApiKey.to_string(),
            "OpenRouter API key not configured. Please add OPENROUTER_API_KEY to .env file."
        );
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(
            ChatError::Provider("No auth".into()).to_string(),
            "OpenRouter error: No auth"
        );
        assert_eq!(
            ChatError::InvalidResponse("{}".into()).to_string(),
            "Invalid response from OpenRouter: {}"
        );
        assert_eq!(ChatError::Decode("eof".into()).to_string(), "Error: eof");
    }

    #[test]
    fn test_reached_provider() {
        assert!(ChatError::Provider(String::new()).reached_provider());
        assert!(ChatError::InvalidResponse(String::new()).reached_provider());
        assert!(!ChatError::MissingApiKey.reached_provider());
        assert!(!ChatError::Decode(String::new()).reached_provider());
    }
}
