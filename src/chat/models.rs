//! Logical model names and their OpenRouter model ids.

use serde::Serialize;

/// Backend model used by every alias except `qwen`, and for unknown names.
pub const DEFAULT_MODEL: &str = "meta-llama/llama-3.3-70b-instruct:free";
pub const QWEN_MODEL: &str = "qwen/qwen-2.5-7b-instruct:free";

/// `openrouter:<model-id>` bypasses the table.
pub const EXPLICIT_PREFIX: &str = "openrouter:";

/// Reported name when the requested alias is not in the table.
const FALLBACK_NAME: &str = "openrouter";

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ModelAlias {
    pub name: &'static str,
    pub backend: &'static str,
    pub description: &'static str,
}

pub const MODEL_TABLE: &[ModelAlias] = &[
    ModelAlias {
        name: "auto",
        backend: DEFAULT_MODEL,
        description: "Recommended. Llama 3.3 70B via OpenRouter",
    },
    ModelAlias {
        name: "openrouter",
        backend: DEFAULT_MODEL,
        description: "OpenRouter default model",
    },
    ModelAlias {
        name: "gemini",
        backend: DEFAULT_MODEL,
        description: "Legacy alias, served by the default model",
    },
    ModelAlias {
        name: "llama",
        backend: DEFAULT_MODEL,
        description: "Llama 3.3 70B Instruct",
    },
    ModelAlias {
        name: "qwen",
        backend: QWEN_MODEL,
        description: "Qwen 2.5 7B Instruct",
    },
];

/// Outcome of resolving a logical name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedModel {
    /// Model id sent to the provider
    pub backend: String,
    /// Name echoed back in `ChatResult.model`
    pub reported: String,
}

fn lookup(name: &str) -> Option<&'static ModelAlias> {
    MODEL_TABLE.iter().find(|alias| alias.name == name)
}

fn explicit_model(name: &str) -> Option<&str> {
    name.strip_prefix(EXPLICIT_PREFIX).filter(|m| !m.is_empty())
}

/// Resolves a logical name. Never fails: unknown names get the default model.
pub fn resolve(name: &str) -> ResolvedModel {
    if let Some(model) = explicit_model(name) {
        return ResolvedModel {
            backend: model.to_string(),
            reported: model.to_string(),
        };
    }

    match lookup(name) {
        Some(alias) => ResolvedModel {
            backend: alias.backend.to_string(),
            reported: alias.name.to_string(),
        },
        None => ResolvedModel {
            backend: DEFAULT_MODEL.to_string(),
            reported: FALLBACK_NAME.to_string(),
        },
    }
}

/// Whether `name` is a table alias or a non-empty explicit model.
pub fn is_known(name: &str) -> bool {
    explicit_model(name).is_some() || lookup(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        for name in ["auto", "openrouter", "gemini", "llama"] {
            let r = resolve(name);
            assert_eq!(r.backend, DEFAULT_MODEL, "alias {name}");
            assert_eq!(r.reported, name);
        }
        let qwen = resolve("qwen");
        assert_eq!(qwen.backend, QWEN_MODEL);
        assert_eq!(qwen.reported, "qwen");
    }

    #[test]
    fn test_unknown_falls_back() {
        let r = resolve("gpt-9");
        assert_eq!(r.backend, DEFAULT_MODEL);
        assert_eq!(r.reported, "openrouter");
        assert!(!is_known("gpt-9"));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(resolve("Llama").reported, "openrouter");
    }

    #[test]
    fn test_explicit_model() {
        let r = resolve("openrouter:mistralai/mistral-7b-instruct:free");
        // Only the first ':' separates the prefix
        assert_eq!(r.backend, "mistralai/mistral-7b-instruct:free");
        assert_eq!(r.reported, "mistralai/mistral-7b-instruct:free");
        assert!(is_known("openrouter:anything"));
    }

    #[test]
    fn test_empty_explicit_model_is_unknown() {
        let r = resolve("openrouter:");
        assert_eq!(r.backend, DEFAULT_MODEL);
        assert_eq!(r.reported, "openrouter");
        assert!(!is_known("openrouter:"));
    }

    #[test]
    fn test_table_names_are_unique() {
        for (i, a) in MODEL_TABLE.iter().enumerate() {
            assert!(MODEL_TABLE[i + 1..].iter().all(|b| b.name != a.name));
        }
    }
}
