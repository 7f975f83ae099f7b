//! Model registry — the static table of supported models and their vendors.
//!
//! The set of valid model identifiers is exactly the key set of [`MODELS`].
//! Every entry belongs to exactly one [`Provider`].

use std::fmt;

use serde::{Deserialize, Serialize};

use amlassist_core::config::{ANTHROPIC_KEY_VAR, GOOGLE_KEY_VAR, OPENAI_KEY_VAR};

// ─────────────────────────────────────────────
// Provider
// ─────────────────────────────────────────────

/// The closed set of hosted-LLM vendors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAI,
    Anthropic,
    Google,
}

impl Provider {
    /// All vendors, in display order.
    pub const ALL: [Provider; 3] = [Provider::OpenAI, Provider::Anthropic, Provider::Google];

    /// Config/section name (e.g. `"openai"`).
    pub fn name(self) -> &'static str {
        match self {
            Provider::OpenAI => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Google => "google",
        }
    }

    /// Human-readable name for logs and the CLI.
    pub fn display_name(self) -> &'static str {
        match self {
            Provider::OpenAI => "OpenAI",
            Provider::Anthropic => "Anthropic",
            Provider::Google => "Google",
        }
    }

    /// Conventional environment variable holding the vendor's API key.
    pub fn env_key(self) -> &'static str {
        match self {
            Provider::OpenAI => OPENAI_KEY_VAR,
            Provider::Anthropic => ANTHROPIC_KEY_VAR,
            Provider::Google => GOOGLE_KEY_VAR,
        }
    }

    /// OpenAI-compatible API base used when the config does not set one.
    pub fn default_api_base(self) -> &'static str {
        match self {
            Provider::OpenAI => "https://api.openai.com/v1",
            Provider::Anthropic => "https://api.anthropic.com/v1",
            Provider::Google => "https://generativelanguage.googleapis.com/v1beta/openai",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─────────────────────────────────────────────
// ModelConfig
// ─────────────────────────────────────────────

/// Static metadata for one supported model.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelConfig {
    pub provider: Provider,
    /// Model identifier sent to the vendor API.
    pub model: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    /// Output token ceiling for this model, if narrower than the request default.
    pub max_tokens: Option<u32>,
}

/// Model used when neither the caller nor the config picks one.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Every supported model.
pub static MODELS: &[ModelConfig] = &[
    ModelConfig {
        provider: Provider::OpenAI,
        model: "gpt-4o",
        display_name: "GPT-4o",
        description: "OpenAI flagship multimodal model",
        max_tokens: Some(16_384),
    },
    ModelConfig {
        provider: Provider::OpenAI,
        model: "gpt-4o-mini",
        display_name: "GPT-4o mini",
        description: "Fast, inexpensive model for everyday questions",
        max_tokens: Some(16_384),
    },
    ModelConfig {
        provider: Provider::OpenAI,
        model: "gpt-4.1",
        display_name: "GPT-4.1",
        description: "Long-context model with strong tool use",
        max_tokens: Some(32_768),
    },
    ModelConfig {
        provider: Provider::Anthropic,
        model: "claude-sonnet-4-20250514",
        display_name: "Claude Sonnet 4",
        description: "Balanced reasoning and speed",
        max_tokens: Some(8_192),
    },
    ModelConfig {
        provider: Provider::Anthropic,
        model: "claude-3-5-haiku-20241022",
        display_name: "Claude 3.5 Haiku",
        description: "Lightweight Anthropic model for quick lookups",
        max_tokens: Some(8_192),
    },
    ModelConfig {
        provider: Provider::Google,
        model: "gemini-2.0-flash",
        display_name: "Gemini 2.0 Flash",
        description: "Low-latency Google model",
        max_tokens: None,
    },
    ModelConfig {
        provider: Provider::Google,
        model: "gemini-2.5-pro",
        display_name: "Gemini 2.5 Pro",
        description: "Google's most capable reasoning model",
        max_tokens: None,
    },
];

// ─────────────────────────────────────────────
// Lookups
// ─────────────────────────────────────────────

/// Whether `id` is a supported model.
pub fn is_valid_model(id: &str) -> bool {
    get_model_config(id).is_some()
}

/// Look up a model; `None` for unknown identifiers.
pub fn get_model_config(id: &str) -> Option<&'static ModelConfig> {
    MODELS.iter().find(|m| m.model == id)
}

/// The vendor serving `id`, if the model is known.
pub fn get_provider_for_model(id: &str) -> Option<Provider> {
    get_model_config(id).map(|m| m.provider)
}

/// All models served by `provider` (empty if none are configured).
pub fn get_models_by_provider(provider: Provider) -> Vec<&'static ModelConfig> {
    MODELS.iter().filter(|m| m.provider == provider).collect()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
