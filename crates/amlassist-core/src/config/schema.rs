//! Configuration schema.
//!
//! Hierarchy: `Config` → `AgentsConfig`, `ProvidersConfig`, `BackendConfig`,
//! `BillingConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.amlassist/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub agents: AgentsConfig,
    pub providers: ProvidersConfig,
    pub backend: BackendConfig,
    pub billing: BillingConfig,
}

// ─────────────────────────────────────────────
// Agents
// ─────────────────────────────────────────────

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentsConfig {
    pub defaults: AgentDefaults,
}

/// Defaults applied to every assistant turn.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentDefaults {
    /// Model used when the caller does not pick one.
    pub model: String,
    /// Maximum tokens to generate per response.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
    /// Maximum model ⇄ tool round trips before giving up on a turn.
    pub max_tool_iterations: u32,
    /// System prompt sent first in every turn.
    pub system_prompt: String,
}

impl Default for AgentDefaults {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 4096,
            temperature: 0.3,
            max_tool_iterations: 8,
            system_prompt: "You are an assistant for anti-money-laundering case management. \
                            Use the available tools to look up clients, transactions, alerts \
                            and reports before answering."
                .to_string(),
        }
    }
}

// ─────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────

/// Credentials and endpoint for one LLM vendor.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: String,
    /// Custom API base URL (overrides the vendor default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Extra HTTP headers to send with each request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_headers: Option<HashMap<String, String>>,
}

impl ProviderConfig {
    /// Whether this vendor has a credential.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// One `ProviderConfig` per supported vendor.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub openai: ProviderConfig,
    #[serde(default)]
    pub anthropic: ProviderConfig,
    #[serde(default)]
    pub google: ProviderConfig,
}

/// Conventional environment variables holding each vendor's API key.
pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";
pub const ANTHROPIC_KEY_VAR: &str = "ANTHROPIC_API_KEY";
pub const GOOGLE_KEY_VAR: &str = "GOOGLE_GENERATIVE_AI_API_KEY";

impl ProvidersConfig {
    /// Every vendor section with its `AMLASSIST_PROVIDERS__<NAME>` segment and
    /// conventional key variable.
    pub fn sections_mut(&mut self) -> [(&'static str, &'static str, &mut ProviderConfig); 3] {
        let ProvidersConfig {
            openai,
            anthropic,
            google,
        } = self;
        [
            ("OPENAI", OPENAI_KEY_VAR, openai),
            ("ANTHROPIC", ANTHROPIC_KEY_VAR, anthropic),
            ("GOOGLE", GOOGLE_KEY_VAR, google),
        ]
    }
}

// ─────────────────────────────────────────────
// Backend
// ─────────────────────────────────────────────

/// The case-management REST backend the tools call.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackendConfig {
    /// Base URL of the REST API (e.g. `https://api.example.com`).
    pub api_url: String,
    /// Base URL of the dashboard, used for deep links in tool output.
    pub app_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_string(),
            app_url: "http://localhost:3000".to_string(),
            timeout_secs: 30,
        }
    }
}

// ─────────────────────────────────────────────
// Billing
// ─────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BillingConfig {
    /// Base URL of the billing service holding token quotas.
    pub api_url: String,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8081".to_string(),
        }
    }
}
