//! Config loader — reads `~/.amlassist/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.amlassist/config.json`
//! 3. Environment variables `AMLASSIST_<SECTION>__<FIELD>` (override JSON)
//! 4. Vendor conventional keys (`OPENAI_API_KEY`, …) fill a still-empty API key

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::{Config, ProviderConfig};

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from `path` (or the default path) + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    apply_env_overrides(load_config_from_path(&config_path))
}

/// Read and parse a config file without applying env overrides.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            Config::default()
        }
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: Config) -> Config {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

/// Apply overrides using `lookup` as the variable source.
///
/// Supported overrides:
/// - `AMLASSIST_AGENTS__DEFAULTS__MODEL|MAX_TOKENS|TEMPERATURE|MAX_TOOL_ITERATIONS|SYSTEM_PROMPT`
/// - `AMLASSIST_PROVIDERS__<NAME>__API_KEY|API_BASE`
/// - `AMLASSIST_BACKEND__API_URL|APP_URL|TIMEOUT_SECS`
/// - `AMLASSIST_BILLING__API_URL`
/// - `OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, `GOOGLE_GENERATIVE_AI_API_KEY`
pub fn apply_overrides_from<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = &mut config.agents.defaults;
    if let Some(val) = lookup("AMLASSIST_AGENTS__DEFAULTS__MODEL") {
        defaults.model = val;
    }
    if let Some(n) = lookup("AMLASSIST_AGENTS__DEFAULTS__MAX_TOKENS").and_then(|v| v.parse().ok()) {
        defaults.max_tokens = n;
    }
    if let Some(t) = lookup("AMLASSIST_AGENTS__DEFAULTS__TEMPERATURE").and_then(|v| v.parse().ok()) {
        defaults.temperature = t;
    }
    if let Some(n) =
        lookup("AMLASSIST_AGENTS__DEFAULTS__MAX_TOOL_ITERATIONS").and_then(|v| v.parse().ok())
    {
        defaults.max_tool_iterations = n;
    }
    if let Some(val) = lookup("AMLASSIST_AGENTS__DEFAULTS__SYSTEM_PROMPT") {
        defaults.system_prompt = val;
    }

    for (name, key_var, provider) in config.providers.sections_mut() {
        apply_provider_env(provider, name, &lookup);
        if !provider.is_configured() {
            if let Some(key) = lookup(key_var).filter(|k| !k.is_empty()) {
                debug!(provider = name, "using API key from {}", key_var);
                provider.api_key = key;
            }
        }
    }

    if let Some(val) = lookup("AMLASSIST_BACKEND__API_URL") {
        config.backend.api_url = val;
    }
    if let Some(val) = lookup("AMLASSIST_BACKEND__APP_URL") {
        config.backend.app_url = val;
    }
    if let Some(n) = lookup("AMLASSIST_BACKEND__TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
        config.backend.timeout_secs = n;
    }
    if let Some(val) = lookup("AMLASSIST_BILLING__API_URL") {
        config.billing.api_url = val;
    }

    config
}

fn apply_provider_env<F>(provider: &mut ProviderConfig, name: &str, lookup: &F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup(&format!("AMLASSIST_PROVIDERS__{name}__API_KEY")) {
        provider.api_key = val;
    }
    if let Some(val) = lookup(&format!("AMLASSIST_PROVIDERS__{name}__API_BASE")) {
        provider.api_base = Some(val);
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
