//! Configuration system — schema, loading, and env var overrides.
//!
//! # Usage
//! ```no_run
//! use amlassist_core::config;
//!
//! let cfg = config::load_config(None);
//! println!("Model: {}", cfg.agents.defaults.model);
//! ```

pub mod loader;
pub mod schema;

pub use loader::{apply_env_overrides, get_config_path, load_config, save_config};
pub use schema::{
    AgentDefaults, BackendConfig, BillingConfig, Config, ProviderConfig, ProvidersConfig,
    ANTHROPIC_KEY_VAR, GOOGLE_KEY_VAR, OPENAI_KEY_VAR,
};
