//! Model routing for the AML assistant.
//!
//! # Architecture
//!
//! - [`models`] — static table of supported models and the closed [`Provider`] enum
//! - [`http_provider::HttpProvider`] — OpenAI-compatible vendor client
//! - [`router::ProviderRouter`] — resolves a model id to a [`ModelHandle`],
//!   caching one client per vendor
//! - [`traits::LlmProvider`] — the client seam (mockable in tests)

pub mod http_provider;
pub mod models;
pub mod router;
pub mod traits;

pub use http_provider::HttpProvider;
pub use models::{
    get_model_config, get_models_by_provider, get_provider_for_model, is_valid_model,
    ModelConfig, Provider, DEFAULT_MODEL, MODELS,
};
pub use router::{GetModelOptions, ModelHandle, ProviderRouter, RouterError};
pub use traits::{LlmProvider, LlmRequestConfig};
