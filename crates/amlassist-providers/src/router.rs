//! Provider router — resolves a model id to an invocable [`ModelHandle`].
//!
//! The router owns a keyed cache holding at most one client per vendor.
//! A cached client is reused until a caller passes an explicit API key
//! override, which builds a fresh client and replaces the cached one.
//! Two concurrent first calls may both build a client; the last write wins
//! and both clients are equivalent.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;
use tracing::{debug, info};

use amlassist_core::config::{ProviderConfig, ProvidersConfig};
use amlassist_core::types::{LlmResponse, Message, ToolDefinition};

use crate::http_provider::HttpProvider;
use crate::models::{get_model_config, ModelConfig, Provider, MODELS};
use crate::traits::{LlmProvider, LlmRequestConfig};

/// Configuration mistakes surfaced by the router. Not transient; do not retry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouterError {
    #[error("unknown model '{0}'")]
    UnknownModel(String),
}

/// Options for [`ProviderRouter::get_model`].
#[derive(Clone, Debug, Default)]
pub struct GetModelOptions {
    /// Model id; the router's default model when `None`.
    pub model: Option<String>,
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub google_api_key: Option<String>,
}

impl GetModelOptions {
    pub fn model(model: impl Into<String>) -> Self {
        Self {
            model: Some(model.into()),
            ..Default::default()
        }
    }
}

// ─────────────────────────────────────────────
// ModelHandle
// ─────────────────────────────────────────────

/// A vendor client bound to one model id.
#[derive(Clone)]
pub struct ModelHandle {
    config: &'static ModelConfig,
    client: Arc<dyn LlmProvider>,
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("model", &self.config.model)
            .field("provider", &self.config.provider)
            .finish()
    }
}

impl ModelHandle {
    pub fn new(config: &'static ModelConfig, client: Arc<dyn LlmProvider>) -> Self {
        Self { config, client }
    }

    pub fn model_id(&self) -> &'static str {
        self.config.model
    }

    pub fn provider(&self) -> Provider {
        self.config.provider
    }

    pub fn config(&self) -> &'static ModelConfig {
        self.config
    }

    pub fn client(&self) -> &Arc<dyn LlmProvider> {
        &self.client
    }

    /// Run one chat completion, capping `max_tokens` at the model's ceiling.
    pub async fn chat(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        request: &LlmRequestConfig,
    ) -> LlmResponse {
        let mut request = request.clone();
        if let Some(cap) = self.config.max_tokens {
            request.max_tokens = request.max_tokens.min(cap);
        }
        self.client
            .chat(messages, tools, self.config.model, &request)
            .await
    }
}

// ─────────────────────────────────────────────
// ProviderRouter
// ─────────────────────────────────────────────

/// Routes model ids to vendor clients.
pub struct ProviderRouter {
    providers: ProvidersConfig,
    default_model: String,
    clients: RwLock<HashMap<Provider, Arc<HttpProvider>>>,
}

impl ProviderRouter {
    /// Create a router with an empty client cache.
    ///
    /// `providers` carries the environment-sourced credentials (see
    /// `amlassist_core::config::load_config`).
    pub fn new(providers: ProvidersConfig, default_model: impl Into<String>) -> Self {
        Self {
            providers,
            default_model: default_model.into(),
            clients: RwLock::new(HashMap::new()),
        }
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Resolve a model and bind it to its vendor client.
    ///
    /// Fails only for unknown models. Credential presence is not checked
    /// here; a missing key surfaces as a vendor authentication error when the
    /// handle is invoked.
    pub fn get_model(&self, options: GetModelOptions) -> Result<ModelHandle, RouterError> {
        let model_id = options
            .model
            .as_deref()
            .unwrap_or(self.default_model.as_str());

        let config = get_model_config(model_id)
            .ok_or_else(|| RouterError::UnknownModel(model_id.to_string()))?;

        let client = match config.provider {
            Provider::OpenAI => self.openai_client(options.openai_api_key.as_deref()),
            Provider::Anthropic => self.anthropic_client(options.anthropic_api_key.as_deref()),
            Provider::Google => self.google_client(options.google_api_key.as_deref()),
        };

        debug!(model = config.model, provider = %config.provider, "resolved model");
        Ok(ModelHandle::new(config, client))
    }

    pub fn openai_client(&self, api_key: Option<&str>) -> Arc<HttpProvider> {
        self.client_for(Provider::OpenAI, api_key)
    }

    pub fn anthropic_client(&self, api_key: Option<&str>) -> Arc<HttpProvider> {
        self.client_for(Provider::Anthropic, api_key)
    }

    pub fn google_client(&self, api_key: Option<&str>) -> Arc<HttpProvider> {
        self.client_for(Provider::Google, api_key)
    }

    /// Return the cached client, or build (and cache) one when none exists
    /// or an override key is supplied.
    fn client_for(&self, provider: Provider, api_key: Option<&str>) -> Arc<HttpProvider> {
        if api_key.is_none() {
            let cache = self.clients.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(client) = cache.get(&provider) {
                return Arc::clone(client);
            }
        }

        let config = self.provider_config(provider);
        let key = api_key.unwrap_or(config.api_key.as_str());
        let client = Arc::new(HttpProvider::new(provider, config, key));
        info!(
            provider = provider.display_name(),
            overridden = api_key.is_some(),
            "created vendor client"
        );

        self.clients
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(provider, Arc::clone(&client));
        client
    }

    fn provider_config(&self, provider: Provider) -> &ProviderConfig {
        match provider {
            Provider::OpenAI => &self.providers.openai,
            Provider::Anthropic => &self.providers.anthropic,
            Provider::Google => &self.providers.google,
        }
    }

    /// Whether an environment-sourced credential exists for `provider`.
    pub fn is_provider_configured(&self, provider: Provider) -> bool {
        self.provider_config(provider).is_configured()
    }

    /// Vendors with credentials present.
    pub fn configured_providers(&self) -> Vec<Provider> {
        Provider::ALL
            .into_iter()
            .filter(|p| self.is_provider_configured(*p))
            .collect()
    }

    /// Model ids that should be offered to users: those whose vendor is configured.
    pub fn available_models(&self) -> Vec<&'static str> {
        let configured = self.configured_providers();
        MODELS
            .iter()
            .filter(|m| configured.contains(&m.provider))
            .map(|m| m.model)
            .collect()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::get_models_by_provider;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn providers_with(openai: &str, anthropic: &str, google: &str) -> ProvidersConfig {
        let mut providers = ProvidersConfig::default();
        providers.openai.api_key = openai.to_string();
        providers.anthropic.api_key = anthropic.to_string();
        providers.google.api_key = google.to_string();
        providers
    }

    #[test]
    fn test_get_model_default() {
        let router = ProviderRouter::new(providers_with("sk-1", "", ""), "gpt-4o-mini");
        let handle = router.get_model(GetModelOptions::default()).unwrap();
        assert_eq!(handle.model_id(), "gpt-4o-mini");
        assert_eq!(handle.provider(), Provider::OpenAI);
    }

    #[test]
    fn test_get_model_unknown_is_error() {
        let router = ProviderRouter::new(ProvidersConfig::default(), "gpt-4o-mini");
        let err = router
            .get_model(GetModelOptions::model("llama-99b"))
            .unwrap_err();
        assert_eq!(err, RouterError::UnknownModel("llama-99b".into()));
        assert!(err.to_string().contains("llama-99b"));
    }

    #[test]
    fn test_get_model_unknown_default_is_error() {
        let router = ProviderRouter::new(ProvidersConfig::default(), "not-a-model");
        assert!(router.get_model(GetModelOptions::default()).is_err());
    }

    #[test]
    fn test_get_model_without_credentials_still_resolves() {
        let router = ProviderRouter::new(ProvidersConfig::default(), "gpt-4o-mini");
        let handle = router
            .get_model(GetModelOptions::model("claude-sonnet-4-20250514"))
            .unwrap();
        assert_eq!(handle.provider(), Provider::Anthropic);
        assert!(!router.is_provider_configured(Provider::Anthropic));
    }

    #[test]
    fn test_dispatch_matches_registry_for_every_model() {
        let router = ProviderRouter::new(providers_with("a", "b", "c"), "gpt-4o");
        for m in MODELS {
            let handle = router.get_model(GetModelOptions::model(m.model)).unwrap();
            assert_eq!(handle.provider(), m.provider);
            assert_eq!(handle.client().display_name(), m.provider.display_name());
        }
    }

    #[test]
    fn test_client_is_cached_per_vendor() {
        let router = ProviderRouter::new(providers_with("sk-env", "", ""), "gpt-4o");
        let first = router.openai_client(None);
        let second = router.openai_client(None);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.api_key(), "sk-env");

        let other_vendor = router.google_client(None);
        assert_eq!(other_vendor.provider(), Provider::Google);
    }

    #[test]
    fn test_override_key_replaces_cached_client() {
        let router = ProviderRouter::new(providers_with("sk-env", "", ""), "gpt-4o");
        let original = router.openai_client(None);
        let overridden = router.openai_client(Some("sk-tenant"));

        assert!(!Arc::ptr_eq(&original, &overridden));
        assert_eq!(overridden.api_key(), "sk-tenant");

        // The override is now the cached client.
        let after = router.openai_client(None);
        assert!(Arc::ptr_eq(&overridden, &after));
    }

    #[test]
    fn test_override_only_applies_to_resolved_vendor() {
        let router = ProviderRouter::new(providers_with("", "sk-ant-env", ""), "gpt-4o");
        let options = GetModelOptions {
            model: Some("claude-3-5-haiku-20241022".into()),
            openai_api_key: Some("sk-ignored".into()),
            ..Default::default()
        };
        router.get_model(options).unwrap();
        assert_eq!(router.anthropic_client(None).api_key(), "sk-ant-env");
    }

    #[test]
    fn test_configured_providers() {
        let router = ProviderRouter::new(providers_with("sk-1", "", "g-1"), "gpt-4o");
        assert_eq!(
            router.configured_providers(),
            vec![Provider::OpenAI, Provider::Google]
        );
        assert!(!router.is_provider_configured(Provider::Anthropic));
    }

    #[test]
    fn test_available_models_only_configured_vendor() {
        let router = ProviderRouter::new(providers_with("sk-1", "", ""), "gpt-4o");
        let available = router.available_models();

        let expected: Vec<&str> = get_models_by_provider(Provider::OpenAI)
            .iter()
            .map(|m| m.model)
            .collect();
        assert_eq!(available, expected);
        assert!(available.len() < MODELS.len());
    }

    #[test]
    fn test_no_credentials_no_models() {
        let router = ProviderRouter::new(ProvidersConfig::default(), "gpt-4o");
        assert!(router.configured_providers().is_empty());
        assert!(router.available_models().is_empty());
    }

    #[tokio::test]
    async fn test_handle_caps_max_tokens_and_uses_override_key() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer sk-ant-override"))
            .and(wiremock::matchers::body_partial_json(serde_json::json!({
                "model": "claude-3-5-haiku-20241022",
                "max_tokens": 8192
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "msg_1",
                "choices": [{ "message": { "content": "ok" }, "finish_reason": "stop" }],
                "usage": null
            })))
            .mount(&mock_server)
            .await;

        let mut providers = ProvidersConfig::default();
        providers.anthropic.api_base = Some(mock_server.uri());
        let router = ProviderRouter::new(providers, "gpt-4o");

        let handle = router
            .get_model(GetModelOptions {
                model: Some("claude-3-5-haiku-20241022".into()),
                anthropic_api_key: Some("sk-ant-override".into()),
                ..Default::default()
            })
            .unwrap();

        let request = LlmRequestConfig {
            max_tokens: 100_000,
            temperature: 0.2,
        };
        let resp = handle.chat(&[Message::user("hi")], None, &request).await;
        assert_eq!(resp.content.as_deref(), Some("ok"));
    }
}
