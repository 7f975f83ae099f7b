//! Vendor HTTP client for OpenAI-compatible chat completion APIs.
//!
//! OpenAI, Anthropic and Google all expose a `/chat/completions` endpoint in
//! the OpenAI wire format, so one client type serves every [`Provider`];
//! the vendor only decides the base URL and the credential.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, error, warn};

use amlassist_core::config::ProviderConfig;
use amlassist_core::types::{
    ChatCompletionRequest, ChatCompletionResponse, LlmResponse, Message, ToolDefinition,
};

use crate::models::Provider;
use crate::traits::{LlmProvider, LlmRequestConfig};

/// Request timeout for vendor calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

// ─────────────────────────────────────────────
// HttpProvider
// ─────────────────────────────────────────────

/// Chat-completion client bound to one vendor and one API key.
pub struct HttpProvider {
    /// HTTP client (connection-pooled).
    client: reqwest::Client,
    provider: Provider,
    api_base: String,
    api_key: String,
    /// Extra headers sent with each request.
    extra_headers: HeaderMap,
}

impl std::fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("provider", &self.provider)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl HttpProvider {
    /// Build a client for `provider` using `api_key`.
    ///
    /// The API base comes from `config.api_base`, else the vendor default.
    pub fn new(provider: Provider, config: &ProviderConfig, api_key: &str) -> Self {
        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| provider.default_api_base().to_string());

        let mut extra_headers = HeaderMap::new();
        if let Some(ref headers) = config.extra_headers {
            for (key, value) in headers {
                if let (Ok(name), Ok(val)) = (
                    HeaderName::from_bytes(key.as_bytes()),
                    HeaderValue::from_str(value),
                ) {
                    extra_headers.insert(name, val);
                } else {
                    warn!("Invalid header: {}={}", key, value);
                }
            }
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        HttpProvider {
            client,
            provider,
            api_base,
            api_key: api_key.to_string(),
            extra_headers,
        }
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    #[cfg(test)]
    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl LlmProvider for HttpProvider {
    async fn chat(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        model: &str,
        config: &LlmRequestConfig,
    ) -> LlmResponse {
        let vendor = self.provider.display_name();

        debug!(
            provider = vendor,
            model = %model,
            messages = messages.len(),
            tools = tools.map_or(0, |t| t.len()),
            "Calling LLM"
        );

        let request_body = ChatCompletionRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
            tools: tools.map(|t| t.to_vec()),
            tool_choice: tools.map(|_| "auto".to_string()),
            max_tokens: Some(config.max_tokens),
            temperature: Some(config.temperature),
        };

        let result = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .headers(self.extra_headers.clone())
            .json(&request_body)
            .send()
            .await;

        let response = match result {
            Ok(resp) => resp,
            Err(e) => {
                error!(provider = vendor, error = %e, "HTTP request failed");
                return LlmResponse::error(format!("Error calling LLM: {}", e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(provider = vendor, status = %status, body = %error_text, "API error");
            return LlmResponse::error(format!("Error calling LLM: {} — {}", status, error_text));
        }

        match response.json::<ChatCompletionResponse>().await {
            Ok(chat_resp) => {
                let llm_resp: LlmResponse = chat_resp.into();
                debug!(
                    provider = vendor,
                    has_content = llm_resp.content.is_some(),
                    tool_calls = llm_resp.tool_calls.len(),
                    finish_reason = llm_resp.finish_reason.as_deref().unwrap_or("?"),
                    "LLM response received"
                );
                llm_resp
            }
            Err(e) => {
                error!(provider = vendor, error = %e, "Failed to parse LLM response");
                LlmResponse::error(format!("Error parsing LLM response: {}", e))
            }
        }
    }

    fn display_name(&self) -> &str {
        self.provider.display_name()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
