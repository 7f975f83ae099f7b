//! LLM provider trait — the seam between the router and vendor clients.

use async_trait::async_trait;
use amlassist_core::types::{LlmResponse, Message, ToolDefinition};

/// Per-call generation settings.
#[derive(Clone, Debug)]
pub struct LlmRequestConfig {
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
}

impl Default for LlmRequestConfig {
    fn default() -> Self {
        Self {
            max_tokens: 4096,
            temperature: 0.3,
        }
    }
}

/// A vendor chat-completion client.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a chat completion request for `model`.
    ///
    /// Vendor failures (network, auth, rate limit) come back as
    /// `LlmResponse::error(...)` rather than a panic or `Err`.
    async fn chat(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        model: &str,
        config: &LlmRequestConfig,
    ) -> LlmResponse;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}
