//! Turn driver — one user prompt through the model ⇄ tool loop.
//!
//! Quota is checked up front (fail open), usage is summed over every model
//! call of the turn and reported once at the end (fail silent).

use thiserror::Error;
use tracing::{debug, info, warn};

use amlassist_billing::{calculate_total_tokens, BillingClient, TokenUsage};
use amlassist_core::config::AgentDefaults;
use amlassist_core::types::{Message, UsageInfo};
use amlassist_providers::{LlmRequestConfig, ModelHandle};

use crate::tools::ToolRegistry;

const NO_ANSWER: &str = "I ran out of steps before reaching an answer. Try a narrower question.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TurnError {
    #[error("the organization's token quota for this period is exhausted")]
    QuotaExhausted,
    #[error("model call failed: {0}")]
    Model(String),
}

/// Loop and generation settings for a turn.
#[derive(Clone, Debug)]
pub struct TurnSettings {
    pub system_prompt: String,
    pub max_iterations: u32,
    pub request: LlmRequestConfig,
}

impl TurnSettings {
    pub fn from_defaults(defaults: &AgentDefaults) -> Self {
        Self {
            system_prompt: defaults.system_prompt.clone(),
            max_iterations: defaults.max_tool_iterations.max(1),
            request: LlmRequestConfig {
                max_tokens: defaults.max_tokens,
                temperature: defaults.temperature,
            },
        }
    }
}

#[derive(Clone, Debug)]
pub struct TurnOutcome {
    pub content: String,
    pub usage: TokenUsage,
    /// Number of tool calls executed.
    pub tool_calls: usize,
    /// Number of model calls made.
    pub iterations: u32,
    /// Whether the billing backend accepted the usage report.
    pub usage_reported: bool,
}

fn usage_of(info: &Option<UsageInfo>) -> TokenUsage {
    info.as_ref()
        .map(|u| calculate_total_tokens(u.prompt_tokens, u.completion_tokens))
        .unwrap_or_default()
}

async fn report(billing: Option<&BillingClient>, usage: &TokenUsage, model: &str) -> bool {
    match billing {
        Some(billing) if usage.total_tokens > 0 => billing.report_token_usage(usage, Some(model)).await,
        _ => false,
    }
}

/// Run one assistant turn for `prompt`.
pub async fn run_turn(
    handle: &ModelHandle,
    tools: &ToolRegistry,
    billing: Option<&BillingClient>,
    prompt: &str,
    settings: &TurnSettings,
) -> Result<TurnOutcome, TurnError> {
    if let Some(billing) = billing {
        if !billing.has_remaining_tokens().await {
            warn!(model = handle.model_id(), "turn refused, quota exhausted");
            return Err(TurnError::QuotaExhausted);
        }
    }

    let mut messages = Vec::with_capacity(4);
    if !settings.system_prompt.is_empty() {
        messages.push(Message::system(&settings.system_prompt));
    }
    messages.push(Message::user(prompt));

    let tool_defs = tools.get_definitions();
    let tool_defs = (!tool_defs.is_empty()).then_some(tool_defs.as_slice());

    let mut usage = TokenUsage::default();
    let mut tool_calls = 0;
    let mut iterations = 0;
    let mut final_content = None;

    while iterations < settings.max_iterations {
        iterations += 1;
        debug!(iteration = iterations, model = handle.model_id(), "LLM call");

        let response = handle.chat(&messages, tool_defs, &settings.request).await;
        usage += usage_of(&response.usage);

        if response.is_error {
            report(billing, &usage, handle.model_id()).await;
            return Err(TurnError::Model(response.content.unwrap_or_default()));
        }

        if !response.has_tool_calls() {
            final_content = response.content;
            break;
        }

        messages.push(Message::assistant_tool_calls(
            response.content.clone(),
            response.tool_calls.clone(),
        ));
        for call in &response.tool_calls {
            info!(tool = %call.function.name, iteration = iterations, "executing tool call");
            let result = tools.execute_call(call).await;
            debug!(tool = %call.function.name, result_len = result.len(), "tool result");
            messages.push(Message::tool_result(&call.id, result));
            tool_calls += 1;
        }
    }

    let content = final_content
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| NO_ANSWER.to_string());
    let usage_reported = report(billing, &usage, handle.model_id()).await;

    info!(
        model = handle.model_id(),
        iterations,
        tool_calls,
        total_tokens = usage.total_tokens,
        "turn complete"
    );

    Ok(TurnOutcome {
        content,
        usage,
        tool_calls,
        iterations,
        usage_reported,
    })
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
