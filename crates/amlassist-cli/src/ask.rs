//! `amlassist ask` — one assistant turn.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::info;

use amlassist_agent::tools::ImportEntityType;
use amlassist_agent::{build_tool_registry, run_turn, BackendClient, PendingImport, TurnSettings};
use amlassist_billing::{format_token_count, BillingClient};
use amlassist_core::config::load_config;
use amlassist_providers::{GetModelOptions, ProviderRouter};

use crate::helpers;

/// Run a single turn for `message` and print the answer.
pub async fn run(
    message: &str,
    token: &str,
    model: Option<&str>,
    attachment: Option<(PathBuf, ImportEntityType)>,
    show_logs: bool,
) -> Result<()> {
    let config = load_config(None);
    let defaults = &config.agents.defaults;

    let router = ProviderRouter::new(config.providers.clone(), defaults.model.clone());
    let model_id = model.unwrap_or(router.default_model()).to_string();
    let handle = router.get_model(GetModelOptions::model(&model_id))?;

    let pending = match attachment {
        Some((path, entity)) => Some(read_attachment(&path, entity).await?),
        None => None,
    };

    let backend = Arc::new(BackendClient::from_config(&config.backend, token));
    let tools = build_tool_registry(backend, &config.backend.app_url, pending);
    let billing = BillingClient::new(&config.billing.api_url, token);
    let settings = TurnSettings::from_defaults(defaults);

    info!(model = %model_id, tools = tools.len(), "starting turn");
    if !show_logs {
        helpers::print_thinking();
    }
    let result = run_turn(&handle, &tools, Some(&billing), message, &settings).await;
    if !show_logs {
        helpers::clear_thinking();
    }
    let outcome = result.context("assistant turn failed")?;

    helpers::print_response(&outcome.content);
    println!(
        "{}",
        format!(
            "{} · {} tokens ({} in / {} out) · {} tool call(s)",
            handle.config().display_name,
            format_token_count(outcome.usage.total_tokens),
            format_token_count(outcome.usage.input_tokens),
            format_token_count(outcome.usage.output_tokens),
            outcome.tool_calls,
        )
        .dimmed()
    );
    Ok(())
}

async fn read_attachment(path: &Path, entity: ImportEntityType) -> Result<PendingImport> {
    let path = helpers::expand_tilde(&path.to_string_lossy());
    let bytes = tokio::fs::read(&path)
        .await
        .with_context(|| format!("failed to read import file: {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .context("import path has no file name")?;
    Ok(PendingImport::from_bytes(file_name, entity, &bytes))
}
