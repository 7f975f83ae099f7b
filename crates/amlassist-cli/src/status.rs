//! `amlassist status` — show configuration and vendor credential status.

use anyhow::Result;
use colored::Colorize;

use amlassist_core::config::{get_config_path, load_config};
use amlassist_providers::{is_valid_model, Provider, ProviderRouter};

/// Run the status command.
pub fn run() -> Result<()> {
    let config = load_config(None);
    let config_path = get_config_path();

    println!();
    println!("{}", "AML Assistant Status".cyan().bold());
    println!();

    // Config
    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_path.exists() {
            "✓".green().to_string()
        } else {
            "(not found, using defaults)".red().to_string()
        }
    );

    // Model
    let defaults = &config.agents.defaults;
    let model_status = if is_valid_model(&defaults.model) {
        String::new()
    } else {
        "(unknown model)".red().to_string()
    };
    println!("  {:<18} {} {}", "Model:".bold(), defaults.model, model_status);
    println!(
        "  {:<18} {} | {} | {}",
        "Parameters:".bold(),
        format!("temp: {}", defaults.temperature).dimmed(),
        format!("max_tokens: {}", defaults.max_tokens).dimmed(),
        format!("max_tool_iterations: {}", defaults.max_tool_iterations).dimmed(),
    );

    // Endpoints
    println!();
    println!("  {:<18} {}", "Backend API:".bold(), config.backend.api_url);
    println!("  {:<18} {}", "Dashboard:".bold(), config.backend.app_url);
    println!("  {:<18} {}", "Billing API:".bold(), config.billing.api_url);

    // Vendors
    println!();
    println!("  {}", "Vendors:".bold());
    let router = ProviderRouter::new(config.providers.clone(), defaults.model.clone());
    for provider in Provider::ALL {
        let status = if router.is_provider_configured(provider) {
            format!("{} (key set)", "✓".green())
        } else {
            format!("· not configured ({})", provider.env_key())
                .dimmed()
                .to_string()
        };
        println!("    {:<20} {}", provider.display_name(), status);
    }
    println!(
        "  {:<18} {}",
        "Available models:".bold(),
        router.available_models().len()
    );
    println!();

    Ok(())
}
