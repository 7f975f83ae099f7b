//! `amlassist models` — list supported models grouped by vendor.

use anyhow::Result;
use colored::Colorize;

use amlassist_core::config::load_config;
use amlassist_providers::{get_models_by_provider, Provider, ProviderRouter};

/// Run the models command.
pub fn run(all: bool) -> Result<()> {
    let config = load_config(None);
    let router = ProviderRouter::new(config.providers, config.agents.defaults.model);

    println!();
    println!("{}", "Models".cyan().bold());

    let mut shown = 0;
    for provider in Provider::ALL {
        let configured = router.is_provider_configured(provider);
        if !configured && !all {
            continue;
        }

        println!();
        let status = if configured {
            "✓".green().to_string()
        } else {
            format!("· set {} to enable", provider.env_key()).dimmed().to_string()
        };
        println!("  {} {}", provider.display_name().bold(), status);

        for model in get_models_by_provider(provider) {
            let marker = if model.model == router.default_model() {
                "*".yellow().to_string()
            } else {
                " ".to_string()
            };
            println!(
                "   {} {:<28} {}",
                marker,
                model.model,
                model.description.dimmed()
            );
            shown += 1;
        }
    }

    println!();
    if shown == 0 {
        println!(
            "  {}",
            "No vendor credentials configured. Run `amlassist status` for details.".dimmed()
        );
        println!();
    }

    Ok(())
}
