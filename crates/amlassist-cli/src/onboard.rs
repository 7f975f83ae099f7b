//! `amlassist onboard` — write `~/.amlassist/config.json` with defaults.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use amlassist_core::config::{get_config_path, save_config, Config};
use amlassist_providers::Provider;

/// Run the onboard command.
pub fn run() -> Result<()> {
    println!();
    println!("{}", "AML Assistant — Setup".cyan().bold());
    println!();

    let config_path = get_config_path();
    if write_default_config(&config_path)? {
        println!("  {} created config at {}", "✓".green(), config_path.display());
    } else {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
    }

    println!();
    println!("  Add at least one vendor key to the config, or export one of:");
    for provider in Provider::ALL {
        println!("    {}", provider.env_key().bold());
    }
    println!();
    println!(
        "{}",
        "  Setup complete! Run `amlassist ask -m \"...\" --token <JWT>` to start.".green()
    );
    println!();

    Ok(())
}

/// Write a default config at `path` unless one exists. Returns whether it wrote.
fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config(&Config::default(), Some(path))
        .with_context(|| format!("failed to write config: {}", path.display()))?;
    Ok(true)
}
