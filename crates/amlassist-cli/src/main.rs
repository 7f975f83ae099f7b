//! amlassist CLI — entry point.
//!
//! # Commands
//!
//! - `amlassist ask -m MESSAGE --token JWT` — one assistant turn against the backend
//! - `amlassist models [--all]` — list models by vendor
//! - `amlassist usage --token JWT` — the organization's token quota
//! - `amlassist onboard` — write a default config
//! - `amlassist status` — show configuration and vendor credential status

mod ask;
mod helpers;
mod models;
mod onboard;
mod status;
mod usage;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use amlassist_agent::tools::ImportEntityType;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// AML case-management assistant
#[derive(Parser)]
#[command(name = "amlassist", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the assistant one question
    Ask {
        /// The message to send
        #[arg(short, long)]
        message: String,

        /// Bearer JWT for the backend and billing APIs
        #[arg(long, env = "AMLASSIST_TOKEN", hide_env_values = true)]
        token: String,

        /// Model id (defaults to agents.defaults.model)
        #[arg(long)]
        model: Option<String>,

        /// File to offer for import
        #[arg(long, requires = "entity")]
        import: Option<PathBuf>,

        /// What the import file contains: client or transaction
        #[arg(long, requires = "import")]
        entity: Option<ImportEntityType>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// List supported models
    Models {
        /// Include models whose vendor has no credential
        #[arg(long, default_value_t = false)]
        all: bool,
    },

    /// Show the organization's token usage for this period
    Usage {
        /// Bearer JWT for the billing API
        #[arg(long, env = "AMLASSIST_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Write a default configuration file
    Onboard,

    /// Show configuration and vendor credential status
    Status,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ask {
            message,
            token,
            model,
            import,
            entity,
            logs,
        } => {
            init_logging(logs);
            let attachment = import.zip(entity);
            ask::run(&message, &token, model.as_deref(), attachment, logs).await
        }
        Commands::Models { all } => models::run(all),
        Commands::Usage { token } => {
            init_logging(false);
            usage::run(&token).await
        }
        Commands::Onboard => onboard::run(),
        Commands::Status => status::run(),
    }
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("amlassist=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ask_with_import() {
        let cli = Cli::try_parse_from([
            "amlassist", "ask", "-m", "import this", "--token", "jwt", "--import", "c.csv",
            "--entity", "client",
        ])
        .unwrap();
        match cli.command {
            Commands::Ask { import, entity, .. } => {
                assert_eq!(import, Some(PathBuf::from("c.csv")));
                assert_eq!(entity, Some(ImportEntityType::Client));
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn import_requires_entity() {
        let result = Cli::try_parse_from([
            "amlassist", "ask", "-m", "hi", "--token", "jwt", "--import", "c.csv",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_entity_rejected() {
        let result = Cli::try_parse_from([
            "amlassist", "ask", "-m", "hi", "--token", "jwt", "--import", "c.csv", "--entity",
            "alerts",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_models_all() {
        let cli = Cli::try_parse_from(["amlassist", "models", "--all"]).unwrap();
        assert!(matches!(cli.command, Commands::Models { all: true }));
    }
}
