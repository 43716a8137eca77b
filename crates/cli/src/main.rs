//! Ansar Connect CLI - secrets and configuration tools.
//!
//! # Usage
//!
//! ```bash
//! # Print a fresh session secret for SITE_SESSION_SECRET
//! ac-cli secret generate
//!
//! # Load the site configuration from the environment (and .env) and report problems
//! ac-cli config check
//! ```
//!
//! # Commands
//!
//! - `secret generate` - Generate a session signing secret
//! - `config check` - Validate the site configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ac-cli")]
#[command(author, version, about = "Ansar Connect CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage secrets
    Secret {
        #[command(subcommand)]
        action: SecretAction,
    },
    /// Inspect the site configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum SecretAction {
    /// Generate a session signing secret
    Generate {
        /// Number of random bytes before base64 encoding
        #[arg(short, long, default_value_t = commands::secret::DEFAULT_SECRET_BYTES)]
        bytes: usize,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Load the configuration and report errors
    Check,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Secret { action } => match action {
            SecretAction::Generate { bytes } => commands::secret::generate(bytes)?,
        },
        Commands::Config { action } => match action {
            ConfigAction::Check => commands::config::check()?,
        },
    }
    Ok(())
}
