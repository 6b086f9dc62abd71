//! Gatekeeper - admin console session client

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod config;

use config::Config;
use gatekeeper_auth::{AuthStore, Credentials};
use gatekeeper_client::HttpClient;
use gatekeeper_storage::FileStorage;

/// Gatekeeper - log in to the admin console and manage the local session
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, env = "GATEKEEPER_CONFIG", default_value = "config/gatekeeper.toml")]
    config: String,

    /// Console backend base URL
    #[arg(long, env = "GATEKEEPER_BASE_URL")]
    base_url: Option<String>,

    /// Directory holding the session token
    #[arg(long, env = "GATEKEEPER_STORAGE_PATH")]
    storage_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and verify admin access
    Login {
        /// Email address or phone number
        #[arg(long)]
        email: String,

        #[arg(long, env = "GATEKEEPER_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Restore the stored session and print the profile
    Whoami,
    /// Print the locally stored session state without contacting the server
    Status,
    /// Log out on the server and clear the local session
    Logout,
    /// Clear the local session only
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(&args.config)?;
    if let Some(base_url) = args.base_url {
        config.api.base_url = base_url;
    }
    if let Some(storage_path) = args.storage_path {
        config.storage.path = storage_path;
    }

    init_logging(&config.logging.level, &config.logging.format);

    debug!("Using console backend {}", config.api.base_url);

    let store = build_store(&config)?;

    match args.command {
        Command::Login { email, password } => {
            commands::login(&store, &Credentials::new(email, password)).await
        }
        Command::Whoami => commands::whoami(&store).await,
        Command::Status => commands::status(&store),
        Command::Logout => commands::logout(&store).await,
        Command::Clear => {
            commands::clear(&store);
            Ok(())
        }
    }
}

/// Wire the HTTP client and file storage into a session store
fn build_store(config: &Config) -> Result<AuthStore> {
    let api = Arc::new(
        HttpClient::new(config.api.client_config()).context("Failed to create API client")?,
    );

    let storage = Arc::new(
        FileStorage::new(&config.storage.path)
            .with_context(|| format!("Failed to open token storage at {}", config.storage.path))?,
    );

    Ok(AuthStore::with_config(api, storage, config.auth.clone()))
}

/// Initialize logging
///
/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    if format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}
