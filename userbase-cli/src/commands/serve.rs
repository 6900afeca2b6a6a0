//! HTTP server command
//!
//! Resolves settings, prepares the database and serves the user routes.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use userbase_server::config::DATABASE_URL;
use userbase_server::{bootstrap, run_server, ServerConfig, Settings};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Database URL (overrides DATABASE_URL from the environment or .env)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Log every SQL statement
    #[arg(long)]
    pub echo: bool,

    /// Maximum pool connections (overrides DATABASE_MAX_CONNECTIONS)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_connections: Option<u32>,

    /// Env file to load instead of ./.env
    #[arg(long)]
    pub env_file: Option<PathBuf>,
}

impl ServeArgs {
    /// Environment first, then command-line overrides.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.database_url {
            Some(url) => Settings::from_lookup(|key| {
                if key == DATABASE_URL {
                    Some(url.clone())
                } else {
                    std::env::var(key).ok()
                }
            })?,
            None => Settings::from_env().context(
                "DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or .env",
            )?,
        };

        if self.echo {
            settings.echo = true;
        }
        if let Some(max) = self.max_connections {
            settings.max_connections = max;
        }

        Ok(settings)
    }
}

/// Run the HTTP server
pub async fn run_serve(settings: Settings, args: &ServeArgs) -> Result<()> {
    tracing::info!("Starting userbase server on {}", args.bind);

    let gateway = bootstrap(&settings)
        .await
        .context("Failed to prepare the database")?;

    let config = ServerConfig {
        bind_addr: args.bind,
    };

    run_server(gateway, config).await.context("Server error")?;

    Ok(())
}
