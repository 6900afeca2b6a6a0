mod commands;
mod tracing_setup;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::serve::{run_serve, ServeArgs};
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(name = "userbase", version, about = "CRUD service for the users table")]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the users API over HTTP
    Serve(ServeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            let env_file = userbase_server::config::load_env_file(args.env_file.as_deref())?;
            let settings = args.settings()?;

            tracing_setup::init(&TracingConfig {
                debug: cli.debug,
                echo_sql: settings.echo,
            })?;

            if let Some(path) = env_file {
                tracing::debug!(path = %path.display(), "loaded env file");
            }

            run_serve(settings, &args).await
        }
    }
}
