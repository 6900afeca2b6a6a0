//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits.

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};

use crate::config::Settings;

/// Create a PostgreSQL connection pool.
///
/// With `echo` off, statement logging is disabled on every connection.
/// With it on, sqlx reports each statement through `tracing` under the
/// `sqlx::query` target.
///
/// # Errors
///
/// Returns an error if the URL does not parse or the first connection fails.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&Settings::new("postgres://localhost/users")).await?;
/// ```
pub async fn create_pool(settings: &Settings) -> Result<PgPool, sqlx::Error> {
    let mut options: PgConnectOptions = settings.database_url.parse()?;
    if !settings.echo {
        options = options.disable_statement_logging();
    }

    tracing::debug!(
        max_connections = settings.max_connections,
        echo = settings.echo,
        "creating connection pool"
    );

    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(options)
        .await
}
