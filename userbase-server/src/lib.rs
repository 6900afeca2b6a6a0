//! userbase-server: HTTP service over a single `users` table
//!
//! Every route follows the same pipeline: open a scoped session, run one
//! guarded query or mutation, translate any failure into the structured
//! error body, and release the session on every exit path.

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod models;

use std::sync::Arc;

pub use config::{ConfigError, Settings};
pub use db::{Gateway, StoreError, UserSession};
pub use error::{AppError, ExceptionType};
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};

/// Connect to the data store and make sure the schema exists.
///
/// Either failure aborts startup: a pool that cannot connect surfaces as
/// `DatabaseConnectionError`, a failed `CREATE TABLE` as `TableCreationError`.
pub async fn bootstrap(settings: &Settings) -> Result<Arc<dyn Gateway>, AppError> {
    let pool = db::create_pool(settings)
        .await
        .map_err(|e| AppError::connection(StoreError::from(e)))?;

    let gateway = db::PgGateway::new(pool);
    prepare_schema(&gateway).await?;

    Ok(Arc::new(gateway))
}

/// Run the idempotent `CREATE TABLE IF NOT EXISTS` step.
pub async fn prepare_schema(gateway: &dyn Gateway) -> Result<(), AppError> {
    gateway
        .ensure_schema()
        .await
        .map_err(AppError::table_creation)?;

    tracing::info!("users table ready");
    Ok(())
}
