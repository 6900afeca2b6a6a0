//! Table creation run once at startup

use sqlx::PgPool;

/// No UNIQUE on email: duplicates are caught by the create handler's lookup.
const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id SERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL
)
"#;

const CREATE_INDEXES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)
"#;

/// Create the `users` table if it does not exist. Idempotent.
pub async fn ensure(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("ensuring users schema");

    sqlx::query(CREATE_USERS).execute(pool).await?;
    sqlx::query(CREATE_INDEXES).execute(pool).await?;

    Ok(())
}
