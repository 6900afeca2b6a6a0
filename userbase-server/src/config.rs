//! Settings resolved from the process environment
//!
//! The value is built once at startup and handed to the persistence layer
//! explicitly; nothing here caches global state.

use std::path::{Path, PathBuf};

/// Environment variable holding the Postgres connection string
pub const DATABASE_URL: &str = "DATABASE_URL";
/// Enables sqlx statement logging when truthy
pub const DATABASE_ECHO: &str = "DATABASE_ECHO";
/// Upper bound for the connection pool
pub const DATABASE_MAX_CONNECTIONS: &str = "DATABASE_MAX_CONNECTIONS";

/// Kept low, the service only ever holds one session per request.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("invalid value for {var}: '{value}'")]
    Invalid { var: &'static str, value: String },

    #[error("failed to load env file: {0}")]
    EnvFile(#[from] dotenvy::Error),
}

/// Database settings for the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    /// Log every SQL statement through tracing (`sqlx::query` target)
    pub echo: bool,
    pub max_connections: u32,
}

impl Settings {
    /// Settings with defaults for everything except the connection string.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            echo: false,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Resolve settings from the current process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when `DATABASE_URL` is absent and
    /// [`ConfigError::Invalid`] when an optional value does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup(DATABASE_URL)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(DATABASE_URL))?;

        let mut settings = Self::new(database_url);

        if let Some(raw) = lookup(DATABASE_ECHO) {
            settings.echo = parse_bool(&raw).ok_or(ConfigError::Invalid {
                var: DATABASE_ECHO,
                value: raw,
            })?;
        }

        if let Some(raw) = lookup(DATABASE_MAX_CONNECTIONS) {
            settings.max_connections = raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid {
                    var: DATABASE_MAX_CONNECTIONS,
                    value: raw,
                })?;
        }

        Ok(settings)
    }
}

/// Read a `.env`-style file into the process environment.
///
/// Variables already present in the environment are left untouched. With no
/// explicit path, a missing `./.env` is silently ignored.
///
/// Runs before the subscriber exists, so the loaded path is returned for the
/// caller to log instead of being traced here.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)?;
            Ok(Some(path.to_path_buf()))
        }
        None => match dotenvy::dotenv() {
            Ok(path) => Ok(Some(path)),
            Err(e) if e.not_found() => Ok(None),
            Err(e) => Err(e.into()),
        },
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
