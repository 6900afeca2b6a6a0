//! Gateway and session contracts
//!
//! A [`Gateway`] hands out one [`UserSession`] per request. The session is
//! a unit of work: reads and writes go through it, [`UserSession::commit`]
//! makes writes durable, and dropping it without committing discards them.

use async_trait::async_trait;

use crate::models::{NewUser, User};

/// Failure reported by the storage backend
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

#[async_trait]
pub trait Gateway: Send + Sync {
    /// Open a new scoped session.
    async fn session(&self) -> Result<Box<dyn UserSession>, StoreError>;

    /// Create the `users` table if it is missing.
    async fn ensure_schema(&self) -> Result<(), StoreError>;
}

#[async_trait]
pub trait UserSession: Send {
    /// All rows, ordered by id.
    async fn all(&mut self) -> Result<Vec<User>, StoreError>;

    async fn by_id(&mut self, id: i32) -> Result<Option<User>, StoreError>;

    /// First row with this email, if any.
    async fn by_email(&mut self, email: &str) -> Result<Option<User>, StoreError>;

    /// Insert and return the row with its generated id.
    async fn insert(&mut self, user: &NewUser) -> Result<User, StoreError>;

    /// Write `name` and `email` of an existing row.
    async fn update(&mut self, user: &User) -> Result<User, StoreError>;

    async fn delete(&mut self, id: i32) -> Result<(), StoreError>;

    /// Make this session's writes durable and release it.
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}
