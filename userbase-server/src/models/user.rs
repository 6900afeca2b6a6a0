//! The `User` entity and its validation schemas
//!
//! Request bodies are plain serde structs: a missing field or a wrong type
//! is rejected by the JSON extractor before a handler runs. Clients only
//! ever see [`UserView`], never the persisted row.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Persisted row of the `users` table
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// Body of `POST /users`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
}

/// Body of `PUT /users/{id}`; both fields replace the stored values.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUser {
    pub name: String,
    pub email: String,
}

/// Values for an insert, before the store assigns an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

impl From<CreateUser> for NewUser {
    fn from(req: CreateUser) -> Self {
        Self {
            name: req.name,
            email: req.email,
        }
    }
}

impl User {
    /// Overwrite name and email in place (full replace, no partial update).
    pub fn apply(&mut self, update: UpdateUser) {
        self.name = update.name;
        self.email = update.email;
    }
}

/// Output view returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl From<User> for UserView {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
        }
    }
}
