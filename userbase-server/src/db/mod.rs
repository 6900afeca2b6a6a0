//! Persistence gateway - connection pool, schema and scoped sessions
//!
//! # Design Principles
//!
//! - One pool per process, built from explicitly passed [`Settings`](crate::Settings)
//! - One transaction per request; dropping it uncommitted rolls back and
//!   returns the connection
//! - Email uniqueness is checked by the create handler, not by a table
//!   constraint

pub mod pool;
pub mod repos;
pub mod schema;
pub mod session;

#[cfg(test)]
pub(crate) mod memory;

pub use pool::create_pool;
pub use repos::{PgGateway, PgUserSession};
pub use session::{Gateway, StoreError, UserSession};
