//! Postgres implementations of the session contracts

pub mod users;

pub use users::{PgGateway, PgUserSession};
