//! Domain record and the request/response shapes built from it

pub mod user;

pub use user::{CreateUser, NewUser, UpdateUser, User, UserView};
