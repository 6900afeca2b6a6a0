//! Internal error signal raised inside handlers
//!
//! An [`AppError`] carries everything the client will eventually see:
//! status, a human-readable detail, the exception type name and a JSON
//! object of structured context. The HTTP layer turns it into
//! [`crate::http::ApiError`] with the same fields.

use std::fmt;

use axum::http::StatusCode;
use serde_json::{json, Map, Value};

/// Failure categories exposed to clients as `exception_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionType {
    NotFound,
    Conflict,
    Validation,
    Database,
    DatabaseConnection,
    TableCreation,
}

impl ExceptionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "NotFoundError",
            Self::Conflict => "ConflictError",
            Self::Validation => "ValidationError",
            Self::Database => "DatabaseError",
            Self::DatabaseConnection => "DatabaseConnectionError",
            Self::TableCreation => "TableCreationError",
        }
    }
}

impl fmt::Display for ExceptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppError {
    pub status: StatusCode,
    pub detail: String,
    pub exception_type: ExceptionType,
    pub additional_info: Map<String, Value>,
}

impl AppError {
    pub fn new(
        status: StatusCode,
        detail: impl Into<String>,
        exception_type: ExceptionType,
        additional_info: Value,
    ) -> Self {
        let additional_info = match additional_info {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("value".to_owned(), other);
                map
            }
        };

        Self {
            status,
            detail: detail.into(),
            exception_type,
            additional_info,
        }
    }

    /// 404 for a missing row or an empty table
    pub fn not_found(detail: impl Into<String>, additional_info: Value) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            detail,
            ExceptionType::NotFound,
            additional_info,
        )
    }

    /// 404 for an id that matches no row
    pub fn user_not_found(user_id: i64) -> Self {
        Self::not_found(
            "User with the provided ID does not exist.",
            json!({ "user_id": user_id }),
        )
    }

    /// 400 for an email that is already registered
    pub fn conflict(detail: impl Into<String>, additional_info: Value) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            detail,
            ExceptionType::Conflict,
            additional_info,
        )
    }

    /// 422 for a request the extractors could not decode
    pub fn validation(detail: impl Into<String>, error: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            detail,
            ExceptionType::Validation,
            json!({ "error": error.to_string() }),
        )
    }

    /// 500 for an unexpected failure while querying or mutating
    pub fn database(detail: impl Into<String>, error: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            detail,
            ExceptionType::Database,
            json!({ "error": error.to_string() }),
        )
    }

    /// 500 when no session could be opened
    pub fn connection(error: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error connecting to the database.",
            ExceptionType::DatabaseConnection,
            json!({ "error": error.to_string() }),
        )
    }

    /// 500 when the startup `CREATE TABLE` fails
    pub fn table_creation(error: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error while creating database tables.",
            ExceptionType::TableCreation,
            json!({ "error": error.to_string() }),
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {}",
            self.exception_type,
            self.status.as_u16(),
            self.detail
        )?;
        if let Some(Value::String(cause)) = self.additional_info.get("error") {
            write!(f, ": {cause}")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}
