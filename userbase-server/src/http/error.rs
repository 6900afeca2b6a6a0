//! Client-facing error with IntoResponse
//!
//! Handlers raise [`AppError`] and convert it here without touching its
//! fields. The response body is
//! `{"detail": .., "exception_type": .., "additional_info": {..}}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{AppError, ExceptionType};

/// Failure returned to the HTTP client
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
    pub exception_type: ExceptionType,
    pub additional_info: Map<String, Value>,
}

/// Wire shape of an error response
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub detail: &'a str,
    pub exception_type: &'static str,
    pub additional_info: &'a Map<String, Value>,
}

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        Self {
            status: e.status,
            detail: e.detail,
            exception_type: e.exception_type,
            additional_info: e.additional_info,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                exception_type = %self.exception_type,
                additional_info = ?self.additional_info,
                "{}",
                self.detail
            );
        } else {
            tracing::debug!(
                status = self.status.as_u16(),
                exception_type = %self.exception_type,
                "{}",
                self.detail
            );
        }

        let body = ErrorBody {
            detail: &self.detail,
            exception_type: self.exception_type.as_str(),
            additional_info: &self.additional_info,
        };

        (self.status, Json(body)).into_response()
    }
}
