//! Custom Axum extractors
//!
//! Both reject with a 422 `ValidationError` before any session is opened.

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::error::AppError;

/// JSON body decoded into `T`
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            AppError::validation("Request body validation failed.", rejection.body_text())
        })?;

        Ok(Self(value))
    }
}

/// Integer user id from the `{id}` path segment
///
/// Parsed as `i64` so an id past the column's range still reaches the
/// handler and is reported as missing rather than malformed.
pub struct UserId(pub i64);

impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<i64> = Path::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                AppError::validation("User ID must be an integer.", rejection.body_text())
            })?;

        Ok(Self(id))
    }
}
