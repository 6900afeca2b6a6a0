//! User endpoints
//!
//! Each handler opens one session, runs one guarded query or mutation,
//! and returns the output view. The session is dropped on every exit
//! path, which rolls back anything not committed.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::json;

use crate::db::UserSession;
use crate::error::AppError;
use crate::http::error::ApiError;
use crate::http::extractors::{UserId, ValidJson};
use crate::http::server::AppState;
use crate::models::{CreateUser, NewUser, UpdateUser, User, UserView};

async fn open_session(state: &AppState) -> Result<Box<dyn UserSession>, AppError> {
    state.gateway.session().await.map_err(AppError::connection)
}

/// Row for a path id; an id outside the `SERIAL` range can match nothing.
async fn find_user(
    session: &mut dyn UserSession,
    user_id: i64,
    failed: &'static str,
) -> Result<User, AppError> {
    let Ok(id) = i32::try_from(user_id) else {
        return Err(AppError::user_not_found(user_id));
    };

    session
        .by_id(id)
        .await
        .map_err(|e| AppError::database(failed, e))?
        .ok_or_else(|| AppError::user_not_found(user_id))
}

/// GET /users - every user; an empty table is a 404
async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserView>>, ApiError> {
    const FAILED: &str = "Error retrieving users from the database.";

    let mut session = open_session(&state).await?;
    let users = session
        .all()
        .await
        .map_err(|e| AppError::database(FAILED, e))?;

    if users.is_empty() {
        return Err(AppError::not_found("No users found in the database.", json!({})).into());
    }

    Ok(Json(users.into_iter().map(UserView::from).collect()))
}

/// GET /users/{id}
async fn get_user(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
) -> Result<Json<UserView>, ApiError> {
    const FAILED: &str = "Error retrieving user data from the database.";

    let mut session = open_session(&state).await?;
    let user = find_user(session.as_mut(), user_id, FAILED).await?;

    Ok(Json(UserView::from(user)))
}

/// POST /users - rejects an email that is already registered
///
/// The lookup and the insert are separate statements with no unique
/// constraint behind them, so two concurrent creates with the same email
/// can both succeed.
async fn create_user(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CreateUser>,
) -> Result<Json<UserView>, ApiError> {
    const FAILED: &str = "Error while adding the user to the database.";

    let mut session = open_session(&state).await?;

    let existing = session
        .by_email(&req.email)
        .await
        .map_err(|e| AppError::database(FAILED, e))?;
    if existing.is_some() {
        return Err(AppError::conflict(
            "Email is already registered.",
            json!({ "email": req.email }),
        )
        .into());
    }

    let user = session
        .insert(&NewUser::from(req))
        .await
        .map_err(|e| AppError::database(FAILED, e))?;
    session
        .commit()
        .await
        .map_err(|e| AppError::database(FAILED, e))?;

    tracing::info!(user_id = user.id, "user created");
    Ok(Json(UserView::from(user)))
}

/// PUT /users/{id} - replaces name and email
async fn update_user(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    ValidJson(req): ValidJson<UpdateUser>,
) -> Result<Json<UserView>, ApiError> {
    const FAILED: &str = "Error while updating the user data in the database.";

    let mut session = open_session(&state).await?;
    let mut user = find_user(session.as_mut(), user_id, FAILED).await?;

    user.apply(req);
    let user = session
        .update(&user)
        .await
        .map_err(|e| AppError::database(FAILED, e))?;
    session
        .commit()
        .await
        .map_err(|e| AppError::database(FAILED, e))?;

    tracing::info!(user_id, "user updated");
    Ok(Json(UserView::from(user)))
}

/// DELETE /users/{id} - responds with the row as it was before deletion
async fn delete_user(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
) -> Result<Json<UserView>, ApiError> {
    const FAILED: &str = "Error while deleting the user from the database.";

    let mut session = open_session(&state).await?;
    let user = find_user(session.as_mut(), user_id, FAILED).await?;

    session
        .delete(user.id)
        .await
        .map_err(|e| AppError::database(FAILED, e))?;
    session
        .commit()
        .await
        .map_err(|e| AppError::database(FAILED, e))?;

    tracing::info!(user_id, "user deleted");
    Ok(Json(UserView::from(user)))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}
