//! User routes.
//!
//! Handlers borrow the pool through [`AppState`] and call the typed query
//! façade in mooring-core; no SQL lives at this layer.

use axum::{extract::State, http::StatusCode, Json};
use mooring_core::User;

use crate::error::ApiResult;
use crate::state::AppState;

/// GET /user/list: all users, oldest first.
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    let users = state.db().list_users().await?;
    Ok(Json(users))
}

/// POST /user/create-default: seed the fixed default users.
///
/// Idempotent; replies 201 whether or not the rows already existed.
pub async fn create_default_users(
    State(state): State<AppState>,
) -> ApiResult<(StatusCode, &'static str)> {
    state.db().create_default_users().await?;
    Ok((StatusCode::CREATED, "default users created"))
}
