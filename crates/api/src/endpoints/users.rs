//! User endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::get,
};
use gatherly_common::AppResult;
use gatherly_core::UserResponse;
use serde::Deserialize;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, ok},
};

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    /// Username substring filter.
    pub q: Option<String>,
    pub limit: Option<u64>,
}

/// List or search users by username.
async fn list(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Query(query): Query<UserListQuery>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let users = state
        .user_service
        .search(query.q.as_deref().unwrap_or(""), query.limit)
        .await?;

    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

/// Fetch a user profile.
async fn show(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.get_by_id(id).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Fetch the caller's own profile.
async fn me(AuthUser(user): AuthUser) -> ApiResponse<UserResponse> {
    ApiResponse::ok(user.into())
}

/// Delete an account. Callers may only delete themselves.
async fn destroy(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.user_service.delete(id, user.id).await?;
    Ok(ok())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/me", get(me))
        .route("/{id}", get(show).delete(destroy))
}
