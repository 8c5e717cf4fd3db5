//! Event invitation endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use gatherly_common::AppResult;
use gatherly_core::{EventInvitationResponse, InviteToEventInput};
use serde::Deserialize;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, created, ok},
};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: u64,
}

/// List pending invitations addressed to the caller.
async fn pending(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<EventInvitationResponse>>> {
    let invitations = state
        .event_invitation_service
        .pending_for(user.id, query.limit, query.offset)
        .await?;

    Ok(ApiResponse::ok(
        invitations.into_iter().map(Into::into).collect(),
    ))
}

/// Invite a user to an event. Event owner only.
async fn invite(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(input): Json<InviteToEventInput>,
) -> AppResult<Response> {
    let invitation = state.event_invitation_service.invite(user.id, input).await?;
    Ok(created(EventInvitationResponse::from(invitation)))
}

/// Accept a pending invitation. Invitee only.
async fn accept(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<EventInvitationResponse>> {
    let invitation = state.event_invitation_service.accept(id, user.id).await?;
    Ok(ApiResponse::ok(invitation.into()))
}

/// Deny a pending invitation. Invitee only.
async fn deny(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<EventInvitationResponse>> {
    let invitation = state.event_invitation_service.deny(id, user.id).await?;
    Ok(ApiResponse::ok(invitation.into()))
}

/// Cancel a still-pending invitation. Inviter only.
async fn cancel(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    state.event_invitation_service.cancel(id, user.id).await?;
    Ok(ok())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pending).post(invite))
        .route("/{id}/accept", post(accept))
        .route("/{id}/deny", post(deny))
        .route("/{id}", delete(cancel))
}
