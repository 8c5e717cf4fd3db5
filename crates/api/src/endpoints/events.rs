//! Event endpoints, including per-event comments, RSVPs, and invitations.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use gatherly_common::AppResult;
use gatherly_core::{
    CommentResponse, CreateCommentInput, CreateEventInput, EventInvitationResponse, EventResponse,
    RsvpResponse, UpdateEventInput,
};
use serde::Deserialize;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, created, ok},
};

#[derive(Debug, Deserialize)]
pub struct EventListQuery {
    /// Name/location substring filter.
    pub q: Option<String>,
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: u64,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: u64,
}

/// RSVP request body; the event comes from the path.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpBody {
    pub status: String,
}

/// List or search events.
async fn list(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Query(query): Query<EventListQuery>,
) -> AppResult<ApiResponse<Vec<EventResponse>>> {
    let events = state
        .event_service
        .search(query.q.as_deref().unwrap_or(""), query.limit, query.offset)
        .await?;

    Ok(ApiResponse::ok(events.into_iter().map(Into::into).collect()))
}

/// Create an event owned by the caller.
async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(input): Json<CreateEventInput>,
) -> AppResult<Response> {
    let event = state.event_service.create(user.id, input).await?;
    Ok(created(EventResponse::from(event)))
}

/// Fetch a single event.
async fn show(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<EventResponse>> {
    let event = state.event_service.get_by_id(id).await?;
    Ok(ApiResponse::ok(event.into()))
}

/// Update an event. Owner only; unset fields stay unchanged.
async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
    Json(input): Json<UpdateEventInput>,
) -> AppResult<ApiResponse<EventResponse>> {
    let event = state.event_service.update(id, user.id, input).await?;
    Ok(ApiResponse::ok(event.into()))
}

/// Delete an event. Owner only.
async fn destroy(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    state.event_service.delete(id, user.id).await?;
    Ok(ok())
}

/// List comments on an event.
async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<CommentResponse>>> {
    let comments = state
        .comment_service
        .list_for_event(id, query.limit, query.offset)
        .await?;

    Ok(ApiResponse::ok(
        comments.into_iter().map(Into::into).collect(),
    ))
}

/// Post a comment on an event.
async fn add_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
    Json(input): Json<CreateCommentInput>,
) -> AppResult<Response> {
    let comment = state.comment_service.add(id, user.id, input).await?;
    Ok(created(CommentResponse::from(comment)))
}

/// List RSVPs for an event. Owner and accepted invitees only.
async fn list_rsvps(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<RsvpResponse>>> {
    let rsvps = state
        .rsvp_service
        .list_for_event(id, user.id, query.limit, query.offset)
        .await?;

    Ok(ApiResponse::ok(rsvps.into_iter().map(Into::into).collect()))
}

/// Record the caller's RSVP. Requires an accepted invitation (or ownership);
/// a repeat RSVP overwrites the earlier answer.
async fn rsvp(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
    Json(body): Json<RsvpBody>,
) -> AppResult<Response> {
    let input = gatherly_core::RsvpInput {
        event_id: id,
        status: body.status,
    };
    let rsvp = state.rsvp_service.rsvp(user.id, input).await?;
    Ok(created(RsvpResponse::from(rsvp)))
}

/// List invitations sent for an event. Owner only.
async fn list_invitations(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<EventInvitationResponse>>> {
    let invitations = state
        .event_invitation_service
        .for_event(id, user.id, query.limit, query.offset)
        .await?;

    Ok(ApiResponse::ok(
        invitations.into_iter().map(Into::into).collect(),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).patch(update).delete(destroy))
        .route("/{id}/comments", get(list_comments).post(add_comment))
        .route("/{id}/rsvps", get(list_rsvps).post(rsvp))
        .route("/{id}/invitations", get(list_invitations))
}
