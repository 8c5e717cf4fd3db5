//! Group endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use gatherly_common::AppResult;
use gatherly_core::{CreateGroupInput, GroupInvitationResponse, GroupResponse, UpdateGroupInput};
use gatherly_db::entities::group_member;
use serde::{Deserialize, Serialize};

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

/// Group membership response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub user_id: i32,
    pub group_id: i32,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

impl From<group_member::Model> for MemberResponse {
    fn from(model: group_member::Model) -> Self {
        Self {
            user_id: model.user_id,
            group_id: model.group_id,
            joined_at: model.joined_at.into(),
        }
    }
}

/// List groups.
async fn list(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<GroupResponse>>> {
    let groups = state.group_service.list(query.limit, query.offset).await?;
    Ok(ApiResponse::ok(groups.into_iter().map(Into::into).collect()))
}

/// Create a group. The caller becomes owner and first member.
async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(input): Json<CreateGroupInput>,
) -> AppResult<Response> {
    let group = state.group_service.create(user.id, input).await?;
    Ok(created(GroupResponse::from(group)))
}

/// Fetch a single group.
async fn show(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<GroupResponse>> {
    let group = state.group_service.get_by_id(id).await?;
    Ok(ApiResponse::ok(group.into()))
}

/// Update a group. Owner only.
async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
    Json(input): Json<UpdateGroupInput>,
) -> AppResult<ApiResponse<GroupResponse>> {
    let group = state.group_service.update(id, user.id, input).await?;
    Ok(ApiResponse::ok(group.into()))
}

/// Delete a group. Owner only.
async fn destroy(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    state.group_service.delete(id, user.id).await?;
    Ok(ok())
}

/// List a group's members.
async fn members(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<Vec<MemberResponse>>> {
    let members = state.group_service.list_members(id).await?;
    Ok(ApiResponse::ok(
        members.into_iter().map(Into::into).collect(),
    ))
}

/// List invitations sent for a group. Owner only.
async fn invitations(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<GroupInvitationResponse>>> {
    let invitations = state
        .group_invitation_service
        .for_group(id, user.id, query.limit, query.offset)
        .await?;

    Ok(ApiResponse::ok(
        invitations.into_iter().map(Into::into).collect(),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).patch(update).delete(destroy))
        .route("/{id}/members", get(members))
        .route("/{id}/invitations", get(invitations))
}
