//! Group invitation service.
//!
//! Accepting a group invitation enrolls the invitee; the repository performs
//! the status flip and the membership insert in one transaction.

use gatherly_common::{AppError, AppResult};
use gatherly_db::entities::{InviteStatus, group_invitation};
use gatherly_db::repositories::{GroupInvitationRepository, GroupRepository, UserRepository};
use serde::{Deserialize, Serialize};

/// Default number of rows returned by invitation listings.
const DEFAULT_INVITATION_LIMIT: u64 = 50;

/// Input for inviting a user to a group.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteToGroupInput {
    pub group_id: i32,
    pub invitee_id: i32,
}

/// Group invitation response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInvitationResponse {
    pub id: i32,
    pub group_id: i32,
    pub inviter_id: i32,
    pub invitee_id: i32,
    pub status: InviteStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<group_invitation::Model> for GroupInvitationResponse {
    fn from(model: group_invitation::Model) -> Self {
        Self {
            id: model.id,
            group_id: model.group_id,
            inviter_id: model.inviter_id,
            invitee_id: model.invitee_id,
            status: model.status,
            created_at: model.created_at.into(),
        }
    }
}

/// Service for the group invitation workflow.
#[derive(Clone)]
pub struct GroupInvitationService {
    invitation_repo: GroupInvitationRepository,
    group_repo: GroupRepository,
    user_repo: UserRepository,
}

impl GroupInvitationService {
    /// Create a new group invitation service.
    #[must_use]
    pub const fn new(
        invitation_repo: GroupInvitationRepository,
        group_repo: GroupRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            invitation_repo,
            group_repo,
            user_repo,
        }
    }

    /// Invite a user to a group. Only the group owner may invite; existing
    /// members cannot be invited again.
    pub async fn invite(
        &self,
        caller_id: i32,
        input: InviteToGroupInput,
    ) -> AppResult<group_invitation::Model> {
        let group = self.group_repo.get_by_id(input.group_id).await?;
        if group.owner_id != caller_id {
            return Err(AppError::Forbidden(
                "Only the group owner can send invitations".to_string(),
            ));
        }

        if input.invitee_id == caller_id {
            return Err(AppError::Validation(
                "You cannot invite yourself".to_string(),
            ));
        }

        self.user_repo.get_by_id(input.invitee_id).await?;

        self.invitation_repo
            .create_pending(input.group_id, caller_id, input.invitee_id)
            .await
    }

    /// Accept a pending invitation, joining the group. Only the invitee may
    /// accept.
    pub async fn accept(
        &self,
        invitation_id: i32,
        caller_id: i32,
    ) -> AppResult<group_invitation::Model> {
        let invite = self.invitation_repo.get_by_id(invitation_id).await?;
        if invite.invitee_id != caller_id {
            return Err(AppError::Forbidden(
                "Only the invitee can accept this invitation".to_string(),
            ));
        }

        self.invitation_repo.accept(invitation_id).await
    }

    /// Deny a pending invitation. The row is kept with a terminal status.
    pub async fn deny(
        &self,
        invitation_id: i32,
        caller_id: i32,
    ) -> AppResult<group_invitation::Model> {
        let invite = self.invitation_repo.get_by_id(invitation_id).await?;
        if invite.invitee_id != caller_id {
            return Err(AppError::Forbidden(
                "Only the invitee can deny this invitation".to_string(),
            ));
        }

        self.invitation_repo.deny(invitation_id).await
    }

    /// Cancel a still-pending invitation. Only the inviter may cancel.
    pub async fn cancel(&self, invitation_id: i32, caller_id: i32) -> AppResult<()> {
        let invite = self.invitation_repo.get_by_id(invitation_id).await?;
        if invite.inviter_id != caller_id {
            return Err(AppError::Forbidden(
                "Only the inviter can cancel this invitation".to_string(),
            ));
        }

        self.invitation_repo.delete_pending(invitation_id).await
    }

    /// List pending invitations addressed to the caller.
    pub async fn pending_for(
        &self,
        user_id: i32,
        limit: Option<u64>,
        offset: u64,
    ) -> AppResult<Vec<group_invitation::Model>> {
        self.invitation_repo
            .list_pending_for_user(user_id, limit.unwrap_or(DEFAULT_INVITATION_LIMIT), offset)
            .await
    }

    /// List all invitations for a group. Only the group owner may list them.
    pub async fn for_group(
        &self,
        group_id: i32,
        caller_id: i32,
        limit: Option<u64>,
        offset: u64,
    ) -> AppResult<Vec<group_invitation::Model>> {
        let group = self.group_repo.get_by_id(group_id).await?;
        if group.owner_id != caller_id {
            return Err(AppError::Forbidden(
                "Only the group owner can list invitations".to_string(),
            ));
        }

        self.invitation_repo
            .list_for_group(group_id, limit.unwrap_or(DEFAULT_INVITATION_LIMIT), offset)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use gatherly_db::entities::group;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_group(id: i32, owner_id: i32) -> group::Model {
        group::Model {
            id,
            name: "Hiking Club".to_string(),
            description: "A group".to_string(),
            owner_id,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_invite(id: i32, status: InviteStatus) -> group_invitation::Model {
        group_invitation::Model {
            id,
            group_id: 5,
            inviter_id: 1,
            invitee_id: 2,
            status,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service_with(db: Arc<sea_orm::DatabaseConnection>) -> GroupInvitationService {
        GroupInvitationService::new(
            GroupInvitationRepository::new(db.clone()),
            GroupRepository::new(db.clone()),
            UserRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_invite_requires_group_ownership() {
        let group = create_test_group(5, 1);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[group]])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service
            .invite(
                2,
                InviteToGroupInput {
                    group_id: 5,
                    invitee_id: 3,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_deny_requires_invitee() {
        let invite = create_test_invite(1, InviteStatus::Pending);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[invite]])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service.deny(1, 99).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_list_for_group_requires_ownership() {
        let group = create_test_group(5, 1);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[group]])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service.for_group(5, 2, None, 0).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
