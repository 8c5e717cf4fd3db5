//! Event invitation service.
//!
//! Invitations move `Pending -> Accepted | Denied`; both outcomes are terminal
//! and a transition out of a terminal state is an error, never a silent no-op.

use gatherly_common::{AppError, AppResult};
use gatherly_db::entities::{InviteStatus, event_invitation};
use gatherly_db::repositories::{EventInvitationRepository, EventRepository, UserRepository};
use serde::{Deserialize, Serialize};

/// Default number of rows returned by invitation listings.
const DEFAULT_INVITATION_LIMIT: u64 = 50;

/// Input for inviting a user to an event.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteToEventInput {
    pub event_id: i32,
    pub invitee_id: i32,
}

/// Event invitation response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInvitationResponse {
    pub id: i32,
    pub event_id: i32,
    pub inviter_id: i32,
    pub invitee_id: i32,
    pub status: InviteStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<event_invitation::Model> for EventInvitationResponse {
    fn from(model: event_invitation::Model) -> Self {
        Self {
            id: model.id,
            event_id: model.event_id,
            inviter_id: model.inviter_id,
            invitee_id: model.invitee_id,
            status: model.status,
            created_at: model.created_at.into(),
        }
    }
}

/// Service for the event invitation workflow.
#[derive(Clone)]
pub struct EventInvitationService {
    invitation_repo: EventInvitationRepository,
    event_repo: EventRepository,
    user_repo: UserRepository,
}

impl EventInvitationService {
    /// Create a new event invitation service.
    #[must_use]
    pub const fn new(
        invitation_repo: EventInvitationRepository,
        event_repo: EventRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            invitation_repo,
            event_repo,
            user_repo,
        }
    }

    /// Invite a user to an event. Only the event owner may invite.
    pub async fn invite(
        &self,
        caller_id: i32,
        input: InviteToEventInput,
    ) -> AppResult<event_invitation::Model> {
        let event = self.event_repo.get_by_id(input.event_id).await?;
        if event.owner_id != caller_id {
            return Err(AppError::Forbidden(
                "Only the event owner can send invitations".to_string(),
            ));
        }

        if input.invitee_id == caller_id {
            return Err(AppError::Validation(
                "You cannot invite yourself".to_string(),
            ));
        }

        self.user_repo.get_by_id(input.invitee_id).await?;

        self.invitation_repo
            .create_pending(input.event_id, caller_id, input.invitee_id)
            .await
    }

    /// Accept a pending invitation. Only the invitee may accept.
    pub async fn accept(
        &self,
        invitation_id: i32,
        caller_id: i32,
    ) -> AppResult<event_invitation::Model> {
        let invite = self.invitation_repo.get_by_id(invitation_id).await?;
        if invite.invitee_id != caller_id {
            return Err(AppError::Forbidden(
                "Only the invitee can accept this invitation".to_string(),
            ));
        }

        self.invitation_repo
            .transition(invitation_id, InviteStatus::Accepted)
            .await
    }

    /// Deny a pending invitation. The row is kept with a terminal status.
    pub async fn deny(
        &self,
        invitation_id: i32,
        caller_id: i32,
    ) -> AppResult<event_invitation::Model> {
        let invite = self.invitation_repo.get_by_id(invitation_id).await?;
        if invite.invitee_id != caller_id {
            return Err(AppError::Forbidden(
                "Only the invitee can deny this invitation".to_string(),
            ));
        }

        self.invitation_repo
            .transition(invitation_id, InviteStatus::Denied)
            .await
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
    ) -> AppResult<Vec<event_invitation::Model>> {
        self.invitation_repo
            .list_pending_for_user(user_id, limit.unwrap_or(DEFAULT_INVITATION_LIMIT), offset)
            .await
    }

    /// List all invitations for an event. Only the event owner may list them.
    pub async fn for_event(
        &self,
        event_id: i32,
        caller_id: i32,
        limit: Option<u64>,
        offset: u64,
    ) -> AppResult<Vec<event_invitation::Model>> {
        let event = self.event_repo.get_by_id(event_id).await?;
        if event.owner_id != caller_id {
            return Err(AppError::Forbidden(
                "Only the event owner can list invitations".to_string(),
            ));
        }

        self.invitation_repo
            .list_for_event(event_id, limit.unwrap_or(DEFAULT_INVITATION_LIMIT), offset)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use gatherly_db::entities::event;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_event(id: i32, owner_id: i32) -> event::Model {
        event::Model {
            id,
            name: "Launch Party".to_string(),
            date: Utc::now().into(),
            location: "Town Hall".to_string(),
            description: "An event".to_string(),
            owner_id,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_invite(id: i32, status: InviteStatus) -> event_invitation::Model {
        event_invitation::Model {
            id,
            event_id: 10,
            inviter_id: 1,
            invitee_id: 2,
            status,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service_with(db: Arc<sea_orm::DatabaseConnection>) -> EventInvitationService {
        EventInvitationService::new(
            EventInvitationRepository::new(db.clone()),
            EventRepository::new(db.clone()),
            UserRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_invite_requires_event_ownership() {
        let event = create_test_event(10, 1);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[event]])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service
            .invite(
                2,
                InviteToEventInput {
                    event_id: 10,
                    invitee_id: 3,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_invite_rejects_self_invite() {
        let event = create_test_event(10, 1);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[event]])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service
            .invite(
                1,
                InviteToEventInput {
                    event_id: 10,
                    invitee_id: 1,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_accept_requires_invitee() {
        let invite = create_test_invite(1, InviteStatus::Pending);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[invite]])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service.accept(1, 99).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_cancel_requires_inviter() {
        let invite = create_test_invite(1, InviteStatus::Pending);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[invite]])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service.cancel(1, 2).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
