//! Event invitation repository.
//!
//! Every check-then-write path runs inside a transaction so concurrent callers
//! cannot double-invite or transition a terminal invitation.

use std::sync::Arc;

use chrono::Utc;
use gatherly_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use super::{db_err, tx_err, unique_err};
use crate::entities::{EventInvitation, InviteStatus, event_invitation};

/// Repository for event invitation operations.
#[derive(Clone)]
pub struct EventInvitationRepository {
    db: Arc<DatabaseConnection>,
}

impl EventInvitationRepository {
    /// Create a new event invitation repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find invitation by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<event_invitation::Model>> {
        EventInvitation::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// Get invitation by ID, returning error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<event_invitation::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Invitation not found: {id}")))
    }

    /// Find an invitation of any status for a (event, invitee) pair.
    pub async fn find_by_pair(
        &self,
        event_id: i32,
        invitee_id: i32,
    ) -> AppResult<Option<event_invitation::Model>> {
        EventInvitation::find()
            .filter(event_invitation::Column::EventId.eq(event_id))
            .filter(event_invitation::Column::InviteeId.eq(invitee_id))
            .order_by(event_invitation::Column::Id, Order::Desc)
            .one(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// Whether the invitee holds an accepted invitation for the event.
    pub async fn has_accepted(&self, event_id: i32, invitee_id: i32) -> AppResult<bool> {
        let found = EventInvitation::find()
            .filter(event_invitation::Column::EventId.eq(event_id))
            .filter(event_invitation::Column::InviteeId.eq(invitee_id))
            .filter(event_invitation::Column::Status.eq(InviteStatus::Accepted))
            .one(self.db.as_ref())
            .await
            .map_err(db_err)?;

        Ok(found.is_some())
    }

    /// Create a pending invitation.
    ///
    /// The existing-pending check and the insert run in one transaction. A
    /// partial unique index on (event, invitee) backs the check, so a
    /// concurrent invite that races past it still fails with `Duplicate`.
    pub async fn create_pending(
        &self,
        event_id: i32,
        inviter_id: i32,
        invitee_id: i32,
    ) -> AppResult<event_invitation::Model> {
        self.db
            .transaction::<_, event_invitation::Model, AppError>(move |txn| {
                Box::pin(async move {
                    let existing = EventInvitation::find()
                        .filter(event_invitation::Column::EventId.eq(event_id))
                        .filter(event_invitation::Column::InviteeId.eq(invitee_id))
                        .filter(event_invitation::Column::Status.eq(InviteStatus::Pending))
                        .lock_exclusive()
                        .one(txn)
                        .await
                        .map_err(db_err)?;

                    if existing.is_some() {
                        return Err(AppError::Duplicate(
                            "User already has a pending invitation for this event".to_string(),
                        ));
                    }

                    let model = event_invitation::ActiveModel {
                        event_id: Set(event_id),
                        inviter_id: Set(inviter_id),
                        invitee_id: Set(invitee_id),
                        status: Set(InviteStatus::Pending),
                        created_at: Set(Utc::now().into()),
                        updated_at: Set(None),
                        ..Default::default()
                    };

                    model
                        .insert(txn)
                        .await
                        .map_err(|e| unique_err(e, "Pending invitation"))
                })
            })
            .await
            .map_err(tx_err)
    }

    /// Transition a pending invitation to a terminal status.
    ///
    /// Fails with `InvalidTransition` if the invitation is no longer pending;
    /// the status check and the update are atomic.
    pub async fn transition(
        &self,
        id: i32,
        status: InviteStatus,
    ) -> AppResult<event_invitation::Model> {
        self.db
            .transaction::<_, event_invitation::Model, AppError>(move |txn| {
                Box::pin(async move {
                    let invite = EventInvitation::find_by_id(id)
                        .lock_exclusive()
                        .one(txn)
                        .await
                        .map_err(db_err)?
                        .ok_or_else(|| {
                            AppError::NotFound(format!("Invitation not found: {id}"))
                        })?;

                    if invite.status != InviteStatus::Pending {
                        return Err(AppError::InvalidTransition(
                            "Invitation is no longer pending".to_string(),
                        ));
                    }

                    let mut active: event_invitation::ActiveModel = invite.into();
                    active.status = Set(status);
                    active.updated_at = Set(Some(Utc::now().into()));

                    active.update(txn).await.map_err(db_err)
                })
            })
            .await
            .map_err(tx_err)
    }

    /// Remove a still-pending invitation (inviter-initiated cancel).
    pub async fn delete_pending(&self, id: i32) -> AppResult<()> {
        self.db
            .transaction::<_, (), AppError>(move |txn| {
                Box::pin(async move {
                    let invite = EventInvitation::find_by_id(id)
                        .lock_exclusive()
                        .one(txn)
                        .await
                        .map_err(db_err)?
                        .ok_or_else(|| {
                            AppError::NotFound(format!("Invitation not found: {id}"))
                        })?;

                    if invite.status != InviteStatus::Pending {
                        return Err(AppError::InvalidTransition(
                            "Only pending invitations can be cancelled".to_string(),
                        ));
                    }

                    EventInvitation::delete_by_id(invite.id)
                        .exec(txn)
                        .await
                        .map_err(db_err)?;

                    Ok(())
                })
            })
            .await
            .map_err(tx_err)
    }

    /// List pending invitations addressed to a user.
    pub async fn list_pending_for_user(
        &self,
        invitee_id: i32,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<event_invitation::Model>> {
        EventInvitation::find()
            .filter(event_invitation::Column::InviteeId.eq(invitee_id))
            .filter(event_invitation::Column::Status.eq(InviteStatus::Pending))
            .order_by(event_invitation::Column::CreatedAt, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// List all invitations for an event, regardless of status.
    pub async fn list_for_event(
        &self,
        event_id: i32,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<event_invitation::Model>> {
        EventInvitation::find()
            .filter(event_invitation::Column::EventId.eq(event_id))
            .order_by(event_invitation::Column::CreatedAt, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(db_err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

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

    #[tokio::test]
    async fn test_has_accepted() {
        let invite = create_test_invite(1, InviteStatus::Accepted);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[invite]])
                .into_connection(),
        );

        let repo = EventInvitationRepository::new(db);
        assert!(repo.has_accepted(10, 2).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_pending_rejects_duplicate() {
        let pending = create_test_invite(1, InviteStatus::Pending);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[pending]])
                .into_connection(),
        );

        let repo = EventInvitationRepository::new(db);
        let result = repo.create_pending(10, 1, 2).await;

        assert!(matches!(result, Err(AppError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_transition_rejects_terminal_status() {
        let accepted = create_test_invite(1, InviteStatus::Accepted);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[accepted]])
                .into_connection(),
        );

        let repo = EventInvitationRepository::new(db);
        let result = repo.transition(1, InviteStatus::Accepted).await;

        assert!(matches!(result, Err(AppError::InvalidTransition(_))));
    }

    #[tokio::test]
    async fn test_transition_accepts_pending() {
        let pending = create_test_invite(1, InviteStatus::Pending);
        let mut accepted = pending.clone();
        accepted.status = InviteStatus::Accepted;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[pending], [accepted]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 1,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = EventInvitationRepository::new(db);
        let result = repo.transition(1, InviteStatus::Accepted).await.unwrap();

        assert_eq!(result.status, InviteStatus::Accepted);
    }
}
