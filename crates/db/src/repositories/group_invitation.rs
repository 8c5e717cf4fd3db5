//! Group invitation repository.
//!
//! Accepting an invitation grants membership; the status flip and the member
//! insert commit together or not at all.

use std::sync::Arc;

use chrono::Utc;
use gatherly_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use super::{db_err, tx_err, unique_err};
use crate::entities::{GroupInvitation, GroupMember, InviteStatus, group_invitation, group_member};

/// Repository for group invitation operations.
#[derive(Clone)]
pub struct GroupInvitationRepository {
    db: Arc<DatabaseConnection>,
}

impl GroupInvitationRepository {
    /// Create a new group invitation repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find invitation by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<group_invitation::Model>> {
        GroupInvitation::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// Get invitation by ID, returning error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<group_invitation::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Invitation not found: {id}")))
    }

    /// Create a pending invitation.
    ///
    /// Rejects invitees who are already members and pairs that already have a
    /// pending invitation; both checks share the insert's transaction. A
    /// partial unique index on (group, invitee) backs the pending check, so a
    /// concurrent invite that races past it still fails with `Duplicate`.
    pub async fn create_pending(
        &self,
        group_id: i32,
        inviter_id: i32,
        invitee_id: i32,
    ) -> AppResult<group_invitation::Model> {
        self.db
            .transaction::<_, group_invitation::Model, AppError>(move |txn| {
                Box::pin(async move {
                    let member = GroupMember::find()
                        .filter(group_member::Column::GroupId.eq(group_id))
                        .filter(group_member::Column::UserId.eq(invitee_id))
                        .lock_exclusive()
                        .one(txn)
                        .await
                        .map_err(db_err)?;

                    if member.is_some() {
                        return Err(AppError::Duplicate(
                            "User is already a member of this group".to_string(),
                        ));
                    }

                    let pending = GroupInvitation::find()
                        .filter(group_invitation::Column::GroupId.eq(group_id))
                        .filter(group_invitation::Column::InviteeId.eq(invitee_id))
                        .filter(group_invitation::Column::Status.eq(InviteStatus::Pending))
                        .lock_exclusive()
                        .one(txn)
                        .await
                        .map_err(db_err)?;

                    if pending.is_some() {
                        return Err(AppError::Duplicate(
                            "User already has a pending invitation for this group".to_string(),
                        ));
                    }

                    let model = group_invitation::ActiveModel {
                        group_id: Set(group_id),
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

    /// Accept a pending invitation and enroll the invitee, atomically.
    pub async fn accept(&self, id: i32) -> AppResult<group_invitation::Model> {
        self.db
            .transaction::<_, group_invitation::Model, AppError>(move |txn| {
                Box::pin(async move {
                    let invite = GroupInvitation::find_by_id(id)
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

                    group_member::ActiveModel {
                        user_id: Set(invite.invitee_id),
                        group_id: Set(invite.group_id),
                        joined_at: Set(Utc::now().into()),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await
                    .map_err(db_err)?;

                    let mut active: group_invitation::ActiveModel = invite.into();
                    active.status = Set(InviteStatus::Accepted);
                    active.updated_at = Set(Some(Utc::now().into()));

                    active.update(txn).await.map_err(db_err)
                })
            })
            .await
            .map_err(tx_err)
    }

    /// Deny a pending invitation. The row is kept with a terminal status.
    pub async fn deny(&self, id: i32) -> AppResult<group_invitation::Model> {
        self.db
            .transaction::<_, group_invitation::Model, AppError>(move |txn| {
                Box::pin(async move {
                    let invite = GroupInvitation::find_by_id(id)
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

                    let mut active: group_invitation::ActiveModel = invite.into();
                    active.status = Set(InviteStatus::Denied);
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
                    let invite = GroupInvitation::find_by_id(id)
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

                    GroupInvitation::delete_by_id(invite.id)
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
    ) -> AppResult<Vec<group_invitation::Model>> {
        GroupInvitation::find()
            .filter(group_invitation::Column::InviteeId.eq(invitee_id))
            .filter(group_invitation::Column::Status.eq(InviteStatus::Pending))
            .order_by(group_invitation::Column::CreatedAt, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// List all invitations for a group, regardless of status.
    pub async fn list_for_group(
        &self,
        group_id: i32,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<group_invitation::Model>> {
        GroupInvitation::find()
            .filter(group_invitation::Column::GroupId.eq(group_id))
            .order_by(group_invitation::Column::CreatedAt, Order::Desc)
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

    #[tokio::test]
    async fn test_create_pending_rejects_existing_member() {
        let membership = group_member::Model {
            id: 1,
            user_id: 2,
            group_id: 5,
            joined_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[membership]])
                .into_connection(),
        );

        let repo = GroupInvitationRepository::new(db);
        let result = repo.create_pending(5, 1, 2).await;

        assert!(matches!(result, Err(AppError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_accept_grants_membership() {
        let pending = create_test_invite(1, InviteStatus::Pending);
        let mut accepted = pending.clone();
        accepted.status = InviteStatus::Accepted;
        let membership = group_member::Model {
            id: 7,
            user_id: 2,
            group_id: 5,
            joined_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[pending]])
                .append_query_results([[membership]])
                .append_query_results([[accepted]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 1,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = GroupInvitationRepository::new(db);
        let result = repo.accept(1).await.unwrap();

        assert_eq!(result.status, InviteStatus::Accepted);
    }

    #[tokio::test]
    async fn test_deny_rejects_terminal_status() {
        let denied = create_test_invite(1, InviteStatus::Denied);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[denied]])
                .into_connection(),
        );

        let repo = GroupInvitationRepository::new(db);
        let result = repo.deny(1).await;

        assert!(matches!(result, Err(AppError::InvalidTransition(_))));
    }
}
