//! Group and group membership repository.

use std::sync::Arc;

use chrono::Utc;
use gatherly_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use super::{db_err, tx_err, unique_err};
use crate::entities::{Group, GroupMember, group, group_member};

/// Repository for group operations.
#[derive(Clone)]
pub struct GroupRepository {
    db: Arc<DatabaseConnection>,
}

impl GroupRepository {
    /// Create a new group repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find group by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<group::Model>> {
        Group::find_by_id(id).one(self.db.as_ref()).await.map_err(db_err)
    }

    /// Get group by ID, returning error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<group::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Group not found: {id}")))
    }

    /// List groups, newest first.
    pub async fn list(&self, limit: u64, offset: u64) -> AppResult<Vec<group::Model>> {
        Group::find()
            .order_by(group::Column::Id, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// Find groups owned by a user.
    pub async fn find_owned_by_user(&self, owner_id: i32) -> AppResult<Vec<group::Model>> {
        Group::find()
            .filter(group::Column::OwnerId.eq(owner_id))
            .order_by(group::Column::Id, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// Create a group and enroll its owner as the first member, atomically.
    pub async fn create_with_owner(
        &self,
        name: String,
        description: String,
        owner_id: i32,
    ) -> AppResult<group::Model> {
        self.db
            .transaction::<_, group::Model, AppError>(move |txn| {
                Box::pin(async move {
                    let grp = group::ActiveModel {
                        name: Set(name),
                        description: Set(description),
                        owner_id: Set(owner_id),
                        created_at: Set(Utc::now().into()),
                        updated_at: Set(None),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await
                    .map_err(db_err)?;

                    group_member::ActiveModel {
                        user_id: Set(owner_id),
                        group_id: Set(grp.id),
                        joined_at: Set(Utc::now().into()),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await
                    .map_err(db_err)?;

                    Ok(grp)
                })
            })
            .await
            .map_err(tx_err)
    }

    /// Update a group.
    pub async fn update(&self, model: group::ActiveModel) -> AppResult<group::Model> {
        model.update(self.db.as_ref()).await.map_err(db_err)
    }

    /// Delete a group permanently.
    ///
    /// Foreign keys cascade to the group's memberships and invitations.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        Group::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(db_err)?;

        Ok(())
    }

    /// Whether a user belongs to a group.
    pub async fn is_member(&self, group_id: i32, user_id: i32) -> AppResult<bool> {
        let found = GroupMember::find()
            .filter(group_member::Column::GroupId.eq(group_id))
            .filter(group_member::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(db_err)?;

        Ok(found.is_some())
    }

    /// Enroll a user in a group.
    ///
    /// The unique (user, group) index rejects a second enrollment.
    pub async fn add_member(&self, group_id: i32, user_id: i32) -> AppResult<group_member::Model> {
        group_member::ActiveModel {
            user_id: Set(user_id),
            group_id: Set(group_id),
            joined_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .map_err(|e| unique_err(e, "Membership"))
    }

    /// List a group's memberships, oldest first.
    pub async fn list_members(&self, group_id: i32) -> AppResult<Vec<group_member::Model>> {
        GroupMember::find()
            .filter(group_member::Column::GroupId.eq(group_id))
            .order_by(group_member::Column::JoinedAt, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// List memberships held by a user.
    pub async fn list_memberships(&self, user_id: i32) -> AppResult<Vec<group_member::Model>> {
        GroupMember::find()
            .filter(group_member::Column::UserId.eq(user_id))
            .order_by(group_member::Column::JoinedAt, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(db_err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_group(id: i32, owner_id: i32, name: &str) -> group::Model {
        group::Model {
            id,
            name: name.to_string(),
            description: "A group".to_string(),
            owner_id,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_member(id: i32, group_id: i32, user_id: i32) -> group_member::Model {
        group_member::Model {
            id,
            user_id,
            group_id,
            joined_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_is_member() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_member(1, 5, 2)]])
                .append_query_results([Vec::<group_member::Model>::new()])
                .into_connection(),
        );

        let repo = GroupRepository::new(db);
        assert!(repo.is_member(5, 2).await.unwrap());
        assert!(!repo.is_member(5, 3).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_with_owner_enrolls_owner() {
        let grp = create_test_group(5, 1, "Hiking Club");
        let membership = create_test_member(1, 5, 1);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[grp.clone()]])
                .append_query_results([[membership]])
                .into_connection(),
        );

        let repo = GroupRepository::new(db);
        let result = repo
            .create_with_owner("Hiking Club".to_string(), "A group".to_string(), 1)
            .await
            .unwrap();

        assert_eq!(result.id, 5);
        assert_eq!(result.owner_id, 1);
    }
}
