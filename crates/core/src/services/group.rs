//! Group service.

use chrono::Utc;
use gatherly_common::{AppError, AppResult};
use gatherly_db::entities::{group, group_member};
use gatherly_db::repositories::GroupRepository;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Default number of rows returned by group listings.
const DEFAULT_GROUP_LIMIT: u64 = 50;

/// Input for creating a group.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupInput {
    #[validate(length(min = 1, max = 80))]
    pub name: String,
    pub description: String,
}

/// Input for updating a group. Unset fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroupInput {
    #[validate(length(min = 1, max = 80))]
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Group response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub owner_id: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<group::Model> for GroupResponse {
    fn from(model: group::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            owner_id: model.owner_id,
            created_at: model.created_at.into(),
        }
    }
}

/// Service for managing groups and their member sets.
#[derive(Clone)]
pub struct GroupService {
    group_repo: GroupRepository,
}

impl GroupService {
    /// Create a new group service.
    #[must_use]
    pub const fn new(group_repo: GroupRepository) -> Self {
        Self { group_repo }
    }

    /// Get a group by ID.
    pub async fn get_by_id(&self, id: i32) -> AppResult<group::Model> {
        self.group_repo.get_by_id(id).await
    }

    /// List groups, newest first.
    pub async fn list(&self, limit: Option<u64>, offset: u64) -> AppResult<Vec<group::Model>> {
        self.group_repo
            .list(limit.unwrap_or(DEFAULT_GROUP_LIMIT), offset)
            .await
    }

    /// List groups owned by a user.
    pub async fn list_owned(&self, owner_id: i32) -> AppResult<Vec<group::Model>> {
        self.group_repo.find_owned_by_user(owner_id).await
    }

    /// Create a group. The creator becomes the owner and first member.
    pub async fn create(&self, owner_id: i32, input: CreateGroupInput) -> AppResult<group::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.group_repo
            .create_with_owner(input.name, input.description, owner_id)
            .await
    }

    /// Update a group. Only the owner may update it.
    pub async fn update(
        &self,
        group_id: i32,
        caller_id: i32,
        input: UpdateGroupInput,
    ) -> AppResult<group::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let group = self.group_repo.get_by_id(group_id).await?;
        if group.owner_id != caller_id {
            return Err(AppError::Forbidden(
                "Only the owner can update this group".to_string(),
            ));
        }

        let mut active: group::ActiveModel = group.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }

        active.updated_at = Set(Some(Utc::now().into()));

        self.group_repo.update(active).await
    }

    /// Delete a group. Only the owner may delete it; related rows cascade.
    pub async fn delete(&self, group_id: i32, caller_id: i32) -> AppResult<()> {
        let group = self.group_repo.get_by_id(group_id).await?;
        if group.owner_id != caller_id {
            return Err(AppError::Forbidden(
                "Only the owner can delete this group".to_string(),
            ));
        }

        self.group_repo.delete(group_id).await
    }

    /// Whether a user belongs to a group.
    pub async fn is_member(&self, group_id: i32, user_id: i32) -> AppResult<bool> {
        self.group_repo.is_member(group_id, user_id).await
    }

    /// List a group's memberships.
    pub async fn list_members(&self, group_id: i32) -> AppResult<Vec<group_member::Model>> {
        self.group_repo.get_by_id(group_id).await?;
        self.group_repo.list_members(group_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
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

    #[tokio::test]
    async fn test_create_rejects_empty_name() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = GroupService::new(GroupRepository::new(db));

        let result = service
            .create(
                1,
                CreateGroupInput {
                    name: String::new(),
                    description: "A group".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_requires_ownership() {
        let group = create_test_group(5, 1);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[group]])
                .into_connection(),
        );

        let service = GroupService::new(GroupRepository::new(db));
        let result = service.delete(5, 2).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
