//! Comment repository. Comments are append-only, so there is no update path.

use std::sync::Arc;

use chrono::Utc;
use gatherly_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use super::db_err;
use crate::entities::{Comment, comment};

/// Repository for comment operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find comment by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// Get comment by ID, returning error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<comment::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comment not found: {id}")))
    }

    /// Append a comment to an event.
    pub async fn create(
        &self,
        event_id: i32,
        user_id: i32,
        content: String,
    ) -> AppResult<comment::Model> {
        comment::ActiveModel {
            content: Set(content),
            user_id: Set(user_id),
            event_id: Set(event_id),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .map_err(db_err)
    }

    /// List comments on an event in posting order.
    pub async fn list_for_event(
        &self,
        event_id: i32,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::EventId.eq(event_id))
            .order_by(comment::Column::Id, Order::Asc)
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
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_comment(id: i32, content: &str) -> comment::Model {
        comment::Model {
            id,
            content: content.to_string(),
            user_id: 2,
            event_id: 10,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_list_for_event_preserves_order() {
        let first = create_test_comment(1, "Looking forward to it");
        let second = create_test_comment(2, "Same here");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[first, second]])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo.list_for_event(10, 50, 0).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, 1);
        assert_eq!(result[1].id, 2);
    }

    #[tokio::test]
    async fn test_create() {
        let comment = create_test_comment(1, "Nice venue");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[comment]])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo.create(10, 2, "Nice venue".to_string()).await.unwrap();

        assert_eq!(result.content, "Nice venue");
    }
}
