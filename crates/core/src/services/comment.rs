//! Comment service. Comments are an append-only ledger per event.

use gatherly_common::{AppError, AppResult};
use gatherly_db::entities::comment;
use gatherly_db::repositories::{CommentRepository, EventRepository};
use serde::{Deserialize, Serialize};

/// Default number of rows returned by comment listings.
const DEFAULT_COMMENT_LIMIT: u64 = 100;

/// Input for posting a comment.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentInput {
    pub content: String,
}

/// Comment response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i32,
    pub content: String,
    pub user_id: i32,
    pub event_id: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<comment::Model> for CommentResponse {
    fn from(model: comment::Model) -> Self {
        Self {
            id: model.id,
            content: model.content,
            user_id: model.user_id,
            event_id: model.event_id,
            created_at: model.created_at.into(),
        }
    }
}

/// Service for event comments.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    event_repo: EventRepository,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(comment_repo: CommentRepository, event_repo: EventRepository) -> Self {
        Self {
            comment_repo,
            event_repo,
        }
    }

    /// Post a comment on an event. Open to any authenticated caller.
    pub async fn add(
        &self,
        event_id: i32,
        caller_id: i32,
        input: CreateCommentInput,
    ) -> AppResult<comment::Model> {
        let content = input.content.trim();
        if content.is_empty() {
            return Err(AppError::Validation(
                "Comment content cannot be empty".to_string(),
            ));
        }

        self.event_repo.get_by_id(event_id).await?;

        self.comment_repo
            .create(event_id, caller_id, content.to_string())
            .await
    }

    /// List comments on an event in posting order.
    pub async fn list_for_event(
        &self,
        event_id: i32,
        limit: Option<u64>,
        offset: u64,
    ) -> AppResult<Vec<comment::Model>> {
        self.event_repo.get_by_id(event_id).await?;

        self.comment_repo
            .list_for_event(event_id, limit.unwrap_or(DEFAULT_COMMENT_LIMIT), offset)
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

    fn service_with(db: Arc<sea_orm::DatabaseConnection>) -> CommentService {
        CommentService::new(CommentRepository::new(db.clone()), EventRepository::new(db))
    }

    #[tokio::test]
    async fn test_add_rejects_empty_content() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service_with(db);
        let result = service
            .add(
                10,
                2,
                CreateCommentInput {
                    content: "   ".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_add_requires_existing_event() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<event::Model>::new()])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service
            .add(
                99,
                2,
                CreateCommentInput {
                    content: "Hello".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_add_trims_content() {
        let event = create_test_event(10, 1);
        let stored = comment::Model {
            id: 1,
            content: "Hello".to_string(),
            user_id: 2,
            event_id: 10,
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[event]])
                .append_query_results([[stored]])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service
            .add(
                10,
                2,
                CreateCommentInput {
                    content: "  Hello  ".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(result.content, "Hello");
    }
}
