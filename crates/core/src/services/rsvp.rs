//! RSVP service.
//!
//! RSVPs are gated on invitation state: a caller may only RSVP to an event
//! after accepting an invitation to it. Event owners RSVP to their own events
//! without one.

use gatherly_common::{AppError, AppResult};
use gatherly_db::entities::rsvp;
use gatherly_db::repositories::{EventInvitationRepository, EventRepository, RsvpRepository};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Default number of rows returned by RSVP listings.
const DEFAULT_RSVP_LIMIT: u64 = 100;

/// Input for recording an RSVP.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RsvpInput {
    pub event_id: i32,
    #[validate(length(min = 1, max = 40))]
    pub status: String,
}

/// RSVP response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpResponse {
    pub id: i32,
    pub user_id: i32,
    pub event_id: i32,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<rsvp::Model> for RsvpResponse {
    fn from(model: rsvp::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            event_id: model.event_id,
            status: model.status,
            created_at: model.created_at.into(),
        }
    }
}

/// Service for event RSVPs.
#[derive(Clone)]
pub struct RsvpService {
    rsvp_repo: RsvpRepository,
    event_repo: EventRepository,
    invitation_repo: EventInvitationRepository,
}

impl RsvpService {
    /// Create a new RSVP service.
    #[must_use]
    pub const fn new(
        rsvp_repo: RsvpRepository,
        event_repo: EventRepository,
        invitation_repo: EventInvitationRepository,
    ) -> Self {
        Self {
            rsvp_repo,
            event_repo,
            invitation_repo,
        }
    }

    /// Record an RSVP, overwriting any earlier answer from the same caller.
    pub async fn rsvp(&self, caller_id: i32, input: RsvpInput) -> AppResult<rsvp::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let event = self.event_repo.get_by_id(input.event_id).await?;

        let eligible = event.owner_id == caller_id
            || self
                .invitation_repo
                .has_accepted(input.event_id, caller_id)
                .await?;

        if !eligible {
            return Err(AppError::Forbidden(
                "You must accept an invitation before responding to this event".to_string(),
            ));
        }

        self.rsvp_repo
            .upsert(caller_id, input.event_id, input.status)
            .await
    }

    /// List RSVPs for an event. Restricted to the owner and accepted invitees.
    pub async fn list_for_event(
        &self,
        event_id: i32,
        caller_id: i32,
        limit: Option<u64>,
        offset: u64,
    ) -> AppResult<Vec<rsvp::Model>> {
        let event = self.event_repo.get_by_id(event_id).await?;

        let eligible = event.owner_id == caller_id
            || self
                .invitation_repo
                .has_accepted(event_id, caller_id)
                .await?;

        if !eligible {
            return Err(AppError::Forbidden(
                "Only the owner and accepted invitees can view responses".to_string(),
            ));
        }

        self.rsvp_repo
            .list_for_event(event_id, limit.unwrap_or(DEFAULT_RSVP_LIMIT), offset)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use gatherly_db::entities::{event, event_invitation};
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

    fn service_with(db: Arc<sea_orm::DatabaseConnection>) -> RsvpService {
        RsvpService::new(
            RsvpRepository::new(db.clone()),
            EventRepository::new(db.clone()),
            EventInvitationRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_rsvp_requires_accepted_invitation() {
        let event = create_test_event(10, 1);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[event]])
                .append_query_results([Vec::<event_invitation::Model>::new()])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service
            .rsvp(
                2,
                RsvpInput {
                    event_id: 10,
                    status: "Confirmed".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_owner_can_rsvp_without_invitation() {
        let event = create_test_event(10, 1);
        let recorded = rsvp::Model {
            id: 1,
            user_id: 1,
            event_id: 10,
            status: "Confirmed".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[event]])
                .append_query_results([Vec::<rsvp::Model>::new()])
                .append_query_results([[recorded]])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service
            .rsvp(
                1,
                RsvpInput {
                    event_id: 10,
                    status: "Confirmed".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(result.status, "Confirmed");
    }
}
