//! Event service.

use chrono::{NaiveDateTime, TimeZone, Utc};
use gatherly_common::{AppError, AppResult};
use gatherly_db::entities::event;
use gatherly_db::repositories::EventRepository;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Accepted datetime format for event dates.
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Default number of rows returned by event listings.
const DEFAULT_EVENT_LIMIT: u64 = 50;

/// Input for creating an event.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventInput {
    #[validate(length(min = 1, max = 80))]
    pub name: String,
    /// Datetime string, e.g. `2026-09-14T18:30`.
    pub date: String,
    #[validate(length(min = 1, max = 120))]
    pub location: String,
    pub description: String,
}

/// Input for updating an event. Unset fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventInput {
    #[validate(length(min = 1, max = 80))]
    pub name: Option<String>,
    pub date: Option<String>,
    #[validate(length(min = 1, max = 120))]
    pub location: Option<String>,
    pub description: Option<String>,
}

/// Event response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: i32,
    pub name: String,
    pub date: chrono::DateTime<chrono::Utc>,
    pub location: String,
    pub description: String,
    pub owner_id: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<event::Model> for EventResponse {
    fn from(model: event::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            date: model.date.into(),
            location: model.location,
            description: model.description,
            owner_id: model.owner_id,
            created_at: model.created_at.into(),
        }
    }
}

/// Service for managing events.
#[derive(Clone)]
pub struct EventService {
    event_repo: EventRepository,
}

impl EventService {
    /// Create a new event service.
    #[must_use]
    pub const fn new(event_repo: EventRepository) -> Self {
        Self { event_repo }
    }

    /// Get an event by ID.
    pub async fn get_by_id(&self, id: i32) -> AppResult<event::Model> {
        self.event_repo.get_by_id(id).await
    }

    /// List events, soonest first.
    pub async fn list(&self, limit: Option<u64>, offset: u64) -> AppResult<Vec<event::Model>> {
        self.event_repo
            .list(limit.unwrap_or(DEFAULT_EVENT_LIMIT), offset)
            .await
    }

    /// Search events by name or location; an empty query lists events.
    pub async fn search(
        &self,
        query: &str,
        limit: Option<u64>,
        offset: u64,
    ) -> AppResult<Vec<event::Model>> {
        let limit = limit.unwrap_or(DEFAULT_EVENT_LIMIT);

        if query.trim().is_empty() {
            return self.event_repo.list(limit, offset).await;
        }

        self.event_repo.search(query, limit, offset).await
    }

    /// List events owned by a user.
    pub async fn list_owned(
        &self,
        owner_id: i32,
        limit: Option<u64>,
        offset: u64,
    ) -> AppResult<Vec<event::Model>> {
        self.event_repo
            .find_owned_by_user(owner_id, limit.unwrap_or(DEFAULT_EVENT_LIMIT), offset)
            .await
    }

    /// Create a new event owned by the caller.
    pub async fn create(&self, owner_id: i32, input: CreateEventInput) -> AppResult<event::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let date = parse_event_date(&input.date)?;

        let model = event::ActiveModel {
            name: Set(input.name),
            date: Set(date.into()),
            location: Set(input.location),
            description: Set(input.description),
            owner_id: Set(owner_id),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
            ..Default::default()
        };

        self.event_repo.create(model).await
    }

    /// Update an event. Only the owner may update it.
    pub async fn update(
        &self,
        event_id: i32,
        caller_id: i32,
        input: UpdateEventInput,
    ) -> AppResult<event::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let event = self.event_repo.get_by_id(event_id).await?;
        if event.owner_id != caller_id {
            return Err(AppError::Forbidden(
                "Only the owner can update this event".to_string(),
            ));
        }

        let mut active: event::ActiveModel = event.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(date) = input.date {
            active.date = Set(parse_event_date(&date)?.into());
        }
        if let Some(location) = input.location {
            active.location = Set(location);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }

        active.updated_at = Set(Some(Utc::now().into()));

        self.event_repo.update(active).await
    }

    /// Delete an event. Only the owner may delete it; related rows cascade.
    pub async fn delete(&self, event_id: i32, caller_id: i32) -> AppResult<()> {
        let event = self.event_repo.get_by_id(event_id).await?;
        if event.owner_id != caller_id {
            return Err(AppError::Forbidden(
                "Only the owner can delete this event".to_string(),
            ));
        }

        self.event_repo.delete(event_id).await
    }
}

/// Parse an event date in `YYYY-MM-DDTHH:MM` format as UTC.
fn parse_event_date(raw: &str) -> AppResult<chrono::DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, DATE_FORMAT)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|_| {
            AppError::Validation(format!(
                "Invalid date format: expected YYYY-MM-DDTHH:MM, got '{raw}'"
            ))
        })
}
