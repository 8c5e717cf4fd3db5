//! Event repository.

use std::sync::Arc;

use gatherly_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder, QuerySelect,
};

use super::db_err;
use crate::entities::{Event, event};

/// Repository for event operations.
#[derive(Clone)]
pub struct EventRepository {
    db: Arc<DatabaseConnection>,
}

impl EventRepository {
    /// Create a new event repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find event by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<event::Model>> {
        Event::find_by_id(id).one(self.db.as_ref()).await.map_err(db_err)
    }

    /// Get event by ID, returning error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<event::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event not found: {id}")))
    }

    /// List events, soonest first.
    pub async fn list(&self, limit: u64, offset: u64) -> AppResult<Vec<event::Model>> {
        Event::find()
            .order_by(event::Column::Date, Order::Asc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// Find events owned by a user.
    pub async fn find_owned_by_user(
        &self,
        owner_id: i32,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<event::Model>> {
        Event::find()
            .filter(event::Column::OwnerId.eq(owner_id))
            .order_by(event::Column::Date, Order::Asc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// Search events by name or location substring.
    pub async fn search(
        &self,
        query: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<event::Model>> {
        Event::find()
            .filter(
                Condition::any()
                    .add(event::Column::Name.contains(query))
                    .add(event::Column::Location.contains(query)),
            )
            .order_by(event::Column::Date, Order::Asc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// Create a new event.
    pub async fn create(&self, model: event::ActiveModel) -> AppResult<event::Model> {
        model.insert(self.db.as_ref()).await.map_err(db_err)
    }

    /// Update an event.
    pub async fn update(&self, model: event::ActiveModel) -> AppResult<event::Model> {
        model.update(self.db.as_ref()).await.map_err(db_err)
    }

    /// Delete an event permanently.
    ///
    /// Foreign keys cascade to the event's comments, RSVPs, and invitations.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        Event::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(db_err)?;

        Ok(())
    }
}
