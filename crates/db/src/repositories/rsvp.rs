//! RSVP repository.

use std::sync::Arc;

use chrono::Utc;
use gatherly_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use super::{db_err, tx_err};
use crate::entities::{Rsvp, rsvp};

/// Repository for RSVP operations.
#[derive(Clone)]
pub struct RsvpRepository {
    db: Arc<DatabaseConnection>,
}

impl RsvpRepository {
    /// Create a new RSVP repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the RSVP for a (user, event) pair.
    pub async fn find_by_pair(
        &self,
        user_id: i32,
        event_id: i32,
    ) -> AppResult<Option<rsvp::Model>> {
        Rsvp::find()
            .filter(rsvp::Column::UserId.eq(user_id))
            .filter(rsvp::Column::EventId.eq(event_id))
            .one(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// Record an RSVP, overwriting any earlier answer for the same pair.
    ///
    /// The lookup and the write share a transaction, so two concurrent RSVPs
    /// from the same user collapse to one row.
    pub async fn upsert(
        &self,
        user_id: i32,
        event_id: i32,
        status: String,
    ) -> AppResult<rsvp::Model> {
        self.db
            .transaction::<_, rsvp::Model, AppError>(move |txn| {
                Box::pin(async move {
                    let existing = Rsvp::find()
                        .filter(rsvp::Column::UserId.eq(user_id))
                        .filter(rsvp::Column::EventId.eq(event_id))
                        .lock_exclusive()
                        .one(txn)
                        .await
                        .map_err(db_err)?;

                    if let Some(current) = existing {
                        let mut active: rsvp::ActiveModel = current.into();
                        active.status = Set(status);
                        active.updated_at = Set(Some(Utc::now().into()));

                        return active.update(txn).await.map_err(db_err);
                    }

                    rsvp::ActiveModel {
                        user_id: Set(user_id),
                        event_id: Set(event_id),
                        status: Set(status),
                        created_at: Set(Utc::now().into()),
                        updated_at: Set(None),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await
                    .map_err(db_err)
                })
            })
            .await
            .map_err(tx_err)
    }

    /// List RSVPs for an event, oldest first.
    pub async fn list_for_event(
        &self,
        event_id: i32,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<rsvp::Model>> {
        Rsvp::find()
            .filter(rsvp::Column::EventId.eq(event_id))
            .order_by(rsvp::Column::CreatedAt, Order::Asc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(db_err)
    }

    /// List RSVPs submitted by a user.
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<rsvp::Model>> {
        Rsvp::find()
            .filter(rsvp::Column::UserId.eq(user_id))
            .order_by(rsvp::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(db_err)
    }
}
