//! Database repositories.

mod comment;
mod event;
mod event_invitation;
mod group;
mod group_invitation;
mod rsvp;
mod user;

pub use comment::CommentRepository;
pub use event::EventRepository;
pub use event_invitation::EventInvitationRepository;
pub use group::GroupRepository;
pub use group_invitation::GroupInvitationRepository;
pub use rsvp::RsvpRepository;
pub use user::UserRepository;

use gatherly_common::AppError;
use sea_orm::{DbErr, SqlErr, TransactionError};

/// Map a database error to an [`AppError`].
pub(crate) fn db_err(e: DbErr) -> AppError {
    AppError::Database(e.to_string())
}

/// Map a database error on insert, turning unique-constraint violations into
/// [`AppError::Duplicate`].
pub(crate) fn unique_err(e: DbErr, what: &str) -> AppError {
    if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        AppError::Duplicate(format!("{what} already exists"))
    } else {
        db_err(e)
    }
}

/// Unwrap a transaction error, preserving application errors raised inside the
/// closure.
pub(crate) fn tx_err(e: TransactionError<AppError>) -> AppError {
    match e {
        TransactionError::Connection(e) => db_err(e),
        TransactionError::Transaction(e) => e,
    }
}
