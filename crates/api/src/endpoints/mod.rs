//! API endpoints.

mod auth;
mod event_invitations;
mod events;
mod group_invitations;
mod groups;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/events", events::router())
        .nest("/event-invitations", event_invitations::router())
        .nest("/groups", groups::router())
        .nest("/group-invitations", group_invitations::router())
}
