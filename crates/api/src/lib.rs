//! HTTP API layer for gatherly.
//!
//! - **Endpoints**: REST routes for users, events, groups, invitations,
//!   RSVPs, and comments
//! - **Extractors**: Authentication
//! - **Middleware**: Token resolution and CSRF double-submit checks
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, app};
