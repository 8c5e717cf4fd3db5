//! Common utilities and shared types for gatherly.
//!
//! This crate provides foundational components used across all gatherly crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Authentication**: JWT access/refresh token issuance and CSRF token minting
//!
//! # Example
//!
//! ```no_run
//! use gatherly_common::{AppResult, Config};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     println!("Listening on port {}", config.server.port);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod config;
pub mod error;

pub use auth::{AccessClaims, TokenKind, decode_token, encode_token, generate_csrf_token};
pub use config::Config;
pub use error::{AppError, AppResult};
