//! Core business logic for gatherly.

pub mod services;

pub use services::*;
