//! Core types shared by every layer of addonsync.
//!
//! - [`error`] - typed engine errors and CLI error reporting

pub mod error;

pub use error::{ErrorContext, UpdateError, UpdateResult, user_friendly_error};
