//! Compile-time catalog of add-ons and deployment targets.
//!
//! Both [`Project`] and [`Platform`] are closed enumerations. Everything that
//! varies per project (file hint, parent add-on, release family, cleanup
//! behavior, supported platforms) lives in a [`Capabilities`] table looked up
//! by variant, so the rest of the crate never compares identities ad hoc.

mod platform;
mod project;

pub use platform::Platform;
pub use project::{Capabilities, Channel, Project};
