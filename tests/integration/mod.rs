//! Integration test suite for addonsync
//!
//! End-to-end tests driving the public engine API against canned upstream
//! responses ([`addonsync::test_utils::FakeHttp`]) and the `addonsync` binary
//! against temporary server directories. Nothing here touches the network.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **update_flow**: outcome aggregation, idempotence, asset selection, atomicity
//! - **extensions**: Geyser extensions and their parent requirement
//! - **locator**: picking the installed artifact among several candidates
//! - **cleanup_marker**: the deferred cleanup marker lifecycle
//! - **cli**: the command-line host

mod common;

mod cleanup_marker;
mod cli;
mod extensions;
mod locator;
mod update_flow;
