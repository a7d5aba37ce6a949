//! Common test utilities and helpers for integration tests.
//!
//! This module provides shared functionality across all integration tests:
//! - Test fixtures (sample response bodies, configs, projects)
//! - Custom assertions over event sequences
//! - A local HTTP stub standing in for the rate, search and chat APIs

pub mod assertions;
pub mod fixtures;
pub mod stub_server;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use stub_server::*;
