//! Language-model roles.
//!
//! Roles are loaded from `.fx-advisor/agents/*.md` and looked up by name
//! through the [`RoleRegistry`]. The synthesizing stage of the pipeline
//! is the only consumer.

pub mod registry;

pub use registry::{RoleRegistry, DEFAULT_ROLE};
