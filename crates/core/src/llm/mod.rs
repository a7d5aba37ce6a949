//! Language-model abstraction.
//!
//! This module provides the `ChatModel` trait (Adapter Pattern) with an
//! OpenAI-compatible HTTP implementation and a mock for tests and offline
//! runs.

pub mod base;
pub mod mock_model;
pub mod openai_compatible;

pub use base::{ChatMessage, ChatModel, ChatRole, LlmError};
pub use mock_model::MockModel;
pub use openai_compatible::OpenAiCompatibleModel;
