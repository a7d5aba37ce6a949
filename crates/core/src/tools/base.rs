//! Base Tool trait and error type.

use async_trait::async_trait;
use thiserror::Error;

/// Failures a tool reports to its caller.
///
/// None of these abort a pipeline run: the engine converts them into a
/// failed stage outcome.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// Transport failure, timeout, or non-success HTTP status.
    #[error("network error: {0}")]
    Network(String),

    /// Missing or rejected API key.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The response did not have the expected shape.
    #[error("unexpected response: {0}")]
    Parse(String),

    /// The upstream API returned no usable results.
    #[error("no results for query '{0}'")]
    EmptyResult(String),

    /// Operator input could not be read.
    #[error("input unavailable: {0}")]
    Input(String),
}

impl ToolError {
    /// Short machine-friendly name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Auth(_) => "auth",
            Self::Parse(_) => "parse",
            Self::EmptyResult(_) => "empty-result",
            Self::Input(_) => "input",
        }
    }

    /// Whether the caller could reasonably retry, possibly with a relaxed
    /// input. Tools themselves never retry.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Auth(_))
    }
}

/// A single-purpose, statically typed pipeline stage.
///
/// The associated types declare what the stage consumes and produces, so
/// composing tools is ordinary function composition.
#[async_trait]
pub trait Tool: Send + Sync {
    type Input: Send + 'static;
    type Output: Send + 'static;

    /// Stable tool name used in logs.
    fn name(&self) -> &'static str;

    async fn call(&self, input: Self::Input) -> Result<Self::Output, ToolError>;
}
