//! Stage results.
//!
//! Every pipeline stage ends in a [`StageOutcome`]: either its value or a
//! [`StageFailure`] describing why the value is unknown.

use crate::llm::LlmError;
use crate::tools::ToolError;
use fx_protocol::run_models::StageKind;
use serde::Serialize;
use std::fmt;

/// Why a stage has no value.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    Network,
    Auth,
    Parse,
    EmptyResult,
    Input,
    /// The language model call failed.
    Llm,
    /// The stage's input was unavailable, so it never ran.
    Skipped,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Auth => "auth",
            Self::Parse => "parse",
            Self::EmptyResult => "empty-result",
            Self::Input => "input",
            Self::Llm => "llm",
            Self::Skipped => "skipped",
        }
    }
}

impl From<&ToolError> for FailureKind {
    fn from(error: &ToolError) -> Self {
        match error {
            ToolError::Network(_) => Self::Network,
            ToolError::Auth(_) => Self::Auth,
            ToolError::Parse(_) => Self::Parse,
            ToolError::EmptyResult(_) => Self::EmptyResult,
            ToolError::Input(_) => Self::Input,
        }
    }
}

/// A stage that produced no value.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StageFailure {
    pub stage: StageKind,
    pub kind: FailureKind,
    pub message: String,
}

impl StageFailure {
    pub fn from_tool(stage: StageKind, error: &ToolError) -> Self {
        Self {
            stage,
            kind: error.into(),
            message: error.to_string(),
        }
    }

    pub fn from_llm(error: &LlmError) -> Self {
        Self {
            stage: StageKind::Recommendation,
            kind: FailureKind::Llm,
            message: error.to_string(),
        }
    }

    pub fn skipped(stage: StageKind, reason: impl Into<String>) -> Self {
        Self {
            stage,
            kind: FailureKind::Skipped,
            message: reason.into(),
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.kind == FailureKind::Skipped
    }
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_skipped() {
            write!(f, "{}: skipped ({})", self.stage, self.message)
        } else {
            write!(f, "{}: {}", self.stage, self.message)
        }
    }
}

/// The result of one stage, carried forward to the next.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "status", content = "value", rename_all = "camelCase")]
pub enum StageOutcome<T> {
    Ok(T),
    Failed(StageFailure),
}

impl<T> StageOutcome<T> {
    pub fn from_tool(stage: StageKind, result: Result<T, ToolError>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(error) => Self::Failed(StageFailure::from_tool(stage, &error)),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> StageOutcome<U> {
        match self {
            Self::Ok(value) => StageOutcome::Ok(f(value)),
            Self::Failed(failure) => StageOutcome::Failed(failure),
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Ok(value) => Some(value),
            Self::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&StageFailure> {
        match self {
            Self::Ok(_) => None,
            Self::Failed(failure) => Some(failure),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }
}
