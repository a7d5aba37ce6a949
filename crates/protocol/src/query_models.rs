//! Operator input.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single line of free text entered by the operator.
///
/// The value has no internal structure. It is created by the prompt tool
/// and moved into the stage that consumes it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct UserQuery(String);

impl UserQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for UserQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
