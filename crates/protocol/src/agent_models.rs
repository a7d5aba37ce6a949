//! Agent role models for `.fx-advisor/agents/*.md`.
//!
//! A role is the language-model persona that turns the pipeline's
//! accumulated text into prose. Roles are Markdown files with YAML front
//! matter; the file body is the system prompt.

use serde::{Deserialize, Serialize};

/// A language-model role and its system prompt.
///
/// # Example
///
/// ```markdown
/// ---
/// name: advisor
/// description: Recommends where to exchange currency
/// model: zai-org/GLM-4.5
/// color: green
/// ---
///
/// You are a careful currency exchange advisor...
/// ```
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AgentRole {
    /// Unique role name, referenced from the CLI (`--role`).
    pub name: String,

    /// Human-readable description of the role.
    #[serde(default)]
    pub description: String,

    /// Model override for this role. Empty means "use `[llm].model`".
    #[serde(default)]
    pub model: String,

    /// Terminal color hint used when printing this role's output.
    #[serde(default)]
    pub color: String,

    /// The Markdown body of the file.
    #[serde(skip)]
    pub system_prompt: String,
}

impl AgentRole {
    /// The model to use for this role, given the configured default.
    pub fn effective_model<'a>(&'a self, default_model: &'a str) -> &'a str {
        if self.model.trim().is_empty() {
            default_model
        } else {
            &self.model
        }
    }
}
