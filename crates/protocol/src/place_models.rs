//! Place candidates extracted from search results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A place candidate extracted from one organic search result.
///
/// A sequence of `PlaceResult` keeps the ranking order of the upstream
/// search API. The fields come from text heuristics and are best-effort.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PlaceResult {
    /// Place name, usually derived from the result title.
    pub name: String,

    /// Address candidate. Falls back to the snippet when no address-like
    /// fragment was found.
    pub address: String,

    /// The unprocessed snippet text returned by the search API.
    pub raw_snippet: String,

    /// Result URL, when the API reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl fmt::Display for PlaceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.address.is_empty() {
            write!(f, " ({})", self.address)?;
        }
        if let Some(link) = &self.link {
            write!(f, " <{link}>")?;
        }
        Ok(())
    }
}
