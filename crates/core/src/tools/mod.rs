//! Tool adapters.
//!
//! Each tool performs one kind of external call (network, interactive
//! input, or an in-process table lookup) and returns typed values. Tools
//! implement the [`Tool`] trait so the engine can compose them as ordinary
//! typed stages.

pub mod bank_rates;
pub mod base;
pub mod geocode;
pub mod http;
pub mod official_rate;
pub mod place_search;
pub mod user_prompt;

pub use bank_rates::BankRateTool;
pub use base::{Tool, ToolError};
pub use geocode::GeocodeTool;
pub use official_rate::OfficialRateTool;
pub use place_search::{PlaceSearchTool, SearchRequest};
pub use user_prompt::UserPromptTool;
