//! Runtime run state models.
//!
//! A run is one pass through the advisor pipeline. Its state exists only
//! for the lifetime of the process.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lifecycle status of a run.
///
/// Pending -> Running -> Completed | Failed
///
/// A run whose stages failed still completes; `Failed` is reserved for
/// runs that could not produce a report at all.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

/// The fixed sequence of pipeline stages.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum StageKind {
    /// Ask the operator for an address.
    UserAddress,
    /// Locate the address with the geocoder.
    Geocode,
    /// Fetch the official exchange rate.
    OfficialRate,
    /// Search for banks near the address.
    PlaceSearch,
    /// Look up demo quotes for the banks found.
    BankRates,
    /// Ask the language model for a recommendation.
    Recommendation,
}

impl StageKind {
    pub const ALL: [StageKind; 6] = [
        StageKind::UserAddress,
        StageKind::Geocode,
        StageKind::OfficialRate,
        StageKind::PlaceSearch,
        StageKind::BankRates,
        StageKind::Recommendation,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::UserAddress => "user address",
            Self::Geocode => "geocode",
            Self::OfficialRate => "official rate",
            Self::PlaceSearch => "place search",
            Self::BankRates => "bank rates",
            Self::Recommendation => "recommendation",
        }
    }

    /// Zero-based position of this stage in the pipeline.
    pub fn index(self) -> usize {
        match self {
            Self::UserAddress => 0,
            Self::Geocode => 1,
            Self::OfficialRate => 2,
            Self::PlaceSearch => 3,
            Self::BankRates => 4,
            Self::Recommendation => 5,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Runtime state of one pipeline execution.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Run {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub status: RunStatus,
    /// Zero-based index of the stage currently executing.
    pub current_stage: usize,
    /// Accumulated log lines.
    pub logs: Vec<String>,
}
