//! The advisor report and its text renderings.
//!
//! `render_context` is what the language model sees; `render_plain` is
//! what the operator sees. Both mark every failed source explicitly and
//! print `unknown` in place of missing values.

use crate::engine::outcome::{StageFailure, StageOutcome};
use fx_protocol::geo_models::GeoLocation;
use fx_protocol::place_models::PlaceResult;
use fx_protocol::quote_models::{BankLookup, BankRateQuote};
use fx_protocol::rate_models::ExchangeRate;
use serde::Serialize;
use std::fmt::Write;
use uuid::Uuid;

const UNKNOWN: &str = "unknown";

/// Everything one run found out.
#[derive(Serialize, Debug, Clone)]
pub struct AdvisorReport {
    pub run_id: Uuid,
    pub address: StageOutcome<String>,
    /// `None` when no geocoder is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<StageOutcome<GeoLocation>>,
    pub official_rate: StageOutcome<ExchangeRate>,
    pub places: StageOutcome<Vec<PlaceResult>>,
    pub bank_quotes: StageOutcome<Vec<BankLookup>>,
    /// `None` when the language model was disabled for the run.
    pub recommendation: Option<StageOutcome<String>>,
}

impl AdvisorReport {
    /// Failed and skipped stages, in pipeline order.
    pub fn failures(&self) -> Vec<&StageFailure> {
        [
            self.address.failure(),
            self.location.as_ref().and_then(|l| l.failure()),
            self.official_rate.failure(),
            self.places.failure(),
            self.bank_quotes.failure(),
            self.recommendation.as_ref().and_then(|r| r.failure()),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures().is_empty()
    }

    /// Quotes that were found in the demo table.
    pub fn found_quotes(&self) -> impl Iterator<Item = &BankRateQuote> {
        self.bank_quotes
            .value()
            .into_iter()
            .flatten()
            .filter_map(BankLookup::quote)
    }

    /// The recommendation text, if one was produced.
    pub fn recommendation_text(&self) -> Option<&str> {
        self.recommendation
            .as_ref()
            .and_then(|r| r.value())
            .map(String::as_str)
    }

    /// The data sections shared by both renderings.
    pub fn render_context(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(
            out,
            "Address: {}",
            value_or_failure(&self.address, |a| a.clone())
        );
        if let Some(location) = &self.location {
            let _ = writeln!(
                out,
                "Location: {}",
                value_or_failure(location, |l| l.to_string())
            );
        }
        let _ = writeln!(
            out,
            "Official rate: {}",
            value_or_failure(&self.official_rate, |r| {
                format!("{} {:.4} as of {}", r.currency_pair, r.rate, r.as_of)
            })
        );

        match &self.places {
            StageOutcome::Ok(places) => {
                let _ = writeln!(out, "Banks near the address:");
                for (i, place) in places.iter().enumerate() {
                    let _ = write!(out, "{}. {}", i + 1, place.name);
                    if !place.address.is_empty() {
                        let _ = write!(out, " ({})", place.address);
                    }
                    out.push('\n');
                }
            }
            StageOutcome::Failed(failure) => {
                let _ = writeln!(out, "Banks near the address: {}", failed_marker(failure));
            }
        }

        match &self.bank_quotes {
            StageOutcome::Ok(lookups) => {
                let _ = writeln!(out, "Bank quotes (demo data, RUB per 1 USD):");
                for lookup in lookups {
                    match lookup {
                        BankLookup::Found { quote } => {
                            let _ = writeln!(out, "- {quote}");
                        }
                        BankLookup::NotFound { requested } => {
                            let _ = writeln!(out, "- {requested}: {UNKNOWN} (not in demo table)");
                        }
                    }
                }
            }
            StageOutcome::Failed(failure) => {
                let _ = writeln!(out, "Bank quotes: {}", failed_marker(failure));
            }
        }

        out
    }

    /// The operator-facing report.
    ///
    /// The data issues footer is appended whenever any stage failed or was
    /// skipped, after the recommendation, so a model answer can never hide
    /// a missing source.
    pub fn render_plain(&self) -> String {
        let mut out = self.render_context();

        match &self.recommendation {
            Some(StageOutcome::Ok(text)) => {
                let _ = write!(out, "\nRecommendation:\n{}\n", text.trim_end());
            }
            Some(StageOutcome::Failed(failure)) => {
                let _ = write!(out, "\nRecommendation: {}\n", failed_marker(failure));
            }
            None => {}
        }

        let failures = self.failures();
        if !failures.is_empty() {
            out.push_str("\nData source issues:\n");
            for failure in failures {
                let _ = writeln!(out, "- {failure}");
            }
        }

        out
    }
}

fn value_or_failure<T>(outcome: &StageOutcome<T>, render: impl Fn(&T) -> String) -> String {
    match outcome {
        StageOutcome::Ok(value) => render(value),
        StageOutcome::Failed(failure) => failed_marker(failure),
    }
}

fn failed_marker(failure: &StageFailure) -> String {
    format!("{UNKNOWN} [SOURCE FAILED: {failure}]")
}
