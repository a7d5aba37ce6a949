//! Official exchange rate model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An exchange rate published by an official source.
///
/// Produced once by the official rate tool and never mutated afterwards.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExchangeRate {
    /// Currency pair in `BASE/QUOTE` form, e.g. `USD/RUB`.
    pub currency_pair: String,

    /// Units of the quote currency per one unit of the base currency.
    pub rate: f64,

    /// Publication date as reported by the source (`YYYY-MM-DD`).
    pub as_of: String,
}

impl fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Official rate on {}: {} {:.4}",
            self.as_of, self.currency_pair, self.rate
        )
    }
}
