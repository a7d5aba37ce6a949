//! Bank buy/sell quotes.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised when a quote violates its invariants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteError {
    #[error("rates for '{bank}' must be finite and positive (buy {buy}, sell {sell})")]
    NonPositive { bank: String, buy: f64, sell: f64 },

    #[error("buy rate {buy} exceeds sell rate {sell} for '{bank}'")]
    Inverted { bank: String, buy: f64, sell: f64 },
}

/// Buy and sell rates offered by one bank.
///
/// `buy_rate <= sell_rate` holds for every value of this type; the only
/// ways to build one are [`BankRateQuote::new`] and deserialization,
/// which both validate.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "RawQuote")]
pub struct BankRateQuote {
    bank_name: String,
    buy_rate: f64,
    sell_rate: f64,
}

#[derive(Deserialize)]
struct RawQuote {
    bank_name: String,
    buy_rate: f64,
    sell_rate: f64,
}

impl TryFrom<RawQuote> for BankRateQuote {
    type Error = QuoteError;

    fn try_from(raw: RawQuote) -> Result<Self, Self::Error> {
        Self::new(raw.bank_name, raw.buy_rate, raw.sell_rate)
    }
}

impl BankRateQuote {
    pub fn new(
        bank_name: impl Into<String>,
        buy_rate: f64,
        sell_rate: f64,
    ) -> Result<Self, QuoteError> {
        let bank_name = bank_name.into();
        let valid = |r: f64| r.is_finite() && r > 0.0;
        if !valid(buy_rate) || !valid(sell_rate) {
            return Err(QuoteError::NonPositive {
                bank: bank_name,
                buy: buy_rate,
                sell: sell_rate,
            });
        }
        if buy_rate > sell_rate {
            return Err(QuoteError::Inverted {
                bank: bank_name,
                buy: buy_rate,
                sell: sell_rate,
            });
        }
        Ok(Self {
            bank_name,
            buy_rate,
            sell_rate,
        })
    }

    pub fn bank_name(&self) -> &str {
        &self.bank_name
    }

    /// Rate at which the bank buys the foreign currency from a customer.
    pub fn buy_rate(&self) -> f64 {
        self.buy_rate
    }

    /// Rate at which the bank sells the foreign currency to a customer.
    pub fn sell_rate(&self) -> f64 {
        self.sell_rate
    }

    pub fn spread(&self) -> f64 {
        self.sell_rate - self.buy_rate
    }

    /// Return a copy with both rates multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Result<Self, QuoteError> {
        Self::new(
            self.bank_name.clone(),
            self.buy_rate * factor,
            self.sell_rate * factor,
        )
    }
}

impl fmt::Display for BankRateQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: buy {:.2}, sell {:.2}",
            self.bank_name, self.buy_rate, self.sell_rate
        )
    }
}

/// Result of looking up one bank in the demo rate table.
///
/// A missing bank is an expected outcome, so it is a variant rather than
/// an error.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum BankLookup {
    Found { quote: BankRateQuote },
    NotFound { requested: String },
}

impl BankLookup {
    pub fn quote(&self) -> Option<&BankRateQuote> {
        match self {
            Self::Found { quote } => Some(quote),
            Self::NotFound { .. } => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }
}
