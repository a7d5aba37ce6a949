//! Demo bank rate table.
//!
//! No live integration exists: quotes come from a static table, either the
//! built-in one or `.fx-advisor/banks.yaml`. The table can be rescaled to
//! follow the official rate so the demo numbers stay plausible.

use crate::tools::base::{Tool, ToolError};
use async_trait::async_trait;
use fx_protocol::config_models::{BankEntry, BankTableConfig};
use fx_protocol::quote_models::{BankLookup, BankRateQuote, QuoteError};
use tracing::{debug, warn};

/// Official USD/RUB rate the built-in quotes were written against.
pub const DEFAULT_REFERENCE_RATE: f64 = 92.5;

const DEFAULT_BANKS: [(&str, &[&str], f64, f64); 6] = [
    ("Сбербанк", &["Sberbank", "СберБанк", "Сбер"], 91.80, 94.20),
    ("ВТБ", &["VTB"], 91.95, 94.05),
    ("Альфа-Банк", &["Alfa-Bank", "Альфа Банк", "Alfa Bank"], 92.10, 93.90),
    ("Газпромбанк", &["Gazprombank"], 91.70, 94.40),
    ("Т-Банк", &["T-Bank", "Тинькофф", "Tinkoff"], 92.00, 94.10),
    ("Райффайзенбанк", &["Raiffeisenbank", "Райффайзен"], 91.60, 94.50),
];

#[derive(Debug, Clone)]
struct BankRow {
    quote: BankRateQuote,
    /// Normalized name followed by normalized aliases.
    keys: Vec<String>,
}

/// Looks up demo buy/sell quotes by bank name.
#[derive(Debug, Clone)]
pub struct BankRateTool {
    rows: Vec<BankRow>,
    reference_rate: f64,
}

impl BankRateTool {
    /// The built-in demo table.
    pub fn builtin() -> Self {
        let entries = DEFAULT_BANKS
            .iter()
            .map(|(name, aliases, buy, sell)| BankEntry {
                name: (*name).to_string(),
                aliases: aliases.iter().map(|a| (*a).to_string()).collect(),
                buy: *buy,
                sell: *sell,
            })
            .collect();

        // The constant rows are ordered, so validation cannot fail; fall
        // back to an empty table rather than panicking.
        Self::from_table(&BankTableConfig {
            reference_rate: DEFAULT_REFERENCE_RATE,
            banks: entries,
        })
        .unwrap_or(Self {
            rows: Vec::new(),
            reference_rate: DEFAULT_REFERENCE_RATE,
        })
    }

    /// Build a table, rejecting any row with `buy > sell`.
    pub fn from_table(table: &BankTableConfig) -> Result<Self, QuoteError> {
        let rows = table
            .banks
            .iter()
            .map(|entry| {
                let quote = BankRateQuote::new(entry.name.clone(), entry.buy, entry.sell)?;
                let keys = std::iter::once(&entry.name)
                    .chain(entry.aliases.iter())
                    .map(|k| normalize(k))
                    .filter(|k| !k.is_empty())
                    .collect();
                Ok(BankRow { quote, keys })
            })
            .collect::<Result<Vec<_>, QuoteError>>()?;

        Ok(Self {
            rows,
            reference_rate: table.reference_rate,
        })
    }

    /// A copy whose quotes are rescaled by `official_rate / reference_rate`.
    ///
    /// Either every row is rescaled or none is: an unchanged copy is
    /// returned when either rate is unusable or any scaled row would be.
    pub fn anchored_to(&self, official_rate: f64) -> Self {
        let usable = |r: f64| r.is_finite() && r > 0.0;
        if !usable(official_rate) || !usable(self.reference_rate) {
            warn!(official_rate, reference_rate = self.reference_rate, "cannot anchor bank table");
            return self.clone();
        }

        let factor = official_rate / self.reference_rate;
        let rows = self
            .rows
            .iter()
            .map(|row| {
                Ok(BankRow {
                    quote: row.quote.scaled(factor)?,
                    keys: row.keys.clone(),
                })
            })
            .collect::<Result<Vec<_>, QuoteError>>();

        match rows {
            Ok(rows) => Self {
                rows,
                reference_rate: official_rate,
            },
            Err(e) => {
                warn!(official_rate, error = %e, "anchoring overflows, keeping the demo table unscaled");
                self.clone()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every quote in table order.
    pub fn all_quotes(&self) -> Vec<BankRateQuote> {
        self.rows.iter().map(|row| row.quote.clone()).collect()
    }

    /// Look up one bank.
    ///
    /// Matches the name or an alias case-insensitively, or a table name
    /// contained in `requested` (so `"Сбербанк, офис 1234"` resolves).
    /// The longest matching key wins.
    pub fn lookup(&self, requested: &str) -> BankLookup {
        let wanted = normalize(requested);

        let exact = self
            .rows
            .iter()
            .find(|row| row.keys.iter().any(|k| *k == wanted));

        let best = exact.or_else(|| {
            self.rows
                .iter()
                .filter_map(|row| {
                    row.keys
                        .iter()
                        .filter(|k| wanted.contains(k.as_str()))
                        .map(|k| k.chars().count())
                        .max()
                        .map(|len| (len, row))
                })
                .max_by_key(|(len, _)| *len)
                .map(|(_, row)| row)
        });

        match best {
            Some(row) => BankLookup::Found {
                quote: row.quote.clone(),
            },
            None => {
                debug!(requested, "bank not in demo table");
                BankLookup::NotFound {
                    requested: requested.to_string(),
                }
            }
        }
    }

    /// Look up several banks, one result per requested name, in order.
    pub fn lookup_many<S: AsRef<str>>(&self, names: &[S]) -> Vec<BankLookup> {
        names.iter().map(|name| self.lookup(name.as_ref())).collect()
    }
}

impl Default for BankRateTool {
    fn default() -> Self {
        Self::builtin()
    }
}

#[async_trait]
impl Tool for BankRateTool {
    type Input = Vec<String>;
    type Output = Vec<BankLookup>;

    fn name(&self) -> &'static str {
        "bank_rates"
    }

    /// Never fails: unknown banks come back as [`BankLookup::NotFound`].
    async fn call(&self, input: Vec<String>) -> Result<Vec<BankLookup>, ToolError> {
        Ok(self.lookup_many(&input))
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase().replace('ё', "е")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_is_valid() {
        let tool = BankRateTool::builtin();
        assert_eq!(tool.len(), DEFAULT_BANKS.len());
        for quote in tool.all_quotes() {
            assert!(quote.buy_rate() <= quote.sell_rate(), "{quote}");
        }
    }

    #[test]
    fn test_lookup_exact_and_case_insensitive() {
        let tool = BankRateTool::builtin();
        let found = tool.lookup("втб");
        assert_eq!(found.quote().map(BankRateQuote::bank_name), Some("ВТБ"));

        let alias = tool.lookup("Tinkoff");
        assert_eq!(alias.quote().map(BankRateQuote::bank_name), Some("Т-Банк"));
    }

    #[test]
    fn test_lookup_name_inside_title() {
        let tool = BankRateTool::builtin();
        let found = tool.lookup("Сбербанк, дополнительный офис №9038/0100");
        assert_eq!(found.quote().map(BankRateQuote::bank_name), Some("Сбербанк"));
    }

    #[test]
    fn test_lookup_unknown_bank_is_not_found() {
        let tool = BankRateTool::builtin();
        assert_eq!(
            tool.lookup("Банк Рога и Копыта"),
            BankLookup::NotFound {
                requested: "Банк Рога и Копыта".to_string()
            }
        );
    }

    #[test]
    fn test_lookup_many_keeps_order() {
        let tool = BankRateTool::builtin();
        let results = tool.lookup_many(&["Газпромбанк", "Nobody", "ВТБ"]);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_found());
        assert!(!results[1].is_found());
        assert_eq!(results[2].quote().map(BankRateQuote::bank_name), Some("ВТБ"));
    }

    #[test]
    fn test_from_table_rejects_inverted_row() {
        let table = BankTableConfig {
            reference_rate: 90.0,
            banks: vec![BankEntry {
                name: "Broken".to_string(),
                aliases: Vec::new(),
                buy: 95.0,
                sell: 94.0,
            }],
        };
        assert!(matches!(
            BankRateTool::from_table(&table),
            Err(QuoteError::Inverted { .. })
        ));
    }

    #[test]
    fn test_anchored_to_rescales_and_keeps_order() {
        let tool = BankRateTool::builtin().anchored_to(DEFAULT_REFERENCE_RATE * 1.1);
        let sber = tool.lookup("Сбербанк");
        let quote = sber.quote().unwrap();
        assert!((quote.buy_rate() - 91.80 * 1.1).abs() < 1e-9);
        for quote in tool.all_quotes() {
            assert!(quote.buy_rate() <= quote.sell_rate());
        }
    }

    #[test]
    fn test_anchored_to_ignores_bad_rate() {
        let tool = BankRateTool::builtin();
        let same = tool.anchored_to(0.0);
        assert_eq!(same.all_quotes(), tool.all_quotes());
    }

    #[test]
    fn test_anchored_to_is_all_or_nothing() {
        let table = BankTableConfig {
            reference_rate: 1.0,
            banks: vec![
                BankEntry {
                    name: "Малый".to_string(),
                    aliases: Vec::new(),
                    buy: 1.0,
                    sell: 2.0,
                },
                BankEntry {
                    name: "Огромный".to_string(),
                    aliases: Vec::new(),
                    buy: 1e300,
                    sell: 1.5e300,
                },
            ],
        };
        let tool = BankRateTool::from_table(&table).unwrap();

        // The second row overflows to infinity, so neither row is scaled.
        let anchored = tool.anchored_to(1e10);
        assert_eq!(anchored.all_quotes(), tool.all_quotes());
    }

    #[tokio::test]
    async fn test_tool_call_never_fails() {
        let tool = BankRateTool::builtin();
        let results = tool
            .call(vec!["ВТБ".to_string(), "Unknown".to_string()])
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().any(BankLookup::is_found));
    }
}
