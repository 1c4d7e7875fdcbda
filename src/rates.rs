//! Exchange rate table and the policy applied to unlisted pairs.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Static mapping from a base currency to quote rates (quote units per
/// one base unit). The table is not guaranteed complete, and no
/// symmetry between `rate(a, b)` and `rate(b, a)` is enforced.
#[derive(Debug, Clone)]
pub struct RateTable {
    rates: BTreeMap<String, BTreeMap<String, f64>>,
}

impl RateTable {
    /// Builds a table from configured rates. Every rate must be a
    /// positive finite number.
    pub fn new(rates: BTreeMap<String, BTreeMap<String, f64>>) -> Result<Self> {
        for (base, quotes) in &rates {
            for (quote, rate) in quotes {
                if !rate.is_finite() || *rate <= 0.0 {
                    bail!("Invalid rate {rate} for pair {base}->{quote}");
                }
            }
        }
        Ok(RateTable { rates })
    }

    /// The rate table shipped with the app.
    pub fn builtin() -> Self {
        let mut rates = BTreeMap::new();
        for (base, quotes) in BUILTIN_RATES {
            let row: BTreeMap<String, f64> = quotes
                .iter()
                .map(|(quote, rate)| ((*quote).to_string(), *rate))
                .collect();
            rates.insert((*base).to_string(), row);
        }
        RateTable { rates }
    }

    pub fn rate(&self, base: &str, quote: &str) -> Option<f64> {
        self.rates.get(base).and_then(|row| row.get(quote)).copied()
    }

    /// Informational rate string for display, four decimal places.
    /// Unlisted pairs render as parity; the conversion math never uses
    /// this value.
    pub fn display_rate(&self, base: &str, quote: &str) -> String {
        match self.rate(base, quote) {
            Some(rate) => format!("{rate:.4}"),
            None => "1.0000".to_string(),
        }
    }
}

/// What a rate lookup should do when the pair is not in the table.
///
/// The shipped default is `Parity`, matching the long-standing behavior
/// of treating unknown pairs as 1:1. `Fail` surfaces the miss as an
/// error instead, which reaches the user through the conversion-failed
/// notification.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissingRatePolicy {
    #[default]
    Parity,
    Fixed(f64),
    Fail,
}

impl MissingRatePolicy {
    pub fn validate(&self) -> Result<()> {
        if let MissingRatePolicy::Fixed(rate) = self {
            if !rate.is_finite() || *rate <= 0.0 {
                bail!("Invalid fixed fallback rate: {rate}");
            }
        }
        Ok(())
    }
}

const BUILTIN_RATES: &[(&str, &[(&str, f64)])] = &[
    (
        "USD",
        &[
            ("EUR", 0.85),
            ("GBP", 0.73),
            ("JPY", 110.0),
            ("CAD", 1.25),
            ("AUD", 1.35),
            ("CHF", 0.92),
            ("CNY", 6.45),
            ("INR", 74.5),
            ("KRW", 1180.0),
            ("BRL", 5.2),
            ("MXN", 20.1),
            ("SGD", 1.35),
            ("NZD", 1.42),
            ("ZAR", 14.8),
            ("SEK", 8.6),
            ("NOK", 8.9),
            ("RUB", 74.0),
            ("TRY", 8.4),
            ("AED", 3.67),
            ("TJS", 10.9),
        ],
    ),
    (
        "EUR",
        &[
            ("USD", 1.18),
            ("GBP", 0.86),
            ("JPY", 129.0),
            ("CAD", 1.47),
            ("AUD", 1.59),
            ("CHF", 1.08),
            ("CNY", 7.6),
            ("INR", 87.8),
            ("KRW", 1391.0),
            ("BRL", 6.13),
            ("MXN", 23.7),
            ("SGD", 1.59),
            ("NZD", 1.67),
            ("ZAR", 17.4),
            ("SEK", 10.1),
            ("NOK", 10.5),
            ("RUB", 87.2),
            ("TRY", 9.9),
            ("AED", 4.33),
            ("TJS", 12.8),
        ],
    ),
    (
        "TJS",
        &[
            ("USD", 0.092),
            ("EUR", 0.078),
            ("GBP", 0.067),
            ("JPY", 10.1),
            ("CAD", 0.115),
            ("AUD", 0.124),
            ("CHF", 0.085),
            ("CNY", 0.59),
            ("INR", 6.84),
            ("KRW", 108.3),
            ("BRL", 0.48),
            ("MXN", 1.85),
            ("SGD", 0.124),
            ("NZD", 0.131),
            ("ZAR", 1.36),
            ("SEK", 0.79),
            ("NOK", 0.82),
            ("RUB", 6.79),
            ("TRY", 0.77),
            ("AED", 0.34),
        ],
    ),
];
