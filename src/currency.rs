//! Currency reference data: the ordered catalog of known currencies.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Currency {
    pub code: String,
    pub name: String,
    pub symbol: String,
    pub flag: String,
}

/// Ordered, non-empty set of known currencies. Order matters only for
/// display; the first entry doubles as the fallback for unknown codes.
#[derive(Debug, Clone)]
pub struct CurrencyCatalog {
    entries: Vec<Currency>,
}

impl CurrencyCatalog {
    pub fn new(entries: Vec<Currency>) -> Result<Self> {
        if entries.is_empty() {
            bail!("Currency catalog must not be empty");
        }
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|e| e.code == entry.code) {
                bail!("Duplicate currency code in catalog: {}", entry.code);
            }
        }
        Ok(CurrencyCatalog { entries })
    }

    /// The catalog shipped with the app.
    pub fn builtin() -> Self {
        let entries = BUILTIN_CURRENCIES
            .iter()
            .map(|(code, name, symbol, flag)| Currency {
                code: (*code).to_string(),
                name: (*name).to_string(),
                symbol: (*symbol).to_string(),
                flag: (*flag).to_string(),
            })
            .collect();
        CurrencyCatalog { entries }
    }

    pub fn find(&self, code: &str) -> Option<&Currency> {
        self.entries.iter().find(|c| c.code == code)
    }

    /// Resolves a code to its display metadata. Unknown codes resolve
    /// to the first catalog entry so rendering never fails.
    pub fn get(&self, code: &str) -> &Currency {
        self.find(code).unwrap_or(&self.entries[0])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Currency> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

const BUILTIN_CURRENCIES: &[(&str, &str, &str, &str)] = &[
    ("USD", "US Dollar", "$", "🇺🇸"),
    ("EUR", "Euro", "€", "🇪🇺"),
    ("GBP", "British Pound", "£", "🇬🇧"),
    ("JPY", "Japanese Yen", "¥", "🇯🇵"),
    ("CAD", "Canadian Dollar", "C$", "🇨🇦"),
    ("AUD", "Australian Dollar", "A$", "🇦🇺"),
    ("CHF", "Swiss Franc", "Fr", "🇨🇭"),
    ("CNY", "Chinese Yuan", "¥", "🇨🇳"),
    ("INR", "Indian Rupee", "₹", "🇮🇳"),
    ("KRW", "South Korean Won", "₩", "🇰🇷"),
    ("BRL", "Brazilian Real", "R$", "🇧🇷"),
    ("MXN", "Mexican Peso", "$", "🇲🇽"),
    ("SGD", "Singapore Dollar", "S$", "🇸🇬"),
    ("NZD", "New Zealand Dollar", "NZ$", "🇳🇿"),
    ("ZAR", "South African Rand", "R", "🇿🇦"),
    ("SEK", "Swedish Krona", "kr", "🇸🇪"),
    ("NOK", "Norwegian Krone", "kr", "🇳🇴"),
    ("RUB", "Russian Ruble", "₽", "🇷🇺"),
    ("TRY", "Turkish Lira", "₺", "🇹🇷"),
    ("AED", "UAE Dirham", "د.إ", "🇦🇪"),
    ("TJS", "Tajikistani Somoni", "сом", "🇹🇯"),
];
