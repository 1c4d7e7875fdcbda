use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

use crate::converter::SessionDefaults;
use crate::currency::{Currency, CurrencyCatalog};
use crate::rates::{MissingRatePolicy, RateTable};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DefaultsConfig {
    pub source: String,
    pub target: String,
    pub amount: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            source: "USD".to_string(),
            target: "EUR".to_string(),
            amount: "1".to_string(),
        }
    }
}

fn default_convert_delay_ms() -> u64 {
    300
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Optional replacement for the built-in currency catalog.
    #[serde(default)]
    pub currencies: Option<Vec<Currency>>,
    /// Optional replacement for the built-in rate table.
    #[serde(default)]
    pub rates: Option<BTreeMap<String, BTreeMap<String, f64>>>,
    #[serde(default)]
    pub missing_rate: MissingRatePolicy,
    /// Simulated latency before a conversion result appears.
    #[serde(default = "default_convert_delay_ms")]
    pub convert_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            defaults: DefaultsConfig::default(),
            currencies: None,
            rates: None,
            missing_rate: MissingRatePolicy::default(),
            convert_delay_ms: default_convert_delay_ms(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, or falls back to
    /// the built-in defaults when no file exists there.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(AppConfig::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "kurs")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config.missing_rate.validate()?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Catalog from the config override, or the built-in one.
    pub fn catalog(&self) -> Result<CurrencyCatalog> {
        match &self.currencies {
            Some(entries) => CurrencyCatalog::new(entries.clone()),
            None => Ok(CurrencyCatalog::builtin()),
        }
    }

    /// Rate table from the config override, or the built-in one.
    pub fn rate_table(&self) -> Result<RateTable> {
        match &self.rates {
            Some(rates) => RateTable::new(rates.clone()),
            None => Ok(RateTable::builtin()),
        }
    }

    pub fn session_defaults(&self) -> SessionDefaults {
        SessionDefaults {
            source: self.defaults.source.clone(),
            target: self.defaults.target.clone(),
            amount: self.defaults.amount.clone(),
        }
    }

    pub fn convert_delay(&self) -> Duration {
        Duration::from_millis(self.convert_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.defaults.source, "USD");
        assert_eq!(config.defaults.target, "EUR");
        assert_eq!(config.defaults.amount, "1");
        assert!(config.currencies.is_none());
        assert!(config.rates.is_none());
        assert_eq!(config.missing_rate, MissingRatePolicy::Parity);
        assert_eq!(config.convert_delay_ms, 300);
    }

    #[test]
    fn test_empty_config_parses_to_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("empty config should parse");
        assert_eq!(config.defaults.source, "USD");
        assert_eq!(config.convert_delay_ms, 300);
        assert_eq!(config.missing_rate, MissingRatePolicy::Parity);
    }

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
defaults:
  source: "TJS"
  target: "USD"
  amount: "10"
rates:
  TJS:
    USD: 0.092
missing_rate: fail
convert_delay_ms: 0
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.defaults.source, "TJS");
        assert_eq!(config.defaults.target, "USD");
        assert_eq!(config.defaults.amount, "10");
        assert_eq!(config.missing_rate, MissingRatePolicy::Fail);
        assert_eq!(config.convert_delay_ms, 0);

        let table = config.rate_table().unwrap();
        assert_eq!(table.rate("TJS", "USD"), Some(0.092));
        assert_eq!(table.rate("USD", "TJS"), None);
    }

    #[test]
    fn test_currency_override_deserialization() {
        let yaml_str = r#"
currencies:
  - code: "USD"
    name: "US Dollar"
    symbol: "$"
    flag: "🇺🇸"
  - code: "TJS"
    name: "Tajikistani Somoni"
    symbol: "сом"
    flag: "🇹🇯"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).unwrap();
        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("TJS").symbol, "сом");
        // Unknown codes fall back to the first configured entry.
        assert_eq!(catalog.get("EUR").code, "USD");
    }

    #[test]
    fn test_fixed_missing_rate_policy() {
        let config: AppConfig = serde_yaml::from_str("missing_rate: !fixed 1.5").unwrap();
        assert_eq!(config.missing_rate, MissingRatePolicy::Fixed(1.5));
    }

    #[test]
    fn test_builtin_fallbacks() {
        let config = AppConfig::default();
        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.len(), 21);
        let table = config.rate_table().unwrap();
        assert_eq!(table.rate("USD", "EUR"), Some(0.85));
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let result = AppConfig::load_from_path("/nonexistent/config.yaml");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }

    #[test]
    fn test_load_rejects_invalid_fixed_rate() {
        let config_file = tempfile::NamedTempFile::new().unwrap();
        fs::write(config_file.path(), "missing_rate: !fixed -1.0").unwrap();
        let result = AppConfig::load_from_path(config_file.path());
        assert!(result.is_err());
    }
}
