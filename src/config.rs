//! Pipeline configuration.
//!
//! Read from a TOML file:
//!
//! ```toml
//! sales_filepath = "data/sales_train_validation.csv"
//! calendar_filepath = "data/calendar.csv"
//! sell_prices_filepath = "data/sell_prices.csv"
//! horizon = 28
//! ```
//!
//! Every key is required. A missing key is reported by name before any
//! data is touched.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Keys that must be present in the configuration file.
pub const REQUIRED_KEYS: &[&str] = &[
    "sales_filepath",
    "calendar_filepath",
    "sell_prices_filepath",
    "horizon",
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing required configuration key: {0}")]
    MissingKey(&'static str),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// Locations of the three input tables and the forecast horizon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Wide sales table (one `d_<n>` column per day).
    pub sales_filepath: PathBuf,
    /// Calendar table, one row per day.
    pub calendar_filepath: PathBuf,
    /// Weekly price table.
    pub sell_prices_filepath: PathBuf,
    /// Number of trailing days per series held out as test.
    pub horizon: usize,
}

/// Mirror of [`PipelineConfig`] with every key optional, so missing keys
/// can be reported by name instead of through serde's generic message.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    sales_filepath: Option<PathBuf>,
    calendar_filepath: Option<PathBuf>,
    sell_prices_filepath: Option<PathBuf>,
    horizon: Option<i64>,
}

impl PipelineConfig {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse and validate configuration text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text)?;

        let sales_filepath = raw
            .sales_filepath
            .ok_or(ConfigError::MissingKey("sales_filepath"))?;
        let calendar_filepath = raw
            .calendar_filepath
            .ok_or(ConfigError::MissingKey("calendar_filepath"))?;
        let sell_prices_filepath = raw
            .sell_prices_filepath
            .ok_or(ConfigError::MissingKey("sell_prices_filepath"))?;
        let horizon = raw.horizon.ok_or(ConfigError::MissingKey("horizon"))?;

        let horizon = usize::try_from(horizon).map_err(|_| ConfigError::InvalidValue {
            key: "horizon",
            reason: format!("must be a non-negative integer, got {}", horizon),
        })?;

        Ok(Self {
            sales_filepath,
            calendar_filepath,
            sell_prices_filepath,
            horizon,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
sales_filepath = "data/sales.csv"
calendar_filepath = "data/calendar.csv"
sell_prices_filepath = "data/sell_prices.csv"
horizon = 28
"#;

    #[test]
    fn test_parse_full_config() {
        let config = PipelineConfig::from_toml_str(FULL).unwrap();
        assert_eq!(config.sales_filepath, PathBuf::from("data/sales.csv"));
        assert_eq!(config.calendar_filepath, PathBuf::from("data/calendar.csv"));
        assert_eq!(config.sell_prices_filepath, PathBuf::from("data/sell_prices.csv"));
        assert_eq!(config.horizon, 28);
    }

    #[test]
    fn test_each_missing_key_is_named() {
        for key in REQUIRED_KEYS {
            let text: String = FULL
                .lines()
                .filter(|line| !line.starts_with(key))
                .collect::<Vec<_>>()
                .join("\n");

            match PipelineConfig::from_toml_str(&text) {
                Err(ConfigError::MissingKey(missing)) => assert_eq!(missing, *key),
                other => panic!("expected MissingKey({}), got {:?}", key, other),
            }
        }
    }

    #[test]
    fn test_negative_horizon() {
        let text = FULL.replace("horizon = 28", "horizon = -1");
        let err = PipelineConfig::from_toml_str(&text).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "horizon", .. }));
    }

    #[test]
    fn test_zero_horizon_is_valid() {
        let text = FULL.replace("horizon = 28", "horizon = 0");
        assert_eq!(PipelineConfig::from_toml_str(&text).unwrap().horizon, 0);
    }

    #[test]
    fn test_missing_file() {
        let err = PipelineConfig::load(Path::new("no/such/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
