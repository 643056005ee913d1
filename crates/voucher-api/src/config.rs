use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use thiserror::Error;
use voucher_core::DEFAULT_SHEET_NAME;

const IN_MEMORY_PATH: &str = ":memory:";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    InMemory,
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database: DatabaseLocation,
    pub sheet_name: String,
    pub max_body_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = value_or_default(&lookup, "VOUCHER_API_BIND_ADDR", "127.0.0.1:8080");

        let db_path = value_or_default(&lookup, "VOUCHER_DB_PATH", "vouchers.db");
        let database = if db_path == IN_MEMORY_PATH {
            DatabaseLocation::InMemory
        } else {
            DatabaseLocation::File(PathBuf::from(db_path))
        };

        let sheet_name = value_or_default(&lookup, "VOUCHER_SHEET_NAME", DEFAULT_SHEET_NAME);
        if sheet_name.chars().count() > 100 {
            return Err(ConfigError::Invalid(
                "VOUCHER_SHEET_NAME must be at most 100 characters".to_string(),
            ));
        }

        let max_body_bytes = value_or_default(&lookup, "VOUCHER_MAX_BODY_BYTES", "1048576")
            .parse::<usize>()
            .map_err(|_| {
                ConfigError::Invalid(
                    "VOUCHER_MAX_BODY_BYTES must be an integer in [1024, 16777216]".to_string(),
                )
            })?;
        if !(1_024..=16_777_216).contains(&max_body_bytes) {
            return Err(ConfigError::Invalid(
                "VOUCHER_MAX_BODY_BYTES must be in [1024, 16777216]".to_string(),
            ));
        }

        Ok(Self {
            bind_addr,
            database,
            sheet_name,
            max_body_bytes,
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            bind_addr: "127.0.0.1:0".to_string(),
            database: DatabaseLocation::InMemory,
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            max_body_bytes: 1_048_576,
        }
    }
}

fn value_or_default(lookup: impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    optional_trimmed(lookup, name).unwrap_or_else(|| default.to_string())
}

fn optional_trimmed(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        AppConfig::from_lookup(|key| map.get(key).map(|value| (*value).to_string()))
    }

    #[test]
    fn config_defaults_without_env() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(
            config.database,
            DatabaseLocation::File(PathBuf::from("vouchers.db"))
        );
        assert_eq!(config.sheet_name, "Vouchers");
        assert_eq!(config.max_body_bytes, 1_048_576);
    }

    #[test]
    fn config_blank_values_fall_back_to_defaults() {
        let config = config_from(&[("VOUCHER_SHEET_NAME", "   ")]).unwrap();
        assert_eq!(config.sheet_name, "Vouchers");
    }

    #[test]
    fn config_recognizes_in_memory_database() {
        let config = config_from(&[("VOUCHER_DB_PATH", ":memory:")]).unwrap();
        assert_eq!(config.database, DatabaseLocation::InMemory);
    }

    #[test]
    fn config_rejects_out_of_range_body_limit() {
        let err = config_from(&[("VOUCHER_MAX_BODY_BYTES", "10")]).unwrap_err();
        assert!(err.to_string().contains("VOUCHER_MAX_BODY_BYTES"));

        let err = config_from(&[("VOUCHER_MAX_BODY_BYTES", "lots")]).unwrap_err();
        assert!(err.to_string().contains("must be an integer"));
    }

    #[test]
    fn config_rejects_long_sheet_name() {
        let name = "x".repeat(101);
        assert!(config_from(&[("VOUCHER_SHEET_NAME", name.as_str())]).is_err());
    }
}
