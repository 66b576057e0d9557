use std::env;
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_MAILBOX_SIZE: usize = 32;
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

/// Configuration error type
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Failed to parse environment variable '{key}': {details}")]
    ParseError { key: String, details: String },
}

/// Runtime settings for the inventory system.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryConfig {
    /// Snapshot file backing the store. `None` keeps items in memory only.
    pub data_path: Option<PathBuf>,
    /// Capacity of the store actor's mailbox.
    pub mailbox_size: usize,
    pub currency_symbol: String,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            mailbox_size: DEFAULT_MAILBOX_SIZE,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

impl InventoryConfig {
    /// Reads `INVENTORY_DATA_PATH`, `INVENTORY_MAILBOX_SIZE` and
    /// `INVENTORY_CURRENCY_SYMBOL`, falling back to the defaults for unset
    /// or empty variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_path = env_non_empty("INVENTORY_DATA_PATH").map(PathBuf::from);

        let mailbox_size = match env_non_empty("INVENTORY_MAILBOX_SIZE") {
            Some(raw) => parse_mailbox_size(&raw)?,
            None => DEFAULT_MAILBOX_SIZE,
        };

        let currency_symbol = env_non_empty("INVENTORY_CURRENCY_SYMBOL")
            .unwrap_or_else(|| DEFAULT_CURRENCY_SYMBOL.to_string());

        Ok(Self {
            data_path,
            mailbox_size,
            currency_symbol,
        })
    }

    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = Some(path.into());
        self
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_mailbox_size(raw: &str) -> Result<usize, ConfigError> {
    let parse_error = |details: String| ConfigError::ParseError {
        key: "INVENTORY_MAILBOX_SIZE".to_string(),
        details,
    };
    let size: usize = raw.trim().parse().map_err(|e| parse_error(format!("{}", e)))?;
    if size == 0 {
        return Err(parse_error("must be greater than zero".to_string()));
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 3] = [
        "INVENTORY_DATA_PATH",
        "INVENTORY_MAILBOX_SIZE",
        "INVENTORY_CURRENCY_SYMBOL",
    ];

    #[test]
    fn test_defaults_when_unset() {
        temp_env::with_vars_unset(VARS, || {
            let config = InventoryConfig::from_env().unwrap();
            assert_eq!(config, InventoryConfig::default());
            assert!(config.data_path.is_none());
        });
    }

    #[test]
    fn test_reads_all_variables() {
        temp_env::with_vars(
            [
                ("INVENTORY_DATA_PATH", Some("/var/lib/inventory/items.json")),
                ("INVENTORY_MAILBOX_SIZE", Some("64")),
                ("INVENTORY_CURRENCY_SYMBOL", Some("€")),
            ],
            || {
                let config = InventoryConfig::from_env().unwrap();
                assert_eq!(
                    config.data_path,
                    Some(PathBuf::from("/var/lib/inventory/items.json"))
                );
                assert_eq!(config.mailbox_size, 64);
                assert_eq!(config.currency_symbol, "€");
            },
        );
    }

    #[test]
    fn test_empty_data_path_means_in_memory() {
        temp_env::with_var("INVENTORY_DATA_PATH", Some("  "), || {
            let config = InventoryConfig::from_env().unwrap();
            assert!(config.data_path.is_none());
        });
    }

    #[test]
    fn test_invalid_mailbox_size() {
        temp_env::with_var("INVENTORY_MAILBOX_SIZE", Some("lots"), || {
            let err = InventoryConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("INVENTORY_MAILBOX_SIZE"));
        });

        temp_env::with_var("INVENTORY_MAILBOX_SIZE", Some("0"), || {
            let err = InventoryConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("greater than zero"));
        });
    }
}
