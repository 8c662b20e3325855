//! Application settings loaded from `config.toml`.
//!
//! The file is optional. Missing keys take their defaults, and a missing file
//! yields `AppConfig::default()`.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Default location of the settings file
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Settings structure representing the entire config.toml file
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Symbol printed in front of amounts (e.g., "₹", "$")
    pub currency_symbol: String,
    /// Categories offered when logging expenses and setting budgets
    pub expense_categories: Vec<String>,
    /// How many months back `/stats` looks
    pub statistics_months: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
            expense_categories: [
                "Food",
                "Transport",
                "Shopping",
                "Bills",
                "Entertainment",
                "Health",
                "Other",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            statistics_months: 6,
        }
    }
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - `statistics_months` is zero
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    parse_config(&contents)
}

/// Parses settings from TOML text.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    if config.statistics_months == 0 {
        return Err(Error::Config {
            message: "statistics_months must be at least 1".to_string(),
        });
    }

    Ok(config)
}

/// Loads `./config.toml`, or the defaults when the file does not exist.
pub fn load_default_config() -> Result<AppConfig> {
    if Path::new(DEFAULT_CONFIG_PATH).exists() {
        load_config(DEFAULT_CONFIG_PATH)
    } else {
        tracing::info!("No {DEFAULT_CONFIG_PATH} found, using default settings");
        Ok(AppConfig::default())
    }
}
