//! Configuration management for taka
//!
//! This module handles loading, validation, and management of
//! taka configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Listing and pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Records per page on the expense feed
    #[serde(default = "default_feed_page_size")]
    pub feed_page_size: usize,
    /// Records per page on the record tables
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    /// Page sizes the tables offer
    #[serde(default = "default_page_size_options")]
    pub page_size_options: Vec<usize>,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            feed_page_size: default_feed_page_size(),
            default_page_size: default_page_size(),
            page_size_options: default_page_size_options(),
        }
    }
}

fn default_feed_page_size() -> usize {
    10
}

fn default_page_size() -> usize {
    10
}

fn default_page_size_options() -> Vec<usize> {
    vec![10, 20, 50, 100]
}

/// Monthly rollup settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyConfig {
    /// Records fetched in one window for monthly aggregation
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: usize,
    /// Month rows shown per page
    #[serde(default = "default_months_per_page")]
    pub months_per_page: usize,
}

impl Default for MonthlyConfig {
    fn default() -> Self {
        Self {
            fetch_limit: default_fetch_limit(),
            months_per_page: default_months_per_page(),
        }
    }
}

fn default_fetch_limit() -> usize {
    1000
}

fn default_months_per_page() -> usize {
    12
}

/// Currency formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Currency symbol
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Currency symbol position ("before" or "after")
    #[serde(default = "default_symbol_position")]
    pub position: SymbolPosition,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            position: SymbolPosition::Before,
        }
    }
}

fn default_symbol() -> String {
    "৳".to_string()
}

fn default_symbol_position() -> SymbolPosition {
    SymbolPosition::Before
}

/// Currency symbol position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPosition {
    Before,
    After,
}

impl Default for SymbolPosition {
    fn default() -> Self {
        SymbolPosition::Before
    }
}

/// Data settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the YAML seed file
    #[serde(default = "default_seed_file")]
    pub seed_file: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            seed_file: default_seed_file(),
        }
    }
}

fn default_seed_file() -> PathBuf {
    PathBuf::from("demo/seed.yaml")
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Listing settings
    #[serde(default)]
    pub listing: ListingConfig,
    /// Monthly rollup settings
    #[serde(default)]
    pub monthly: MonthlyConfig,
    /// Currency settings
    #[serde(default)]
    pub currency: CurrencyConfig,
    /// Data settings
    #[serde(default)]
    pub data: DataConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                ConfigError::IoError
            }
        })?;

        // Try to parse the YAML
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|_| ConfigError::InvalidYaml)?;

        // Validate the configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listing.feed_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "listing.feed_page_size".to_string(),
                reason: "Page size must be greater than 0".to_string(),
            });
        }

        if self.listing.default_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "listing.default_page_size".to_string(),
                reason: "Page size must be greater than 0".to_string(),
            });
        }

        if self.listing.page_size_options.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "listing.page_size_options".to_string(),
                reason: "At least one page size option is required".to_string(),
            });
        }

        if self.listing.page_size_options.iter().any(|&n| n == 0) {
            return Err(ConfigError::InvalidValue {
                field: "listing.page_size_options".to_string(),
                reason: "Page size options must be greater than 0".to_string(),
            });
        }

        if !self
            .listing
            .page_size_options
            .contains(&self.listing.default_page_size)
        {
            return Err(ConfigError::InvalidValue {
                field: "listing.default_page_size".to_string(),
                reason: "Default page size must be one of the page size options".to_string(),
            });
        }

        if self.monthly.fetch_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "monthly.fetch_limit".to_string(),
                reason: "Fetch limit must be greater than 0".to_string(),
            });
        }

        if self.monthly.months_per_page == 0 {
            return Err(ConfigError::InvalidValue {
                field: "monthly.months_per_page".to_string(),
                reason: "Months per page must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Get the path to the seed file
    pub fn seed_path(&self) -> PathBuf {
        self.data.seed_file.clone()
    }
}

// ==================== Tests ====================
