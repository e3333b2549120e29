//! Configuration management for gastoweb
//!
//! This module handles loading, validation, and management of
//! gastoweb configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding the key/value files
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// Key under which the expense list is persisted
    #[serde(default = "default_store_key")]
    pub store_key: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            store_key: default_store_key(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./data")
}

fn default_store_key() -> String {
    "transport-expenses/v2".to_string()
}

/// Pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Rows shown per page on first load
    #[serde(default = "default_rows_per_page")]
    pub rows_per_page: usize,
    /// Choices offered in the "Filas" selector
    #[serde(default = "default_page_size_options")]
    pub page_size_options: Vec<usize>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            rows_per_page: default_rows_per_page(),
            page_size_options: default_page_size_options(),
        }
    }
}

fn default_rows_per_page() -> usize {
    5
}

fn default_page_size_options() -> Vec<usize> {
    vec![3, 5, 10]
}

/// Search box behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period before a keystroke reaches the query pipeline
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    250
}

/// Toast notification timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToastConfig {
    /// Auto-dismiss timeout on the main screen
    #[serde(default = "default_toast_timeout_ms")]
    pub timeout_ms: u64,
    /// Auto-dismiss timeout on the login screen
    #[serde(default = "default_auth_toast_timeout_ms")]
    pub auth_timeout_ms: u64,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_toast_timeout_ms(),
            auth_timeout_ms: default_auth_toast_timeout_ms(),
        }
    }
}

fn default_toast_timeout_ms() -> u64 {
    3000
}

fn default_auth_toast_timeout_ms() -> u64 {
    2500
}

/// Login screen settings. There is no real authentication behind these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_min_password_len")]
    pub min_password_len: usize,
    /// Delay between the success toast and the jump to the main screen
    #[serde(default = "default_redirect_delay_ms")]
    pub redirect_delay_ms: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            min_password_len: default_min_password_len(),
            redirect_delay_ms: default_redirect_delay_ms(),
        }
    }
}

fn default_min_password_len() -> usize {
    3
}

fn default_redirect_delay_ms() -> u64 {
    400
}

/// Currency and number formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    #[serde(default = "default_currency")]
    pub code: String,
    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            code: default_currency(),
            symbol: default_symbol(),
            decimal_places: default_decimal_places(),
        }
    }
}

fn default_currency() -> String {
    "ARS".to_string()
}

fn default_symbol() -> String {
    "$".to_string()
}

fn default_decimal_places() -> u32 {
    2
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub toast: ToastConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub currency: CurrencyConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.to_string_lossy().to_string(),
            message: e.to_string(),
        })?;

        Self::from_yaml_str(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::InvalidYaml { message: e.to_string() })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(invalid("server.port", "Port must be greater than 0"));
        }

        if self.data.store_key.trim().is_empty() {
            return Err(invalid("data.store_key", "Store key must not be empty"));
        }

        if self.pagination.page_size_options.iter().any(|&n| n == 0) {
            return Err(invalid(
                "pagination.page_size_options",
                "Page sizes must be greater than 0",
            ));
        }

        if !self.pagination.page_size_options.contains(&self.pagination.rows_per_page) {
            return Err(invalid(
                "pagination.rows_per_page",
                "Default page size must be one of page_size_options",
            ));
        }

        if self.toast.timeout_ms == 0 || self.toast.auth_timeout_ms == 0 {
            return Err(invalid("toast", "Toast timeouts must be greater than 0"));
        }

        if self.currency.decimal_places > 10 {
            return Err(invalid(
                "currency.decimal_places",
                "Decimal places must be between 0 and 10",
            ));
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
