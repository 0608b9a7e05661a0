//! Configuration for contract extraction
//!
//! Defaults are compiled in; [`ContractConfig::from_env`] overlays values from
//! the environment.
//!
//! # Environment Variables
//!
//! - `CONTRACT_MAX_FILE_SIZE`: Largest file (bytes) an extractor will read - default: "1048576" (1MB)
//! - `CONTRACT_DESCRIPTION_LIMIT`: Characters kept from a section body - default: "200"
//! - `CONTRACT_LOG_LEVEL`: Logging level - default: "info"
//! - `CONTRACT_LOG_JSON`: Emit JSON log lines (true/false) - default: "false"
//!
//! # Example
//!
//! ```no_run
//! use contract_boundary::ContractConfig;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ContractConfig::from_env()?;
//! config.validate()?;
//! # Ok(())
//! # }
//! ```

use std::env;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_048_576;
pub const DEFAULT_DESCRIPTION_LIMIT: usize = 200;
const DEFAULT_LOG_LEVEL: &str = "info";

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Failed to parse configuration value
    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

/// Settings shared by the dispatcher and the format extractors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractConfig {
    /// Files larger than this many bytes are rejected before reading
    pub max_file_size: u64,

    /// Section descriptions are truncated to this many characters
    pub description_limit: usize,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Emit JSON log lines instead of pretty console output
    pub log_json: bool,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            description_limit: DEFAULT_DESCRIPTION_LIMIT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_json: false,
        }
    }
}

impl ContractConfig {
    /// Loads configuration from `CONTRACT_*` environment variables over the defaults
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` if a numeric or boolean variable does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let max_file_size =
            parse_env_var("CONTRACT_MAX_FILE_SIZE")?.unwrap_or(defaults.max_file_size);
        let description_limit =
            parse_env_var("CONTRACT_DESCRIPTION_LIMIT")?.unwrap_or(defaults.description_limit);
        let log_level = env::var("CONTRACT_LOG_LEVEL")
            .map(|v| v.to_lowercase())
            .unwrap_or(defaults.log_level);
        let log_json = parse_env_var("CONTRACT_LOG_JSON")?.unwrap_or(defaults.log_json);

        Ok(Self {
            max_file_size,
            description_limit,
            log_level,
            log_json,
        })
    }

    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any limit is zero or the log level is unknown
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_file_size == 0 {
            return Err(ConfigError::ValidationFailed(
                "Max file size must be at least 1 byte".to_string(),
            ));
        }

        if self.description_limit == 0 {
            return Err(ConfigError::ValidationFailed(
                "Description limit must be at least 1 character".to_string(),
            ));
        }

        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}. Valid options: {}",
                self.log_level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }
}

fn parse_env_var<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::ParseError {
                field: key.to_string(),
                error: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

impl fmt::Display for ContractConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Contract Extraction Configuration:")?;
        writeln!(f, "  Max File Size: {} bytes", self.max_file_size)?;
        writeln!(f, "  Description Limit: {} chars", self.description_limit)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(f, "  JSON Logs: {}", self.log_json)?;
        Ok(())
    }
}
