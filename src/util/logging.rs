//! Subscriber setup for embedding applications
//!
//! The library itself only emits `tracing` events. Applications that want the
//! crate's own output call [`init_logging`] once with settings taken from a
//! [`ContractConfig`]; `RUST_LOG` directives still apply on top.
//!
//! ```no_run
//! use contract_boundary::{init_logging, ContractConfig, LoggingConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ContractConfig::from_env()?;
//! config.validate()?;
//! init_logging(LoggingConfig::from_contract_config(&config));
//! # Ok(())
//! # }
//! ```

use crate::config::ContractConfig;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Level applied to `contract_boundary` targets
    pub level: Level,
    pub json: bool,
}

impl LoggingConfig {
    /// An unparsable level falls back to INFO; [`ContractConfig::validate`] rejects those first
    pub fn from_contract_config(config: &ContractConfig) -> Self {
        Self {
            level: config.log_level.parse().unwrap_or(Level::INFO),
            json: config.log_json,
        }
    }

    fn directive(&self) -> String {
        format!("contract_boundary={}", self.level)
    }
}

/// Installs the global subscriber, writing to stderr; later calls are ignored
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = config.directive().parse() {
            filter = filter.add_directive(directive);
        }

        let registry = tracing_subscriber::registry().with(filter);
        if config.json {
            registry
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        } else {
            registry.with(fmt::layer().with_writer(std::io::stderr)).init();
        }
    });
}
