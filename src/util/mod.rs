//! Utility modules
//!
//! - Structured logging setup driven by [`crate::ContractConfig`]

pub mod logging;

pub use logging::{init_logging, LoggingConfig};
