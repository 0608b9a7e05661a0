//! contract-boundary - contract extraction for infrastructure artifacts
//!
//! This library reduces heterogeneous artifact files to their externally
//! observable shape: the parameters, schemas and signatures a consumer depends
//! on. Implementation detail (function bodies, rule logic, narrative prose) is
//! discarded. A companion validator checks MDX documentation against a
//! component whitelist and naming/frontmatter conventions.
//!
//! # Core Concepts
//!
//! - **Contract Boundary**: A normalized list of [`Parameter`]s plus
//!   extractor-specific metadata, produced once per file
//! - **File Type**: Derived from the filename suffix; one extractor per type
//!   (YAML manifests, Python modules, Rego policies, Markdown runbooks)
//! - **File System**: All reads go through the injected [`FileSystem`] trait
//!
//! # Example Usage
//!
//! ```no_run
//! use contract_boundary::{extract_contract_boundary, validate_docs};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let boundary = extract_contract_boundary("composition.yaml")?;
//! for param in &boundary.parameters {
//!     println!("{} ({:?})", param.name, param.param_type);
//! }
//!
//! let result = validate_docs("docs/api-spec.mdx");
//! if !result.valid {
//!     for error in &result.errors {
//!         println!("{}", error);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`contract`]: Data model and file-type dispatch
//! - [`extractors`]: One extractor per supported format
//! - [`validation`]: MDX documentation rules
//! - [`fs`]: File system abstraction with real and in-memory backends

pub mod config;
pub mod contract;
pub mod error;
pub mod extractors;
pub mod fs;
pub mod util;
pub mod validation;

pub use config::{ConfigError, ContractConfig};
pub use contract::{
    extract_contract_boundary, BoundaryExtractor, ContractBoundary, FileType, Metadata, Parameter,
};
pub use error::ExtractionError;
pub use extractors::ContractExtractor;
pub use fs::{FileSystem, MockFileSystem, RealFileSystem};
pub use util::{init_logging, LoggingConfig};
pub use validation::{
    validate_docs, DocRule, DocValidator, Severity, ValidationError, ValidationResult,
    ValidatorConfig,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
