//! MDX documentation validation
//!
//! Independent of contract extraction. Checks filename conventions, the
//! frontmatter block, the component whitelist and tag balance, and always
//! returns a [`ValidationResult`].

pub mod config;
pub mod rules;
pub mod tags;
pub mod types;
pub mod validator;

pub use config::{ComponentSpec, ValidatorConfig};
pub use rules::{
    ComponentWhitelistRule, DocRule, Document, FilenameRule, FrontmatterRule, TagBalanceRule,
};
pub use types::{Severity, ValidationError, ValidationResult};
pub use validator::{validate_docs, DocValidator};
