//! Contract boundary data model and file-type dispatch

pub mod dispatch;
pub mod types;

pub use dispatch::{extract_contract_boundary, BoundaryExtractor};
pub use types::{ContractBoundary, FileType, Metadata, Parameter};
