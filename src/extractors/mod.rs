// Format extractors
//
// Each extractor owns one input grammar and turns raw text into a
// ContractBoundary. They are stateless; file access stays in the dispatcher.

pub mod manifest;
pub mod policy;
pub mod sections;
pub mod source;

use crate::contract::{ContractBoundary, FileType};
use crate::error::ExtractionError;
use std::path::Path;

pub use manifest::ManifestExtractor;
pub use policy::PolicyExtractor;
pub use sections::SectionExtractor;
pub use source::SourceExtractor;

/// Turns the text of one artifact into its contract boundary
pub trait ContractExtractor: Send + Sync {
    /// The file type this extractor produces
    fn file_type(&self) -> FileType;

    /// Extract from already-read content; `path` is only recorded in the result
    fn extract_content(
        &self,
        path: &Path,
        content: &str,
    ) -> Result<ContractBoundary, ExtractionError>;
}
