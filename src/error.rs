use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while extracting a contract boundary
///
/// No partial [`ContractBoundary`](crate::ContractBoundary) is ever returned
/// alongside one of these.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Unsupported file type: {}", .0.display())]
    UnsupportedFileType(PathBuf),

    #[error("Failed to read {}: {message}", path.display())]
    Read { path: PathBuf, message: String },

    #[error("File {} is {size} bytes, exceeding the {max} byte limit", path.display())]
    FileTooLarge { path: PathBuf, size: u64, max: u64 },

    #[error("Failed to parse YAML: {0}")]
    MalformedManifest(String),

    #[error("Failed to parse Python file: line {line}: {message}")]
    Syntax { line: usize, message: String },
}

impl ExtractionError {
    /// True for errors caused by the file's content rather than the caller's request
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            ExtractionError::MalformedManifest(_) | ExtractionError::Syntax { .. }
        )
    }
}

impl From<serde_yaml::Error> for ExtractionError {
    fn from(err: serde_yaml::Error) -> Self {
        ExtractionError::MalformedManifest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = ExtractionError::NotFound(PathBuf::from("missing.yaml"));
        assert_eq!(err.to_string(), "File not found: missing.yaml");
    }

    #[test]
    fn test_syntax_message_includes_line() {
        let err = ExtractionError::Syntax {
            line: 4,
            message: "unexpected indent".to_string(),
        };
        assert!(err.to_string().contains("line 4"));
        assert!(err.is_malformed_input());
    }

    #[test]
    fn test_unsupported_type_is_not_malformed_input() {
        let err = ExtractionError::UnsupportedFileType(PathBuf::from("notes.txt"));
        assert!(!err.is_malformed_input());
    }

    #[test]
    fn test_from_yaml_error() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("key: [unclosed").unwrap_err();
        let err: ExtractionError = yaml_err.into();
        assert!(matches!(err, ExtractionError::MalformedManifest(_)));
    }
}
