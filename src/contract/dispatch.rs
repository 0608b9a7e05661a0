//! Routes a path to the extractor for its file type

use crate::config::ContractConfig;
use crate::contract::{ContractBoundary, FileType};
use crate::error::ExtractionError;
use crate::extractors::{
    ContractExtractor, ManifestExtractor, PolicyExtractor, SectionExtractor, SourceExtractor,
};
use crate::fs::{FileSystem, RealFileSystem};
use std::path::Path;
use tracing::{debug, warn};

/// Reads artifacts through an injected [`FileSystem`] and extracts their contract boundary
pub struct BoundaryExtractor<F: FileSystem> {
    fs: F,
    config: ContractConfig,
}

impl<F: FileSystem> BoundaryExtractor<F> {
    pub fn new(fs: F) -> Self {
        Self::with_config(fs, ContractConfig::default())
    }

    pub fn with_config(fs: F, config: ContractConfig) -> Self {
        Self { fs, config }
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    /// Extracts the contract boundary of the file at `path`
    ///
    /// # Errors
    ///
    /// - `NotFound` if nothing exists at `path`
    /// - `UnsupportedFileType` if the suffix maps to no extractor
    /// - `FileTooLarge` / `Read` if the file cannot be loaded
    /// - `MalformedManifest` / `Syntax` if the content does not parse
    pub fn extract(&self, path: &Path) -> Result<ContractBoundary, ExtractionError> {
        if !self.fs.exists(path) {
            return Err(ExtractionError::NotFound(path.to_path_buf()));
        }

        let file_type = FileType::from_path(path);
        debug!(path = %path.display(), file_type = %file_type, "Dispatching contract extraction");

        let content = match file_type {
            FileType::Unknown => {
                return Err(ExtractionError::UnsupportedFileType(path.to_path_buf()))
            }
            _ => self.read(path)?,
        };

        let boundary = match file_type {
            FileType::Yaml => ManifestExtractor::new().extract_content(path, &content),
            FileType::Python => SourceExtractor::new().extract_content(path, &content),
            FileType::Rego => PolicyExtractor::new().extract_content(path, &content),
            FileType::Markdown => SectionExtractor::new(self.config.description_limit)
                .extract_content(path, &content),
            FileType::Unknown => Err(ExtractionError::UnsupportedFileType(path.to_path_buf())),
        }?;

        debug!(
            path = %path.display(),
            parameters = boundary.parameters.len(),
            metadata_keys = boundary.metadata.len(),
            "Contract boundary extracted"
        );

        Ok(boundary)
    }

    fn read(&self, path: &Path) -> Result<String, ExtractionError> {
        if !self.fs.is_file(path) {
            return Err(ExtractionError::Read {
                path: path.to_path_buf(),
                message: "Not a file".to_string(),
            });
        }

        let metadata = self.fs.metadata(path).map_err(|e| ExtractionError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if metadata.len() > self.config.max_file_size {
            warn!(
                path = %path.display(),
                size = metadata.len(),
                max = self.config.max_file_size,
                "Skipping oversized file"
            );
            return Err(ExtractionError::FileTooLarge {
                path: path.to_path_buf(),
                size: metadata.len(),
                max: self.config.max_file_size,
            });
        }

        self.fs.read_to_string(path).map_err(|e| {
            warn!(path = %path.display(), error = %e, "Failed to read file");
            ExtractionError::Read {
                path: path.to_path_buf(),
                message: format!("{:#}", e),
            }
        })
    }
}

/// Extracts from the local file system with default limits
pub fn extract_contract_boundary(
    path: impl AsRef<Path>,
) -> Result<ContractBoundary, ExtractionError> {
    BoundaryExtractor::new(RealFileSystem).extract(path.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use std::path::PathBuf;

    fn extractor_with(files: &[(&str, &str)]) -> BoundaryExtractor<MockFileSystem> {
        let fs = MockFileSystem::new();
        for (path, content) in files {
            fs.add_file(path, content);
        }
        BoundaryExtractor::new(fs)
    }

    #[test]
    fn test_dispatches_by_extension() {
        let extractor = extractor_with(&[
            ("xr.yml", "spec:\n  forProvider:\n    region: eu\n"),
            ("api.py", "def get(id: int): pass\n"),
            ("authz.rego", "allow { input.user }\n"),
            ("runbook.MD", "## Check\nok\n"),
        ]);

        let cases = [
            ("/mock/xr.yml", FileType::Yaml, "region"),
            ("/mock/api.py", FileType::Python, "get.id"),
            ("/mock/authz.rego", FileType::Rego, "allow"),
            ("/mock/runbook.MD", FileType::Markdown, "Check"),
        ];

        for (path, file_type, first) in cases {
            let boundary = extractor.extract(Path::new(path)).unwrap();
            assert_eq!(boundary.file_type, file_type);
            assert_eq!(boundary.file_path, path);
            assert_eq!(boundary.parameters[0].name, first);
        }
    }

    #[test]
    fn test_missing_file() {
        let extractor = extractor_with(&[]);
        let err = extractor.extract(Path::new("/mock/absent.yaml")).unwrap_err();

        assert!(matches!(err, ExtractionError::NotFound(ref p) if p == &PathBuf::from("/mock/absent.yaml")));
    }

    #[test]
    fn test_missing_file_checked_before_type() {
        let extractor = extractor_with(&[]);
        let err = extractor.extract(Path::new("/mock/notes.txt")).unwrap_err();
        assert!(matches!(err, ExtractionError::NotFound(_)));
    }

    #[test]
    fn test_unsupported_file_type() {
        let extractor = extractor_with(&[("notes.txt", "hello")]);
        let err = extractor.extract(Path::new("/mock/notes.txt")).unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedFileType(_)));
    }

    #[test]
    fn test_file_too_large() {
        let fs = MockFileSystem::new();
        fs.add_file("big.md", &"x".repeat(64));
        let config = ContractConfig {
            max_file_size: 16,
            ..Default::default()
        };
        let extractor = BoundaryExtractor::with_config(fs, config);

        let err = extractor.extract(Path::new("/mock/big.md")).unwrap_err();
        assert!(matches!(err, ExtractionError::FileTooLarge { size: 64, max: 16, .. }));
    }

    #[test]
    fn test_directory_is_read_error() {
        let fs = MockFileSystem::new();
        fs.add_dir("charts.yaml");
        let extractor = BoundaryExtractor::new(fs);

        let err = extractor.extract(Path::new("/mock/charts.yaml")).unwrap_err();
        assert!(matches!(err, ExtractionError::Read { ref message, .. } if message == "Not a file"));
    }

    #[test]
    fn test_description_limit_from_config() {
        let fs = MockFileSystem::new();
        fs.add_file("notes.md", "## Long\nabcdefghij\n");
        let config = ContractConfig {
            description_limit: 4,
            ..Default::default()
        };
        let extractor = BoundaryExtractor::with_config(fs, config);

        let boundary = extractor.extract(Path::new("/mock/notes.md")).unwrap();
        assert_eq!(boundary.parameters[0].description.as_deref(), Some("abcd"));
    }

    #[test]
    fn test_malformed_content_propagates() {
        let extractor = extractor_with(&[("bad.yaml", "- just\n- a list\n"), ("bad.py", "def f(:\n")]);

        assert!(matches!(
            extractor.extract(Path::new("/mock/bad.yaml")).unwrap_err(),
            ExtractionError::MalformedManifest(_)
        ));
        assert!(matches!(
            extractor.extract(Path::new("/mock/bad.py")).unwrap_err(),
            ExtractionError::Syntax { .. }
        ));
    }
}
