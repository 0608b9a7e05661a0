//! FileSystem abstraction for testable file reads
//!
//! Extractors and the documentation validator never touch `std::fs` directly;
//! they go through [`FileSystem`] so tests can run against [`MockFileSystem`].

mod mock;
mod real;
mod r#trait;

pub use mock::MockFileSystem;
pub use r#trait::{EntryKind, FileMetadata, FileSystem};
pub use real::RealFileSystem;
