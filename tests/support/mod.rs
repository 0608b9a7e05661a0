use std::path::PathBuf;

/// Absolute path of a file under `tests/fixtures/<category>/`
pub fn fixture_path(category: &str, name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(category)
        .join(name)
}
