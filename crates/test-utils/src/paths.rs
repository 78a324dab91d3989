//! Path helpers for tests that touch the filesystem.

use std::path::PathBuf;

/// Creates a temporary directory that is removed when dropped.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("grid_engine_")
        .tempdir()
        .expect("Failed to create temporary test directory")
}

/// Path of a file inside `dir`, for GSLIB outputs in tests.
pub fn gslib_path(dir: &tempfile::TempDir, stem: &str) -> PathBuf {
    dir.path().join(format!("{stem}.out"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gslib_path() {
        let dir = temp_test_dir();
        let path = gslib_path(&dir, "porosity");
        assert!(path.starts_with(dir.path()));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("out"));
    }
}
