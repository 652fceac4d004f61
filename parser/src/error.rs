//! @ai:module:intent Define error types for the patch-verification parsers
//! @ai:module:layer domain
//! @ai:module:public_api Error, Result
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Unified error type for all parser operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid diff at line {line}: {message}")]
    InvalidDiff { line: usize, message: String },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// @ai:intent Read a whole text file, attaching the path to any failure
/// @ai:effects fs:read
pub fn read_text(path: &std::path::Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_text_reports_path() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("absent.diff");

        let err = read_text(&missing).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
        assert!(err.to_string().contains("absent.diff"));
    }

    #[test]
    fn test_read_text_returns_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("diff");
        std::fs::write(&path, "--- a/x\n").unwrap();

        assert_eq!(read_text(&path).unwrap(), "--- a/x\n");
    }
}
