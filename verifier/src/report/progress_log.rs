//! @ai:module:intent Append-only timestamped progress log for a batch
//! @ai:module:layer infrastructure
//! @ai:module:public_api ProgressLog, LOG_TAG
//! @ai:module:stateless false

use chrono::{SecondsFormat, Utc};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Prefix tag written on every line.
pub const LOG_TAG: &str = "[BatchVerifier]";

/// @ai:intent Writes `<RFC3339> [BatchVerifier] <message>` lines and mirrors them to tracing
#[derive(Debug)]
pub struct ProgressLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ProgressLog {
    /// @ai:intent Log appending to `path`; the file is created on first write
    /// @ai:effects pure
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// @ai:intent Record a progress message
    /// @ai:effects fs:write
    pub fn info(&self, message: &str) {
        tracing::info!("{} {}", LOG_TAG, message);
        self.append(message);
    }

    /// @ai:intent Record an error message
    /// @ai:effects fs:write
    pub fn error(&self, message: &str) {
        tracing::error!("{} {}", LOG_TAG, message);
        self.append(message);
    }

    /// @ai:intent Append one line; write failures are reported, never raised
    /// @ai:effects fs:write
    fn append(&self, message: &str) {
        let _guard = self.lock.lock();
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| writeln!(file, "{} {} {}", timestamp, LOG_TAG, message));

        if let Err(e) = result {
            tracing::warn!("Failed to write progress log {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lines_are_appended_with_tag() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("batch_verify.log");
        std::fs::write(&path, "earlier run\n").unwrap();

        let log = ProgressLog::new(&path);
        log.info("Identifying triggering tests...");
        log.error("Error verifying Patch_3: boom");

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "earlier run");
        assert!(lines[1].ends_with("[BatchVerifier] Identifying triggering tests..."));
        assert!(lines[2].ends_with("[BatchVerifier] Error verifying Patch_3: boom"));

        let timestamp = lines[1].split(' ').next().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }

    #[test]
    fn test_unwritable_path_does_not_panic() {
        let temp = TempDir::new().unwrap();
        let log = ProgressLog::new(temp.path().join("missing").join("log.txt"));

        log.info("still fine");
    }
}
