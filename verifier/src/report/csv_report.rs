//! @ai:module:intent Incrementally written `Patch,Status` results file
//! @ai:module:layer infrastructure
//! @ai:module:public_api ResultsWriter, csv_field, CSV_HEADER
//! @ai:module:stateless false

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const CSV_HEADER: &str = "Patch,Status";

/// @ai:intent Quote a field when it contains a comma, quote or line break
/// @ai:effects pure
pub fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// @ai:intent Results file created fresh per batch; every row is flushed on append
#[derive(Debug)]
pub struct ResultsWriter {
    path: PathBuf,
}

impl ResultsWriter {
    /// @ai:intent Truncate or create the file and write the header
    /// @ai:effects fs:write
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create results file {}", path.display()))?;
        writeln!(file, "{}", CSV_HEADER)?;
        file.flush()?;

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// @ai:intent Append one row and flush it before returning
    /// @ai:effects fs:write
    pub fn append(&self, patch: &str, status: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open results file {}", self.path.display()))?;

        writeln!(file, "{},{}", csv_field(patch), csv_field(status))?;
        file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("Success"), "Success");
        assert_eq!(
            csv_field("Failed (2 tests: a::b, c::d)"),
            "\"Failed (2 tests: a::b, c::d)\""
        );
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_create_truncates_and_appends() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("results.csv");
        std::fs::write(&path, "stale contents\n").unwrap();

        let writer = ResultsWriter::create(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Patch,Status\n");

        writer.append("Patch_1", "Success").unwrap();
        writer.append("Patch_2", "Failed (2 tests: a, b)").unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Patch,Status\nPatch_1,Success\nPatch_2,\"Failed (2 tests: a, b)\"\n"
        );
    }
}
