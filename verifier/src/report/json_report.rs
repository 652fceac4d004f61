//! @ai:module:intent JSON batch summary
//! @ai:module:layer infrastructure
//! @ai:module:public_api JsonReporter
//! @ai:module:stateless true

use crate::metrics::BatchSummary;
use anyhow::Result;
use std::path::Path;

/// @ai:intent Trait for JSON report generation
pub trait JsonReporterTrait: Send + Sync {
    /// @ai:intent Write the summary as JSON
    fn generate(&self, summary: &BatchSummary, output_path: &Path) -> Result<()>;
}

/// @ai:intent Writes the batch summary as pretty-printed JSON
pub struct JsonReporter;

impl JsonReporter {
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReporterTrait for JsonReporter {
    /// @ai:effects fs:write
    fn generate(&self, summary: &BatchSummary, output_path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(summary)?;
        std::fs::write(output_path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_summary;
    use tempfile::TempDir;

    #[test]
    fn test_generate_json_report() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("results.json");

        JsonReporter::new()
            .generate(&sample_summary(), &output)
            .unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert_eq!(value["project"], "Math");
        assert_eq!(value["records"][1]["status"], "Apply Failed");
        assert_eq!(value["records"][0]["outcome"]["kind"], "success");
        assert_eq!(value["stats"]["by_category"]["success"], 1);
    }
}
