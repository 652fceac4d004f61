//! @ai:module:intent Persisted and printed batch results
//! @ai:module:layer infrastructure
//! @ai:module:public_api ReportGenerator, ResultsWriter, ProgressLog, JsonReporter, MarkdownReporter

pub mod csv_report;
pub mod json_report;
pub mod markdown_report;
pub mod progress_log;
pub mod table;

pub use csv_report::{csv_field, ResultsWriter, CSV_HEADER};
pub use json_report::{JsonReporter, JsonReporterTrait};
pub use markdown_report::{MarkdownReporter, MarkdownReporterTrait};
pub use progress_log::{ProgressLog, LOG_TAG};

use crate::metrics::BatchSummary;
use anyhow::Result;
use std::path::Path;

/// @ai:intent Combined summary generator
pub struct ReportGenerator {
    json: JsonReporter,
    markdown: MarkdownReporter,
}

impl ReportGenerator {
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            json: JsonReporter::new(),
            markdown: MarkdownReporter::new(),
        }
    }

    /// @ai:intent Write results.json and results.md into `output_dir`
    /// @ai:effects fs:write
    pub fn generate_all(&self, summary: &BatchSummary, output_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(output_dir)?;

        self.json.generate(summary, &output_dir.join("results.json"))?;
        self.markdown
            .generate(summary, &output_dir.join("results.md"))?;

        tracing::info!("Reports generated in {}", output_dir.display());
        Ok(())
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::metrics::{MetricsAggregator, MetricsAggregatorTrait, VerificationRecord};
    use crate::pipeline::Stage;
    use chrono::{TimeZone, Utc};
    use patchverify_parser::VerificationOutcome;
    use std::path::PathBuf;
    use tempfile::TempDir;

    pub(crate) fn sample_summary() -> BatchSummary {
        let records = vec![
            VerificationRecord {
                patch: "Patch_1".to_string(),
                status: "Success".to_string(),
                outcome: VerificationOutcome::Success,
                stage: Some(Stage::Classified),
                applied_strip: Some(6),
                duration_ms: 61_000,
            },
            VerificationRecord {
                patch: "Patch_2".to_string(),
                status: "Apply Failed".to_string(),
                outcome: VerificationOutcome::ApplyFailed,
                stage: Some(Stage::Reset),
                applied_strip: None,
                duration_ms: 2_500,
            },
        ];

        BatchSummary {
            project: "Math".to_string(),
            version: "1b".to_string(),
            started_at: Utc.with_ymd_and_hms(2026, 1, 19, 10, 0, 0).unwrap(),
            finished_at: Utc.with_ymd_and_hms(2026, 1, 19, 10, 5, 0).unwrap(),
            patches_dir: PathBuf::from("/data/patches"),
            project_dir: PathBuf::from("/data/Math_1b"),
            results_file: PathBuf::from("patch_verification_results.csv"),
            triggering_tests: vec!["org.apache.commons.math.FooTest::testBar".to_string()],
            stats: MetricsAggregator::new().aggregate(&records),
            records,
        }
    }

    #[test]
    fn test_generate_all_writes_both_files() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("reports");

        ReportGenerator::new()
            .generate_all(&sample_summary(), &dir)
            .unwrap();

        assert!(dir.join("results.json").exists());
        assert!(dir.join("results.md").exists());
    }
}
