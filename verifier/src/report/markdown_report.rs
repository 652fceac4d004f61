//! @ai:module:intent Markdown batch summary
//! @ai:module:layer infrastructure
//! @ai:module:public_api MarkdownReporter
//! @ai:module:stateless true

use crate::metrics::BatchSummary;
use anyhow::Result;
use std::fmt::Write as FmtWrite;
use std::path::Path;

/// @ai:intent Trait for Markdown report generation
pub trait MarkdownReporterTrait: Send + Sync {
    /// @ai:intent Write the summary as Markdown
    fn generate(&self, summary: &BatchSummary, output_path: &Path) -> Result<()>;
}

/// @ai:intent Renders the batch summary as a Markdown document
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// Pipes would split a table cell.
    fn cell(value: &str) -> String {
        value.replace('|', "\\|")
    }

    /// @ai:intent Title block with run identity and timing
    /// @ai:effects pure
    fn generate_header(summary: &BatchSummary) -> String {
        let mut output = String::new();

        writeln!(output, "# Patch Verification Results").unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "**Benchmark:** {} {}",
            summary.project, summary.version
        )
        .unwrap();
        writeln!(output, "**Started:** {}", summary.started_at.to_rfc3339()).unwrap();
        writeln!(output, "**Finished:** {}", summary.finished_at.to_rfc3339()).unwrap();
        writeln!(output, "**Patches:** `{}`", summary.patches_dir.display()).unwrap();
        writeln!(output, "**Project:** `{}`", summary.project_dir.display()).unwrap();
        writeln!(output).unwrap();

        output
    }

    /// @ai:intent Outcome counts table
    /// @ai:effects pure
    fn generate_outcome_section(summary: &BatchSummary) -> String {
        let mut output = String::new();
        let stats = &summary.stats;

        writeln!(output, "## Outcomes").unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "{} patch(es), {} succeeded ({:.1}%), {:.1}s total.",
            stats.total,
            stats.success,
            stats.success_rate,
            stats.total_duration_ms as f64 / 1000.0
        )
        .unwrap();
        writeln!(output).unwrap();
        writeln!(output, "| Outcome | Count |").unwrap();
        writeln!(output, "|---------|-------|").unwrap();

        for (category, count) in &stats.by_category {
            writeln!(output, "| {} | {} |", category, count).unwrap();
        }

        writeln!(output).unwrap();
        output
    }

    /// @ai:intent Triggering tests used for fast validation
    /// @ai:effects pure
    fn generate_trigger_section(summary: &BatchSummary) -> String {
        let mut output = String::new();

        writeln!(output, "## Triggering Tests").unwrap();
        writeln!(output).unwrap();

        if summary.triggering_tests.is_empty() {
            writeln!(output, "_None discovered; fast validation was skipped._").unwrap();
        }

        for test in &summary.triggering_tests {
            writeln!(output, "- `{}`", test).unwrap();
        }

        writeln!(output).unwrap();
        output
    }

    /// @ai:intent Per-patch table
    /// @ai:effects pure
    fn generate_patch_section(summary: &BatchSummary) -> String {
        let mut output = String::new();

        writeln!(output, "## Patches").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "| Patch | Status | Stage | Strip | Time (s) |").unwrap();
        writeln!(output, "|-------|--------|-------|-------|----------|").unwrap();

        for record in &summary.records {
            let stage = record
                .stage
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string());
            let strip = record
                .applied_strip
                .map(|s| format!("-p{s}"))
                .unwrap_or_else(|| "-".to_string());

            writeln!(
                output,
                "| {} | {} | {} | {} | {:.1} |",
                Self::cell(&record.patch),
                Self::cell(&record.status),
                stage,
                strip,
                record.duration_ms as f64 / 1000.0
            )
            .unwrap();
        }

        writeln!(output).unwrap();
        output
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownReporterTrait for MarkdownReporter {
    /// @ai:effects fs:write
    fn generate(&self, summary: &BatchSummary, output_path: &Path) -> Result<()> {
        let mut content = String::new();

        content.push_str(&Self::generate_header(summary));
        content.push_str(&Self::generate_outcome_section(summary));
        content.push_str(&Self::generate_trigger_section(summary));
        content.push_str(&Self::generate_patch_section(summary));

        std::fs::write(output_path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_summary;
    use tempfile::TempDir;

    #[test]
    fn test_generate_markdown_report() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("results.md");

        MarkdownReporter::new()
            .generate(&sample_summary(), &output)
            .unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.contains("# Patch Verification Results"));
        assert!(content.contains("**Benchmark:** Math 1b"));
        assert!(content.contains("| Patch_1 | Success | classified | -p6 |"));
        assert!(content.contains("| Patch_2 | Apply Failed | reset | - |"));
        assert!(content.contains("- `org.apache.commons.math.FooTest::testBar`"));
    }
}
