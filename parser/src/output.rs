//! @ai:module:intent Format parser results for the CLI (text, JSON)
//! @ai:module:layer infrastructure
//! @ai:module:public_api OutputFormat, format_diff, format_apply_outcome, format_test_run, to_json
//! @ai:module:depends_on diff, apply, outcome
//! @ai:module:stateless true

use crate::apply::ApplyOutcome;
use crate::diff::UnifiedDiff;
use crate::outcome::VerificationOutcome;
use colored::Colorize;
use serde::Serialize;

/// @ai:intent Output format options
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
}

#[derive(Serialize)]
struct DiffView<'a> {
    diff: &'a UnifiedDiff,
    strip_levels: &'a [usize],
    absolute_paths: bool,
}

impl<'a> DiffView<'a> {
    fn new(diff: &'a UnifiedDiff, strip_levels: &'a [usize]) -> Self {
        Self {
            diff,
            strip_levels,
            absolute_paths: diff.has_absolute_paths(),
        }
    }
}

/// @ai:intent Format a parsed diff together with the strip levels that would be tried
/// @ai:effects pure
pub fn format_diff(diff: &UnifiedDiff, strip_levels: &[usize], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(&DiffView::new(diff, strip_levels), false),
        OutputFormat::JsonPretty => to_json(&DiffView::new(diff, strip_levels), true),
        OutputFormat::Text => format_diff_text(diff, strip_levels),
    }
}

/// @ai:intent Format a parsed diff as human-readable text
/// @ai:effects pure
fn format_diff_text(diff: &UnifiedDiff, strip_levels: &[usize]) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} file(s), {} hunk(s)\n",
        diff.files.len().to_string().bold(),
        diff.hunk_count()
    ));

    if diff.has_absolute_paths() {
        output.push_str(&format!(
            "  {}\n",
            "absolute paths: strip with the project directory depth".yellow()
        ));
    }

    for file in &diff.files {
        output.push_str(&format!(
            "  {} ({} {})\n",
            file.target().cyan(),
            format!("+{}", file.added).green(),
            format!("-{}", file.removed).red()
        ));

        for level in strip_levels {
            let stripped = file
                .target_at(*level)
                .unwrap_or_else(|| "<too few components>".to_string());
            output.push_str(&format!("      -p{level}: {}\n", stripped.dimmed()));
        }
    }

    output
}

/// @ai:intent Format the classification of a patch tool log
/// @ai:effects pure
pub fn format_apply_outcome(outcome: &ApplyOutcome, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(outcome, false),
        OutputFormat::JsonPretty => to_json(outcome, true),
        OutputFormat::Text => {
            let label = if outcome.is_applied() {
                "APPLIED".green().bold()
            } else {
                "NOT APPLIED".red().bold()
            };
            let mut output = format!("{} {}\n", label, outcome.describe());

            if let ApplyOutcome::Rejected { hunks } = outcome {
                for hunk in hunks {
                    output.push_str(&format!("  hunk {hunk}\n"));
                }
            }

            output
        }
    }
}

/// @ai:intent Format the classification of a full test run
/// @ai:effects pure
pub fn format_test_run(outcome: &VerificationOutcome, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(outcome, false),
        OutputFormat::JsonPretty => to_json(outcome, true),
        OutputFormat::Text => {
            let status = outcome.to_string();

            if outcome.is_success() {
                format!("{}\n", status.green().bold())
            } else {
                format!("{}\n", status.red().bold())
            }
        }
    }
}

/// @ai:intent Format any serializable value as JSON
/// @ai:effects pure
pub fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> String {
    if pretty {
        serde_json::to_string_pretty(value).unwrap_or_default()
    } else {
        serde_json::to_string(value).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::parse_diff;

    #[test]
    fn test_diff_json_includes_levels() {
        colored::control::set_override(false);
        let diff = parse_diff("--- a/x.txt\n+++ b/x.txt\n@@ -1 +1 @@\n-a\n+b\n").unwrap();
        let json = format_diff(&diff, &[3, 0, 1], OutputFormat::Json);

        assert!(json.contains("\"strip_levels\":[3,0,1]"));
        assert!(json.contains("\"new_path\":\"b/x.txt\""));
        assert!(json.contains("\"absolute_paths\":false"));
    }

    #[test]
    fn test_diff_text_notes_absolute_paths() {
        colored::control::set_override(false);
        let diff = parse_diff(
            "--- /data/proj/src/A.java\n+++ /data/proj/src/A.java\n@@ -1 +1 @@\n-a\n+b\n",
        )
        .unwrap();

        let text = format_diff(&diff, &[3], OutputFormat::Text);
        assert!(text.contains("absolute paths"));
        assert!(text.contains("-p3: src/A.java"));

        let json = format_diff(&diff, &[3], OutputFormat::Json);
        assert!(json.contains("\"absolute_paths\":true"));
    }

    #[test]
    fn test_diff_text_shows_stripped_paths() {
        colored::control::set_override(false);
        let diff = parse_diff("--- a/x.txt\n+++ b/x.txt\n@@ -1 +1 @@\n-a\n+b\n").unwrap();
        let text = format_diff(&diff, &[1, 4], OutputFormat::Text);

        assert!(text.contains("-p1: x.txt"));
        assert!(text.contains("-p4: <too few components>"));
    }

    #[test]
    fn test_apply_outcome_json_is_tagged() {
        let json = to_json(&ApplyOutcome::Applied, false);
        assert_eq!(json, r#"{"kind":"applied"}"#);
    }
}
