//! @ai:module:intent Classify the text output of the `patch` tool into a structured result
//! @ai:module:layer domain
//! @ai:module:public_api ApplyOutcome, classify_apply_output, is_clean_apply
//! @ai:module:stateless true

use regex::Regex;
use serde::{Deserialize, Serialize};

/// @ai:intent Structured result of one patch-application attempt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApplyOutcome {
    Applied,
    Rejected { hunks: Vec<String> },
    FileNotFound { paths: Vec<String> },
    Failed { reason: String },
}

impl ApplyOutcome {
    /// @ai:intent Whether the attempt left the patch fully applied
    /// @ai:effects pure
    pub fn is_applied(&self) -> bool {
        matches!(self, ApplyOutcome::Applied)
    }

    /// @ai:intent Short human-readable description
    /// @ai:effects pure
    pub fn describe(&self) -> String {
        match self {
            ApplyOutcome::Applied => "applied".to_string(),
            ApplyOutcome::Rejected { hunks } => format!("{} hunk(s) rejected", hunks.len()),
            ApplyOutcome::FileNotFound { paths } if paths.is_empty() => {
                "target file not found".to_string()
            }
            ApplyOutcome::FileNotFound { paths } => {
                format!("target file not found: {}", paths.join(", "))
            }
            ApplyOutcome::Failed { reason } => format!("failed: {reason}"),
        }
    }
}

/// @ai:intent Substring test for a clean application of a patch
/// @ai:post false if output contains "reject", or "fail"/"can't find file" in any case
/// @ai:effects pure
pub fn is_clean_apply(output: &str) -> bool {
    let lower = output.to_lowercase();

    !output.contains("reject") && !lower.contains("fail") && !lower.contains("can't find file")
}

/// @ai:intent Classify patch tool output; success iff the substring test passes
/// @ai:post classify_apply_output(o).is_applied() == is_clean_apply(o)
/// @ai:effects pure
pub fn classify_apply_output(output: &str) -> ApplyOutcome {
    if is_clean_apply(output) {
        return ApplyOutcome::Applied;
    }

    let lower = output.to_lowercase();

    if lower.contains("can't find file") {
        return ApplyOutcome::FileNotFound {
            paths: missing_paths(output),
        };
    }

    let hunks = failed_hunks(output);

    if !hunks.is_empty() {
        return ApplyOutcome::Rejected { hunks };
    }

    let reason = output
        .lines()
        .map(str::trim)
        .find(|l| {
            let l = l.to_lowercase();
            l.contains("fail") || l.contains("reject")
        })
        .unwrap_or("patch reported an error")
        .to_string();

    ApplyOutcome::Failed { reason }
}

/// Lines like `Hunk #2 FAILED at 120.`
fn failed_hunks(output: &str) -> Vec<String> {
    let hunk = Regex::new(r"(?i)hunk #(\d+) failed at (\d+)").expect("hunk regex is valid");

    hunk.captures_iter(output)
        .map(|c| format!("#{} at line {}", &c[1], &c[2]))
        .collect()
}

/// GNU patch prints `|--- path` / `|+++ path` context before "can't find file to patch".
fn missing_paths(output: &str) -> Vec<String> {
    let header = Regex::new(r"(?m)^\|\+\+\+ (\S+)").expect("header regex is valid");

    header
        .captures_iter(output)
        .map(|c| c[1].to_string())
        .collect()
}
