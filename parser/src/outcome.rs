//! @ai:module:intent Terminal classification of a single patch verification
//! @ai:module:layer domain
//! @ai:module:public_api VerificationOutcome, MAX_FAILING_SAMPLE
//! @ai:module:depends_on test_output
//! @ai:module:stateless true

use crate::test_output::TestRunSummary;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Failing test names kept in a `Failed (...)` status.
pub const MAX_FAILING_SAMPLE: usize = 3;

/// @ai:intent Closed set of verification outcomes; Display yields the persisted status string
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VerificationOutcome {
    Success,
    ApplyFailed,
    CompileFailed,
    /// The named triggering test still fails after the patch.
    TriggeringFailed { test: String },
    TestExecutionFailed,
    TestsFailed {
        count: usize,
        sample: Vec<String>,
        truncated: bool,
    },
    NoDiffFound,
    Error { message: String },
}

impl VerificationOutcome {
    /// @ai:intent Build the outcome of a full regression run
    /// @ai:post None summary -> TestExecutionFailed; zero count -> Success
    /// @ai:effects pure
    pub fn from_test_run(summary: Option<TestRunSummary>) -> Self {
        match summary {
            None => VerificationOutcome::TestExecutionFailed,
            Some(s) if s.is_clean() => VerificationOutcome::Success,
            Some(s) => {
                let truncated = s.failing_tests.len() > MAX_FAILING_SAMPLE;
                let sample = s
                    .failing_tests
                    .into_iter()
                    .take(MAX_FAILING_SAMPLE)
                    .collect();

                VerificationOutcome::TestsFailed {
                    count: s.failing_count,
                    sample,
                    truncated,
                }
            }
        }
    }

    /// @ai:intent Wrap an unexpected orchestration error
    pub fn error(message: impl fmt::Display) -> Self {
        VerificationOutcome::Error {
            message: message.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, VerificationOutcome::Success)
    }

    /// @ai:intent Stable key used to group outcomes in summaries
    /// @ai:effects pure
    pub fn category(&self) -> &'static str {
        match self {
            VerificationOutcome::Success => "success",
            VerificationOutcome::ApplyFailed => "apply_failed",
            VerificationOutcome::CompileFailed => "compile_failed",
            VerificationOutcome::TriggeringFailed { .. } => "triggering_failed",
            VerificationOutcome::TestExecutionFailed => "test_execution_failed",
            VerificationOutcome::TestsFailed { .. } => "tests_failed",
            VerificationOutcome::NoDiffFound => "no_diff_found",
            VerificationOutcome::Error { .. } => "error",
        }
    }
}

impl fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationOutcome::Success => write!(f, "Success"),
            VerificationOutcome::ApplyFailed => write!(f, "Apply Failed"),
            VerificationOutcome::CompileFailed => write!(f, "Compile Failed"),
            VerificationOutcome::TriggeringFailed { .. } => write!(f, "Failed (Triggering)"),
            VerificationOutcome::TestExecutionFailed => write!(f, "Test Execution Failed"),
            VerificationOutcome::TestsFailed {
                count,
                sample,
                truncated,
            } => {
                let marker = if *truncated { "..." } else { "" };
                write!(f, "Failed ({count} tests: {}{marker})", sample.join(", "))
            }
            VerificationOutcome::NoDiffFound => write!(f, "No diff file found"),
            VerificationOutcome::Error { message } => write!(f, "Error: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(count: usize, names: &[&str]) -> Option<TestRunSummary> {
        Some(TestRunSummary {
            failing_count: count,
            failing_tests: names.iter().map(|n| n.to_string()).collect(),
        })
    }

    #[test]
    fn test_fixed_strings() {
        assert_eq!(VerificationOutcome::Success.to_string(), "Success");
        assert_eq!(VerificationOutcome::ApplyFailed.to_string(), "Apply Failed");
        assert_eq!(VerificationOutcome::CompileFailed.to_string(), "Compile Failed");
        assert_eq!(
            VerificationOutcome::TriggeringFailed {
                test: "a.B::c".to_string()
            }
            .to_string(),
            "Failed (Triggering)"
        );
        assert_eq!(
            VerificationOutcome::TestExecutionFailed.to_string(),
            "Test Execution Failed"
        );
        assert_eq!(VerificationOutcome::NoDiffFound.to_string(), "No diff file found");
        assert_eq!(VerificationOutcome::error("boom").to_string(), "Error: boom");
    }

    #[test]
    fn test_two_failures_listed() {
        let outcome = VerificationOutcome::from_test_run(summary(
            2,
            &["com.foo.BarTest::m1", "com.foo.BarTest::m2"],
        ));

        assert_eq!(
            outcome.to_string(),
            "Failed (2 tests: com.foo.BarTest::m1, com.foo.BarTest::m2)"
        );
    }

    #[test]
    fn test_five_failures_truncated_to_three() {
        let outcome = VerificationOutcome::from_test_run(summary(5, &["a", "b", "c", "d", "e"]));

        assert_eq!(outcome.to_string(), "Failed (5 tests: a, b, c...)");
        assert_eq!(outcome.category(), "tests_failed");
    }

    #[test]
    fn test_zero_and_missing() {
        assert!(VerificationOutcome::from_test_run(summary(0, &[])).is_success());
        assert_eq!(
            VerificationOutcome::from_test_run(None),
            VerificationOutcome::TestExecutionFailed
        );
    }
}
