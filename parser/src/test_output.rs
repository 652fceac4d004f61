//! @ai:module:intent Parse the output of the benchmark's test commands
//! @ai:module:layer domain
//! @ai:module:public_api TestRunSummary, parse_test_run, parse_failing_count, failing_test_names, confirms_no_failures, parse_test_list
//! @ai:module:stateless true

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Marker line printed by the benchmark test runner.
pub const FAILING_TESTS_MARKER: &str = "Failing tests:";

/// Substring that confirms a run finished with no failing tests.
pub const NO_FAILURES: &str = "Failing tests: 0";

/// @ai:intent Failing count and failing test names of one full test run
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestRunSummary {
    pub failing_count: usize,
    pub failing_tests: Vec<String>,
}

impl TestRunSummary {
    /// @ai:intent Whether the run had no failing tests
    pub fn is_clean(&self) -> bool {
        self.failing_count == 0
    }
}

/// @ai:intent Whether a single-test run confirms zero failures
/// @ai:effects pure
pub fn confirms_no_failures(output: &str) -> bool {
    output.contains(NO_FAILURES)
}

/// @ai:intent Extract N from the first `Failing tests: N` occurrence
/// @ai:post None when no such line exists; counts beyond `usize::MAX` saturate
/// @ai:effects pure
pub fn parse_failing_count(output: &str) -> Option<usize> {
    let count = Regex::new(r"Failing tests:\s*(\d+)").expect("failing count regex is valid");

    count
        .captures(output)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().parse().unwrap_or(usize::MAX))
}

/// @ai:intent Collect the dash-prefixed test names listed after the `Failing tests:` marker
/// @ai:post blank lines inside the list are skipped; the first other line ends it
/// @ai:effects pure
pub fn failing_test_names(output: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut capturing = false;

    for line in output.lines() {
        if line.contains(FAILING_TESTS_MARKER) {
            capturing = true;
            continue;
        }

        if !capturing {
            continue;
        }

        let trimmed = line.trim();

        if trimmed.starts_with('-') {
            names.push(trimmed.trim_start_matches('-').trim().to_string());
        } else if trimmed.is_empty() {
            continue;
        } else {
            break;
        }
    }

    names
}

/// @ai:intent Parse a full test run into count and names
/// @ai:post None when the output has no parseable `Failing tests: N` line
/// @ai:effects pure
pub fn parse_test_run(output: &str) -> Option<TestRunSummary> {
    let failing_count = parse_failing_count(output)?;

    let failing_tests = if failing_count == 0 {
        Vec::new()
    } else {
        failing_test_names(output)
    };

    Some(TestRunSummary {
        failing_count,
        failing_tests,
    })
}

/// @ai:intent Parse a newline-delimited test export into trimmed, non-empty identifiers
/// @ai:effects pure
pub fn parse_test_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_failures() {
        let out = "Running ant (compile.tests)...OK\nFailing tests: 0\n";

        assert!(confirms_no_failures(out));
        assert_eq!(
            parse_test_run(out),
            Some(TestRunSummary {
                failing_count: 0,
                failing_tests: vec![]
            })
        );
    }

    #[test]
    fn test_oversized_count_saturates() {
        let out = "Failing tests: 99999999999999999999999\n  - a.B::c\n";

        let summary = parse_test_run(out).unwrap();
        assert_eq!(summary.failing_count, usize::MAX);
        assert_eq!(summary.failing_tests, vec!["a.B::c"]);
    }

    #[test]
    fn test_failing_names_after_marker() {
        let out = "Running ant (run.dev.tests)...OK\n\
                   Failing tests: 2\n  \
                   - com.foo.BarTest::m1\n\n  \
                   - com.foo.BarTest::m2\n\
                   Done.\n  \
                   - not.a.Test::ignored\n";

        let summary = parse_test_run(out).unwrap();
        assert_eq!(summary.failing_count, 2);
        assert_eq!(
            summary.failing_tests,
            vec!["com.foo.BarTest::m1", "com.foo.BarTest::m2"]
        );
        assert!(!confirms_no_failures(out));
    }

    #[test]
    fn test_missing_marker_is_unparseable() {
        assert_eq!(parse_failing_count("BUILD FAILED\n"), None);
        assert_eq!(parse_test_run("BUILD FAILED\n"), None);
    }

    #[test]
    fn test_count_without_space() {
        assert_eq!(parse_failing_count("Failing tests:7"), Some(7));
    }

    #[test]
    fn test_parse_test_list_trims_and_drops_blanks() {
        let out = "  org.apache.MathTest::testA  \n\n\torg.apache.MathTest::testB\n   \n";

        assert_eq!(
            parse_test_list(out),
            vec!["org.apache.MathTest::testA", "org.apache.MathTest::testB"]
        );
    }
}
