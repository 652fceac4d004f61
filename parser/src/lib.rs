//! @ai:module:intent Parsers for patch verification: diffs, patch tool logs, test runner output
//! @ai:module:layer infrastructure
//! @ai:module:public_api apply, diff, error, outcome, output, test_output
//! @ai:module:stateless true
//!
//! # patchverify parser
//!
//! Pure text analysis used by the batch verifier. Nothing here spawns
//! processes; callers hand in captured tool output and get structured
//! results back.
//!
//! ## Example
//!
//! ```rust
//! use patchverify_parser::{test_output, VerificationOutcome};
//!
//! let log = "Failing tests: 2\n  - com.foo.BarTest::m1\n  - com.foo.BarTest::m2\n";
//! let outcome = VerificationOutcome::from_test_run(test_output::parse_test_run(log));
//! assert_eq!(
//!     outcome.to_string(),
//!     "Failed (2 tests: com.foo.BarTest::m1, com.foo.BarTest::m2)"
//! );
//! ```

pub mod apply;
pub mod diff;
pub mod error;
pub mod outcome;
pub mod output;
pub mod test_output;

pub use apply::{classify_apply_output, is_clean_apply, ApplyOutcome};
pub use diff::{
    candidate_strip_levels, parse_diff, project_strip_level, strip_path, FilePatch, UnifiedDiff,
};
pub use error::{read_text, Error, Result};
pub use outcome::{VerificationOutcome, MAX_FAILING_SAMPLE};
pub use output::{format_apply_outcome, format_diff, format_test_run, to_json, OutputFormat};
pub use test_output::{
    confirms_no_failures, failing_test_names, parse_failing_count, parse_test_list,
    parse_test_run, TestRunSummary,
};
