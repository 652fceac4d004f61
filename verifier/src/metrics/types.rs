//! @ai:module:intent Result types persisted and reported for a batch
//! @ai:module:layer domain
//! @ai:module:public_api VerificationRecord, BatchSummary, OutcomeStats
//! @ai:module:stateless true

use crate::pipeline::{Stage, VerificationReport};
use chrono::{DateTime, Utc};
use patchverify_parser::VerificationOutcome;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// @ai:intent (patch name, outcome) pair plus what the pipeline learned on the way
#[derive(Debug, Clone, Serialize)]
pub struct VerificationRecord {
    pub patch: String,
    /// Persisted status string.
    pub status: String,
    pub outcome: VerificationOutcome,
    pub stage: Option<Stage>,
    pub applied_strip: Option<usize>,
    pub duration_ms: u64,
}

impl VerificationRecord {
    /// @ai:intent Record for a patch that went through the pipeline
    /// @ai:effects pure
    pub fn from_report(patch: &str, report: &VerificationReport) -> Self {
        Self::new(
            patch,
            report.outcome.clone(),
            Some(report.stage),
            report.apply.as_ref().and_then(|a| a.applied_with()),
            report.duration_ms,
        )
    }

    /// @ai:intent Record for a candidate without a diff file
    /// @ai:effects pure
    pub fn no_diff(patch: &str) -> Self {
        Self::new(patch, VerificationOutcome::NoDiffFound, None, None, 0)
    }

    /// @ai:intent Record for a patch whose verification raised an unexpected error
    /// @ai:effects pure
    pub fn error(patch: &str, error: &anyhow::Error, duration_ms: u64) -> Self {
        Self::new(
            patch,
            VerificationOutcome::error(format!("{error:#}")),
            None,
            None,
            duration_ms,
        )
    }

    fn new(
        patch: &str,
        outcome: VerificationOutcome,
        stage: Option<Stage>,
        applied_strip: Option<usize>,
        duration_ms: u64,
    ) -> Self {
        Self {
            patch: patch.to_string(),
            status: outcome.to_string(),
            outcome,
            stage,
            applied_strip,
            duration_ms,
        }
    }
}

/// @ai:intent Outcome counts over a batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutcomeStats {
    pub total: usize,
    pub success: usize,
    /// Percentage of patches classified `Success`.
    pub success_rate: f64,
    pub by_category: BTreeMap<String, usize>,
    pub total_duration_ms: u64,
}

/// @ai:intent Everything written to the JSON/Markdown summaries
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub project: String,
    pub version: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub patches_dir: PathBuf,
    pub project_dir: PathBuf,
    pub results_file: PathBuf,
    pub triggering_tests: Vec<String>,
    pub records: Vec<VerificationRecord>,
    pub stats: OutcomeStats,
}
