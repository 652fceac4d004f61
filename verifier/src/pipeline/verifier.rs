//! @ai:module:intent Drive one patch through the verification state machine
//! @ai:module:layer application
//! @ai:module:public_api PatchVerifier, VerificationReport, Stage
//! @ai:module:depends_on pipeline::project, pipeline::applier, pipeline::triggers, runner
//! @ai:module:stateless true

use crate::patches::PatchArtifact;
use crate::pipeline::applier::{ApplyReport, PatchApplier};
use crate::pipeline::project::{ProjectResetter, ResetReport};
use crate::pipeline::triggers::TriggeringTests;
use crate::report::ProgressLog;
use crate::runner::CommandRunnerTrait;
use crate::templates::CommandSet;
use anyhow::Result;
use patchverify_parser::{confirms_no_failures, parse_test_run, VerificationOutcome};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Token in compile output that marks a failed build.
const COMPILE_FAILURE_TOKEN: &str = "FAIL";

/// @ai:intent Pipeline states in strict order; a report records the last one reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Reset,
    Applied,
    Compiled,
    FastValidated,
    FullValidated,
    Classified,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Reset => "reset",
            Stage::Applied => "applied",
            Stage::Compiled => "compiled",
            Stage::FastValidated => "fast_validated",
            Stage::FullValidated => "full_validated",
            Stage::Classified => "classified",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// @ai:intent Everything learned while verifying one patch
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub outcome: VerificationOutcome,
    pub stage: Stage,
    pub reset: ResetReport,
    pub apply: Option<ApplyReport>,
    pub duration_ms: u64,
}

/// @ai:intent Verifies patches sequentially against one project checkout
pub struct PatchVerifier<R: CommandRunnerTrait> {
    runner: Arc<R>,
    commands: Arc<CommandSet>,
    project_dir: PathBuf,
    resetter: Arc<ProjectResetter<R>>,
    applier: PatchApplier<R>,
    progress: Option<Arc<ProgressLog>>,
}

impl<R: CommandRunnerTrait> PatchVerifier<R> {
    /// @ai:intent Create a verifier owning the project directory for its lifetime
    /// @ai:effects pure
    pub fn new(runner: Arc<R>, commands: Arc<CommandSet>, project_dir: impl Into<PathBuf>) -> Self {
        let project_dir = project_dir.into();
        let resetter = Arc::new(ProjectResetter::new(
            runner.clone(),
            commands.clone(),
            project_dir.clone(),
        ));
        let applier = PatchApplier::new(runner.clone(), commands.clone(), resetter.clone());

        Self {
            runner,
            commands,
            project_dir,
            resetter,
            applier,
            progress: None,
        }
    }

    /// @ai:intent Mirror progress messages into a batch log
    pub fn with_progress(mut self, progress: Arc<ProgressLog>) -> Self {
        self.progress = Some(progress);
        self
    }

    fn progress(&self, message: &str) {
        match &self.progress {
            Some(log) => log.info(message),
            None => tracing::info!("{}", message),
        }
    }

    /// @ai:intent Run a command whose failure output is still evidence
    /// @ai:effects io
    fn capture(&self, command: &str) -> Result<String> {
        let text = self.runner.run_text(command, &self.project_dir, true)?;
        tracing::debug!(command = %command, output = %text, "Captured output");
        Ok(text)
    }

    /// @ai:intent Verify one patch; first failing step decides the outcome
    /// @ai:pre triggering tests were discovered on the unpatched project
    /// @ai:post Err only for unexpected orchestration failures
    /// @ai:effects io, fs:write
    pub fn verify(
        &self,
        artifact: &PatchArtifact,
        triggering: &TriggeringTests,
    ) -> Result<VerificationReport> {
        let start = Instant::now();
        self.progress(&format!("Testing {}...", artifact.name));

        let reset = self.resetter.reset()?;
        let mut report = VerificationReport {
            outcome: VerificationOutcome::ApplyFailed,
            stage: Stage::Reset,
            reset,
            apply: None,
            duration_ms: 0,
        };

        let apply = self.applier.apply(&artifact.diff_file)?;
        let applied = apply.is_applied();
        report.apply = Some(apply);

        if applied {
            report.stage = Stage::Applied;
            (report.outcome, report.stage) = self.validate(triggering)?;
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            patch = %artifact.name,
            stage = %report.stage,
            duration_ms = report.duration_ms,
            "{}",
            report.outcome
        );

        Ok(report)
    }

    /// @ai:intent Compile, run triggering tests, then the full suite
    /// @ai:effects io
    fn validate(&self, triggering: &TriggeringTests) -> Result<(VerificationOutcome, Stage)> {
        let compile_output = self.capture(&self.commands.compile()?)?;
        if compile_output.contains(COMPILE_FAILURE_TOKEN) {
            return Ok((VerificationOutcome::CompileFailed, Stage::Applied));
        }

        for test in triggering.iter() {
            let output = self.capture(&self.commands.run_test(test)?)?;

            if !confirms_no_failures(&output) {
                return Ok((
                    VerificationOutcome::TriggeringFailed { test: test.clone() },
                    Stage::Compiled,
                ));
            }
        }

        self.progress("  Triggering tests passed. Running full regression test...");
        let full_output = self.capture(&self.commands.run_all_tests()?)?;

        match parse_test_run(&full_output) {
            None => Ok((VerificationOutcome::TestExecutionFailed, Stage::FullValidated)),
            summary => Ok((
                VerificationOutcome::from_test_run(summary),
                Stage::Classified,
            )),
        }
    }
}
