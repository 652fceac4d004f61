//! @ai:module:intent Verify every patch candidate in a directory and persist results as they arrive
//! @ai:module:layer application
//! @ai:module:public_api BatchRunner
//! @ai:module:depends_on pipeline, patches, report, metrics
//! @ai:module:stateless false

use crate::config::VerifierConfig;
use crate::error::VerifierError;
use crate::metrics::{BatchSummary, MetricsAggregator, MetricsAggregatorTrait, VerificationRecord};
use crate::patches::{scan_patches, PatchCandidate};
use crate::pipeline::{PatchVerifier, TriggerTestDiscoverer, TriggeringTests};
use crate::report::{table, ProgressLog, ReportGenerator, ResultsWriter};
use crate::runner::CommandRunnerTrait;
use crate::templates::CommandSet;
use crate::toolchain::{ToolchainStatus, ToolchainValidator};
use anyhow::Result;
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// @ai:intent Sequential batch over all candidates under the patches directory
pub struct BatchRunner<R: CommandRunnerTrait> {
    runner: Arc<R>,
    config: VerifierConfig,
    commands: Arc<CommandSet>,
    progress: Arc<ProgressLog>,
}

impl<R: CommandRunnerTrait> BatchRunner<R> {
    /// @ai:intent Create a batch runner from a validated configuration
    /// @ai:post Err when a command template uses an unknown placeholder
    /// @ai:effects pure
    pub fn new(runner: Arc<R>, config: VerifierConfig) -> Result<Self, VerifierError> {
        config.validate()?;

        let commands = Arc::new(CommandSet::new(
            config.commands.clone(),
            config.benchmark.clone(),
        ));
        let progress = Arc::new(ProgressLog::new(&config.paths.log_file));

        Ok(Self {
            runner,
            config,
            commands,
            progress,
        })
    }

    pub fn progress(&self) -> &ProgressLog {
        &self.progress
    }

    /// @ai:intent Fail fast when an input directory is missing
    /// @ai:effects fs:read, fs:write
    fn require_directory(&self, role: &'static str, path: &Path) -> Result<(), VerifierError> {
        if path.exists() {
            return Ok(());
        }

        self.progress
            .error(&format!("Error: {} directory not found: {}", role, path.display()));

        Err(VerifierError::MissingDirectory {
            role,
            path: path.to_path_buf(),
        })
    }

    /// @ai:effects fs:read, fs:write
    pub fn check_directories(&self) -> Result<(), VerifierError> {
        self.require_directory("Patches", &self.config.paths.patches_dir)?;
        self.require_directory("Project", &self.config.paths.project_dir)
    }

    /// @ai:intent Warn about tools the templates need but PATH lacks
    /// @ai:post never fatal; the returned status is informational
    /// @ai:effects io
    pub fn preflight(&self) -> ToolchainStatus {
        let status = ToolchainValidator::validate(
            self.runner.as_ref(),
            &self.config.commands,
            &self.config.paths.project_dir,
        );

        if status.is_complete() {
            tracing::debug!(tools = ?status.available_tools, "Toolchain complete");
        } else {
            ToolchainValidator::log_warnings(&status);
        }

        status
    }

    /// @ai:intent Discover the triggering tests for the whole batch
    /// @ai:effects io
    pub fn discover_triggers(&self) -> Result<TriggeringTests> {
        self.progress.info("Identifying triggering tests...");

        let tests = TriggerTestDiscoverer::new(
            self.runner.clone(),
            self.commands.clone(),
            &self.config.paths.project_dir,
        )
        .discover()?;

        self.progress.info(&format!(
            "Found {} triggering tests: {:?}",
            tests.len(),
            tests.as_slice()
        ));

        Ok(tests)
    }

    /// @ai:intent Candidates in processing order
    /// @ai:effects fs:read
    pub fn candidates(&self) -> Result<Vec<PatchCandidate>> {
        scan_patches(&self.config.paths.patches_dir)
    }

    fn verifier(&self) -> PatchVerifier<R> {
        PatchVerifier::new(
            self.runner.clone(),
            self.commands.clone(),
            &self.config.paths.project_dir,
        )
        .with_progress(self.progress.clone())
    }

    /// @ai:intent Verify one candidate; every failure becomes a record, never an Err
    /// @ai:effects io, fs:write
    fn verify_candidate(
        &self,
        verifier: &PatchVerifier<R>,
        candidate: &PatchCandidate,
        triggering: &TriggeringTests,
    ) -> VerificationRecord {
        let start = Instant::now();

        let result = candidate.resolve().and_then(|artifact| match artifact {
            None => Ok(VerificationRecord::no_diff(&candidate.name)),
            Some(artifact) => verifier
                .verify(&artifact, triggering)
                .map(|report| VerificationRecord::from_report(&candidate.name, &report)),
        });

        result.unwrap_or_else(|e| {
            self.progress
                .error(&format!("Error verifying {}: {:#}", candidate.name, e));
            VerificationRecord::error(&candidate.name, &e, start.elapsed().as_millis() as u64)
        })
    }

    /// @ai:intent Verify a single candidate directory outside a batch
    /// @ai:pre the project directory exists
    /// @ai:effects io, fs:write
    pub fn verify_one(&self, patch_dir: &Path) -> Result<VerificationRecord> {
        self.require_directory("Project", &self.config.paths.project_dir)?;
        self.require_directory("Patch", patch_dir)?;

        let triggering = self.discover_triggers()?;
        let candidate = PatchCandidate::from_dir(patch_dir);

        Ok(self.verify_candidate(&self.verifier(), &candidate, &triggering))
    }

    /// @ai:intent Run the batch: triggers once, then every candidate in order
    /// @ai:post one CSV row per candidate, appended as soon as it is classified
    /// @ai:effects io, fs:read, fs:write
    pub fn run(&self) -> Result<BatchSummary> {
        let started_at = Utc::now();
        let paths = &self.config.paths;

        self.check_directories()?;
        self.preflight();

        let triggering = self.discover_triggers()?;
        let candidates = self.candidates()?;
        self.progress
            .info(&format!("Found {} patches to verify.", candidates.len()));

        println!("{}", table::header());

        let writer = ResultsWriter::create(&paths.results_file)?;
        let verifier = self.verifier();
        let mut records = Vec::with_capacity(candidates.len());

        for candidate in &candidates {
            let record = self.verify_candidate(&verifier, candidate, &triggering);

            println!("{}", table::row(&record.patch, &record.status));
            writer.append(&record.patch, &record.status)?;
            records.push(record);
        }

        self.progress.info(&format!(
            "Verification complete. Results saved to {}",
            paths.results_file.display()
        ));

        let stats = MetricsAggregator::new().aggregate(&records);
        for line in table::summary_lines(&stats) {
            println!("{}", line);
        }

        let summary = BatchSummary {
            project: self.config.benchmark.project.clone(),
            version: self.config.benchmark.version.clone(),
            started_at,
            finished_at: Utc::now(),
            patches_dir: paths.patches_dir.clone(),
            project_dir: paths.project_dir.clone(),
            results_file: paths.results_file.clone(),
            triggering_tests: triggering.as_slice().to_vec(),
            records,
            stats,
        };

        if let Some(report_dir) = &paths.report_dir {
            ReportGenerator::new().generate_all(&summary, report_dir)?;
        }

        Ok(summary)
    }
}
