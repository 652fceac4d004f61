//! @ai:module:intent Batch verification of candidate patches against a defect benchmark
//! @ai:module:layer application
//! @ai:module:public_api config, error, metrics, patches, pipeline, report, runner, templates, toolchain

pub mod config;
pub mod error;
pub mod metrics;
pub mod patches;
pub mod pipeline;
pub mod report;
pub mod runner;
pub mod templates;
pub mod toolchain;

pub use config::VerifierConfig;
pub use error::VerifierError;
pub use metrics::{BatchSummary, MetricsAggregator, VerificationRecord};
pub use patches::{scan_patches, PatchArtifact, PatchCandidate};
pub use pipeline::{PatchVerifier, Stage, TriggeringTests, VerificationReport};
pub use report::{ProgressLog, ReportGenerator, ResultsWriter};
pub use runner::{BatchRunner, CommandRunner, CommandRunnerTrait, MockCommandRunner};
pub use templates::CommandSet;
pub use toolchain::{ToolchainStatus, ToolchainValidator};
