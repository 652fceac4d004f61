//! @ai:module:intent CLI for batch patch verification
//! @ai:module:layer presentation

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use patchverify_batch::{
    report::table, BatchRunner, CommandRunner, VerifierConfig, VerifierError,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Looked up in the working directory when `--config` is not given.
const DEFAULT_CONFIG_FILE: &str = "patchverify.toml";

#[derive(Parser)]
#[command(name = "patchverify-batch")]
#[command(about = "Verify candidate patches against a defect benchmark's test suite")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify every patch directory and write the results CSV
    Run {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Verify a single patch directory
    Verify {
        /// Directory holding the diff file
        #[arg(long)]
        patch_dir: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// List patch directories in processing order with their diff files
    List {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Print the triggering tests of the unpatched project
    Triggers {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,
    },
}

#[derive(Args)]
struct ConfigArgs {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory with one subdirectory per candidate patch
    #[arg(long)]
    patches_dir: Option<PathBuf>,

    /// Benchmark project checkout the patches are applied to
    #[arg(long)]
    project_dir: Option<PathBuf>,

    /// Benchmark project identifier (e.g. Math)
    #[arg(long)]
    project: Option<String>,

    /// Benchmark version identifier (e.g. 1b)
    #[arg(long)]
    bench_version: Option<String>,

    /// Results CSV path
    #[arg(long)]
    results: Option<PathBuf>,

    /// Progress log path
    #[arg(long)]
    log: Option<PathBuf>,

    /// Directory for JSON and Markdown summaries
    #[arg(long)]
    report_dir: Option<PathBuf>,
}

impl ConfigArgs {
    /// @ai:intent Load the configuration file, then apply command-line overrides
    /// @ai:effects fs:read
    fn resolve(self) -> Result<VerifierConfig> {
        let mut config = load_or_default_config(self.config)?;

        if let Some(dir) = self.patches_dir {
            config.paths.patches_dir = dir;
        }
        if let Some(dir) = self.project_dir {
            config.paths.project_dir = dir;
        }
        if let Some(project) = self.project {
            config.benchmark.project = project;
        }
        if let Some(version) = self.bench_version {
            config.benchmark.version = version;
        }
        if let Some(results) = self.results {
            config.paths.results_file = results;
        }
        if let Some(log) = self.log {
            config.paths.log_file = log;
        }
        if self.report_dir.is_some() {
            config.paths.report_dir = self.report_dir;
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("patchverify_batch=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { config } => run_batch(config.resolve()?),
        Commands::Verify { patch_dir, config } => verify_patch(config.resolve()?, patch_dir),
        Commands::List { config } => list_patches(config.resolve()?),
        Commands::Triggers { config } => list_triggers(config.resolve()?),
        Commands::Init { output } => init_config(output),
    };

    match result {
        Err(e) if is_missing_directory(&e) => Ok(()),
        other => other,
    }
}

/// A missing input directory has already been logged; the run simply ends.
fn is_missing_directory(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref::<VerifierError>(),
        Some(VerifierError::MissingDirectory { .. })
    )
}

/// @ai:intent Build a batch runner that executes real shell commands
/// @ai:effects pure
fn create_runner(config: VerifierConfig) -> Result<BatchRunner<CommandRunner>> {
    let runner = Arc::new(CommandRunner::with_env(config.commands.env.clone()));
    Ok(BatchRunner::new(runner, config)?)
}

/// @ai:intent Run the whole batch
/// @ai:effects io, fs:read, fs:write
fn run_batch(config: VerifierConfig) -> Result<()> {
    let summary = create_runner(config)?.run()?;

    println!();
    println!("Results saved to {}", summary.results_file.display());
    Ok(())
}

/// @ai:intent Verify one patch directory and print its outcome
/// @ai:effects io, fs:read, fs:write
fn verify_patch(config: VerifierConfig, patch_dir: PathBuf) -> Result<()> {
    let runner = create_runner(config)?;
    runner.preflight();

    let record = runner.verify_one(&patch_dir)?;

    println!("{}", table::header());
    println!("{}", table::row(&record.patch, &record.status));
    Ok(())
}

/// @ai:intent List candidates and their resolved diff files
/// @ai:effects fs:read
fn list_patches(config: VerifierConfig) -> Result<()> {
    let candidates = create_runner(config)?.candidates()?;

    println!("Patch candidates ({}):", candidates.len());
    println!();
    println!("{:<20} {}", "Patch", "Diff");
    println!("{}", "-".repeat(55));

    for candidate in &candidates {
        let diff = candidate
            .resolve()?
            .map(|artifact| artifact.diff_file.display().to_string())
            .unwrap_or_else(|| "-".to_string());

        println!("{:<20} {}", candidate.name, diff);
    }

    Ok(())
}

/// @ai:intent Print the triggering tests
/// @ai:effects io
fn list_triggers(config: VerifierConfig) -> Result<()> {
    let runner = create_runner(config)?;
    let tests = runner.discover_triggers()?;

    println!("Triggering tests ({}):", tests.len());
    for test in tests.iter() {
        println!("  - {}", test);
    }

    Ok(())
}

/// @ai:intent Initialize default configuration file
/// @ai:effects fs:write
fn init_config(output: PathBuf) -> Result<()> {
    let config = VerifierConfig::default();
    config.save(&output)?;
    println!("Configuration saved to {}", output.display());
    Ok(())
}

/// @ai:intent Load configuration or use defaults
/// @ai:effects fs:read
fn load_or_default_config(path: Option<PathBuf>) -> Result<VerifierConfig> {
    match path {
        Some(p) => VerifierConfig::load(&p),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);

            if default_path.exists() {
                VerifierConfig::load(&default_path)
            } else {
                Ok(VerifierConfig::default())
            }
        }
    }
}
