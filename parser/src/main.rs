//! @ai:module:intent CLI entry point for inspecting diffs and captured tool output
//! @ai:module:layer presentation
//! @ai:module:public_api main
//! @ai:module:depends_on diff, apply, test_output, output

use clap::{Parser, Subcommand, ValueEnum};
use patchverify_parser::{
    apply, diff, output, read_text, test_output, OutputFormat, VerificationOutcome,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "patchverify")]
#[command(author, version, about = "Inspect patches and captured patch/test tool output")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the files a unified diff touches and how each strip level resolves them
    Diff {
        /// Path to the diff file
        path: PathBuf,

        /// Project directory used to derive the first strip level
        #[arg(long)]
        project_dir: Option<PathBuf>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },

    /// Classify a captured `patch` tool log
    ApplyOutput {
        /// Path to the captured output
        path: PathBuf,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },

    /// Classify a captured full test-run log
    TestOutput {
        /// Path to the captured output
        path: PathBuf,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    JsonPretty,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Diff {
            path,
            project_dir,
            format,
        } => {
            let parsed = read_text(&path).and_then(|text| diff::parse_diff(&text));

            match parsed {
                Ok(unified) => {
                    let levels = match project_dir.map(std::path::absolute) {
                        Some(Ok(dir)) => diff::candidate_strip_levels(&dir).to_vec(),
                        Some(Err(e)) => {
                            eprintln!("Error: {}", e);
                            return ExitCode::from(2);
                        }
                        None => vec![0, 1],
                    };

                    println!("{}", output::format_diff(&unified, &levels, format.into()));
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::from(2)
                }
            }
        }

        Commands::ApplyOutput { path, format } => match read_text(&path) {
            Ok(text) => {
                let outcome = apply::classify_apply_output(&text);
                println!("{}", output::format_apply_outcome(&outcome, format.into()));

                if outcome.is_applied() {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::from(1)
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::from(2)
            }
        },

        Commands::TestOutput { path, format } => match read_text(&path) {
            Ok(text) => {
                let outcome =
                    VerificationOutcome::from_test_run(test_output::parse_test_run(&text));
                println!("{}", output::format_test_run(&outcome, format.into()));

                if outcome.is_success() {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::from(1)
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::from(2)
            }
        },
    }
}
