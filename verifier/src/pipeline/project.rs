//! @ai:module:intent Restore the project checkout to the pristine buggy version
//! @ai:module:layer application
//! @ai:module:public_api ProjectResetter, ResetReport, ResetMode
//! @ai:module:depends_on runner, templates
//! @ai:module:stateless true

use crate::runner::CommandRunnerTrait;
use crate::templates::CommandSet;
use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Version-control metadata whose presence selects a clean over a checkout.
const VCS_DIR: &str = ".git";

/// @ai:intent How the reset was performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetMode {
    /// Discard tracked changes, then remove untracked files.
    Clean,
    /// Fresh benchmark checkout into an empty directory.
    Checkout,
}

/// @ai:intent Outcome of a reset; command failures are kept as non-fatal issues
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetReport {
    pub mode: ResetMode,
    pub issues: Vec<String>,
}

impl ResetReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// @ai:intent Resets the project directory between verification steps
pub struct ProjectResetter<R: CommandRunnerTrait> {
    runner: Arc<R>,
    commands: Arc<CommandSet>,
    project_dir: PathBuf,
}

impl<R: CommandRunnerTrait> ProjectResetter<R> {
    /// @ai:intent Create a resetter for one project directory
    /// @ai:effects pure
    pub fn new(runner: Arc<R>, commands: Arc<CommandSet>, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            commands,
            project_dir: project_dir.into(),
        }
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// @ai:intent Bring the working tree back to the pristine state
    /// @ai:post failed reset commands are reported in `issues` and logged, never raised
    /// @ai:effects io, fs:write
    pub fn reset(&self) -> Result<ResetReport> {
        let (mode, commands) = if self.project_dir.join(VCS_DIR).exists() {
            (
                ResetMode::Clean,
                vec![
                    self.commands.discard_changes()?,
                    self.commands.remove_untracked()?,
                ],
            )
        } else {
            (ResetMode::Checkout, vec![self.commands.checkout()?])
        };

        let mut issues = Vec::new();

        for command in commands {
            let output = self.runner.run(&command, &self.project_dir)?;

            if !output.success {
                let detail = output.stderr.trim();
                tracing::warn!(
                    command = %command,
                    exit_code = ?output.exit_code,
                    "Reset command failed: {}",
                    detail
                );
                issues.push(format!("`{}` failed: {}", command, detail));
            }
        }

        Ok(ResetReport { mode, issues })
    }
}
