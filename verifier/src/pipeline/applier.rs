//! @ai:module:intent Apply a diff with a ranked set of strip levels
//! @ai:module:layer application
//! @ai:module:public_api PatchApplier, ApplyReport, ApplyAttempt
//! @ai:module:depends_on runner, templates, pipeline::project
//! @ai:module:stateless true

use crate::pipeline::project::ProjectResetter;
use crate::runner::CommandRunnerTrait;
use crate::templates::CommandSet;
use anyhow::{Context, Result};
use patchverify_parser::{candidate_strip_levels, classify_apply_output, ApplyOutcome};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// @ai:intent One `patch` invocation and its classified output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyAttempt {
    pub strip: usize,
    pub command: String,
    pub outcome: ApplyOutcome,
}

/// @ai:intent All attempts made for one diff, in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    pub attempts: Vec<ApplyAttempt>,
}

impl ApplyReport {
    /// @ai:intent Strip level of the attempt that applied, if any
    /// @ai:effects pure
    pub fn applied_with(&self) -> Option<usize> {
        self.attempts
            .iter()
            .find(|a| a.outcome.is_applied())
            .map(|a| a.strip)
    }

    pub fn is_applied(&self) -> bool {
        self.applied_with().is_some()
    }
}

/// @ai:intent Applies diffs whose headers may carry absolute paths from another machine
pub struct PatchApplier<R: CommandRunnerTrait> {
    runner: Arc<R>,
    commands: Arc<CommandSet>,
    resetter: Arc<ProjectResetter<R>>,
}

impl<R: CommandRunnerTrait> PatchApplier<R> {
    /// @ai:effects pure
    pub fn new(
        runner: Arc<R>,
        commands: Arc<CommandSet>,
        resetter: Arc<ProjectResetter<R>>,
    ) -> Self {
        Self {
            runner,
            commands,
            resetter,
        }
    }

    /// @ai:intent Try each strip level until one applies cleanly
    /// @ai:post after every rejected attempt the project has been reset
    /// @ai:effects io, fs:write
    pub fn apply(&self, diff_file: &Path) -> Result<ApplyReport> {
        let project_dir = self.resetter.project_dir();
        let absolute_project: PathBuf = std::path::absolute(project_dir)
            .with_context(|| format!("Failed to resolve {}", project_dir.display()))?;
        let absolute_diff = std::path::absolute(diff_file)
            .with_context(|| format!("Failed to resolve {}", diff_file.display()))?;

        let mut report = ApplyReport::default();

        for strip in candidate_strip_levels(&absolute_project) {
            let command = self.commands.apply_patch(strip, &absolute_diff)?;
            let output = self.runner.run(&command, project_dir)?;
            let text = output.text(true);
            tracing::debug!(strip, output = %text, "Patch attempt finished");

            let outcome = classify_apply_output(&text);
            let applied = outcome.is_applied();

            if !applied {
                tracing::warn!(strip, "Patch attempt rejected: {}", outcome.describe());
            }

            report.attempts.push(ApplyAttempt {
                strip,
                command,
                outcome,
            });

            if applied {
                break;
            }

            let reset = self.resetter.reset()?;
            if !reset.is_clean() {
                tracing::warn!("Reset after rejected attempt reported {} issue(s)", reset.issues.len());
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VerifierConfig;
    use crate::runner::{CommandOutput, MockCommandRunner};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn applier(runner: Arc<MockCommandRunner>, project: &Path) -> PatchApplier<MockCommandRunner> {
        let config = VerifierConfig::default();
        let commands = Arc::new(CommandSet::new(config.commands, config.benchmark));
        let resetter = Arc::new(ProjectResetter::new(
            runner.clone(),
            commands.clone(),
            project,
        ));
        PatchApplier::new(runner, commands, resetter)
    }

    fn git_project(temp: &TempDir) -> PathBuf {
        let project = temp.path().join("project");
        std::fs::create_dir_all(project.join(".git")).unwrap();
        project
    }

    #[test]
    fn test_first_clean_level_wins() {
        let temp = TempDir::new().unwrap();
        let project = git_project(&temp);
        let runner = Arc::new(MockCommandRunner::new().on(
            "patch -p",
            CommandOutput::ok("patching file src/main/java/Foo.java\n"),
        ));

        let report = applier(runner.clone(), &project)
            .apply(&temp.path().join("diff"))
            .unwrap();

        let expected = diff_strip(&project);
        assert_eq!(report.applied_with(), Some(expected));
        assert_eq!(report.attempts.len(), 1);
        assert_eq!(runner.count_matching("git clean"), 0);
    }

    #[test]
    fn test_falls_through_to_level_one_with_resets() {
        let temp = TempDir::new().unwrap();
        let project = git_project(&temp);
        let runner = Arc::new(MockCommandRunner::new().on_sequence(
            "patch -p",
            vec![
                CommandOutput::failed("can't find file to patch at input line 3\n", "", 1),
                CommandOutput::failed("Hunk #1 FAILED at 10.\n1 out of 1 hunk FAILED\n", "", 1),
                CommandOutput::ok("patching file src/Foo.java\n"),
            ],
        ));

        let report = applier(runner.clone(), &project)
            .apply(&temp.path().join("diff"))
            .unwrap();

        let strips: Vec<usize> = report.attempts.iter().map(|a| a.strip).collect();
        assert_eq!(strips, vec![diff_strip(&project), 0, 1]);
        assert_eq!(report.applied_with(), Some(1));
        assert_eq!(runner.count_matching("git checkout ."), 2);
        assert_eq!(runner.count_matching("git clean -fd"), 2);
    }

    #[test]
    fn test_all_levels_rejected_leaves_project_reset() {
        let temp = TempDir::new().unwrap();
        let project = git_project(&temp);
        let runner = Arc::new(MockCommandRunner::new().on(
            "patch -p",
            CommandOutput::failed("1 out of 1 hunk FAILED -- saving rejects to file Foo.java.rej\n", "", 1),
        ));

        let report = applier(runner.clone(), &project)
            .apply(&temp.path().join("diff"))
            .unwrap();

        assert!(!report.is_applied());
        assert_eq!(report.attempts.len(), 3);

        let calls = runner.calls();
        assert!(calls.last().unwrap().starts_with("git clean"));
        assert_eq!(runner.count_matching("git clean -fd"), 3);
    }

    #[test]
    fn test_patch_path_is_absolute_and_quoted() {
        let temp = TempDir::new().unwrap();
        let project = git_project(&temp);
        let runner = Arc::new(MockCommandRunner::new());
        let diff = temp.path().join("Patch 1").join("diff");

        applier(runner.clone(), &project).apply(&diff).unwrap();

        let expected = format!("'{}'", diff.display());
        assert!(runner.calls()[0].ends_with(&expected));
    }

    fn diff_strip(project: &Path) -> usize {
        patchverify_parser::project_strip_level(&std::path::absolute(project).unwrap())
    }
}
