//! @ai:module:intent Check that the external tools named in command templates are installed
//! @ai:module:layer infrastructure
//! @ai:module:public_api ToolchainValidator, ToolchainStatus, MissingTool
//! @ai:module:depends_on config, runner
//! @ai:module:stateless true

use crate::config::CommandConfig;
use crate::runner::CommandRunnerTrait;
use shell_escape::escape;
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::path::Path;

/// @ai:intent Status of toolchain validation
#[derive(Debug, Default)]
pub struct ToolchainStatus {
    pub available_tools: BTreeSet<String>,
    pub missing_tools: Vec<MissingTool>,
}

impl ToolchainStatus {
    pub fn is_complete(&self) -> bool {
        self.missing_tools.is_empty()
    }
}

/// @ai:intent Information about a missing tool
#[derive(Debug)]
pub struct MissingTool {
    pub tool_name: String,
    /// Templates that start with this tool.
    pub used_by: Vec<&'static str>,
    pub install_hint: &'static str,
}

/// @ai:intent Validates that required tools are on PATH
pub struct ToolchainValidator;

impl ToolchainValidator {
    /// @ai:intent Program a template invokes, skipping leading `VAR=value` assignments
    /// @ai:effects pure
    fn program_of(template: &str) -> Option<&str> {
        template
            .split_whitespace()
            .find(|token| !token.contains('='))
    }

    /// @ai:intent Get install hint for a tool
    /// @ai:effects pure
    fn get_install_hint(tool: &str) -> &'static str {
        match tool {
            "git" => "Install git: https://git-scm.com/downloads",
            "defects4j" => {
                "Install Defects4J and add framework/bin to PATH: https://github.com/rjust/defects4j"
            }
            "patch" => "Install GNU patch from your system package manager",
            _ => "Check tool documentation for installation instructions",
        }
    }

    /// @ai:intent Check if a command is available to the shell
    /// @ai:effects io
    fn is_tool_available<R: CommandRunnerTrait>(runner: &R, tool: &str, cwd: &Path) -> bool {
        let probe = format!("command -v {}", escape(Cow::Borrowed(tool)));

        runner
            .run(&probe, cwd)
            .map(|output| output.success)
            .unwrap_or(false)
    }

    /// @ai:intent Probe every distinct program used by the templates
    /// @ai:effects io
    pub fn validate<R: CommandRunnerTrait>(
        runner: &R,
        commands: &CommandConfig,
        cwd: &Path,
    ) -> ToolchainStatus {
        let mut status = ToolchainStatus::default();

        for (name, template, _) in commands.templates() {
            let Some(tool) = Self::program_of(template) else {
                continue;
            };

            if status.available_tools.contains(tool) {
                continue;
            }

            if let Some(missing) = status.missing_tools.iter_mut().find(|m| m.tool_name == tool) {
                missing.used_by.push(name);
                continue;
            }

            if Self::is_tool_available(runner, tool, cwd) {
                status.available_tools.insert(tool.to_string());
            } else {
                status.missing_tools.push(MissingTool {
                    tool_name: tool.to_string(),
                    used_by: vec![name],
                    install_hint: Self::get_install_hint(tool),
                });
            }
        }

        status
    }

    /// @ai:intent Log warnings for missing tools
    /// @ai:effects io
    pub fn log_warnings(status: &ToolchainStatus) {
        for missing in &status.missing_tools {
            tracing::warn!(
                "Tool '{}' not found - commands {} will fail. {}",
                missing.tool_name,
                missing.used_by.join(", "),
                missing.install_hint
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{CommandOutput, CommandRunner, MockCommandRunner};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_program_of_skips_env_assignments() {
        assert_eq!(
            ToolchainValidator::program_of("TZ=UTC defects4j test"),
            Some("defects4j")
        );
        assert_eq!(ToolchainValidator::program_of("   "), None);
    }

    #[test]
    fn test_get_install_hint_known_tools() {
        assert!(ToolchainValidator::get_install_hint("git").contains("git-scm"));
        assert!(ToolchainValidator::get_install_hint("defects4j").contains("rjust/defects4j"));
    }

    #[test]
    fn test_each_tool_probed_once() {
        let runner = MockCommandRunner::new()
            .on("command -v defects4j", CommandOutput::failed("", "", 1));

        let status = ToolchainValidator::validate(
            &runner,
            &CommandConfig::default(),
            Path::new("/"),
        );

        assert_eq!(
            runner.calls(),
            vec!["command -v git", "command -v defects4j", "command -v patch"]
        );
        assert_eq!(status.missing_tools.len(), 1);
        assert_eq!(status.missing_tools[0].tool_name, "defects4j");
        assert_eq!(
            status.missing_tools[0].used_by,
            vec!["checkout", "export_trigger_tests", "compile", "run_test", "run_all_tests"]
        );
        assert!(status.available_tools.contains("git"));
    }

    #[test]
    fn test_is_tool_available_nonexistent() {
        let temp = tempfile::TempDir::new().unwrap();
        assert!(!ToolchainValidator::is_tool_available(
            &CommandRunner::new(),
            "nonexistent_tool_xyz",
            temp.path()
        ));
    }
}
