//! @ai:module:intent Run shell commands inside the project checkout
//! @ai:module:layer infrastructure
//! @ai:module:public_api CommandRunner, CommandRunnerTrait, CommandOutput, MockCommandRunner
//! @ai:module:stateless false

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Mutex;
use std::time::Instant;

/// @ai:intent Captured result of one shell command
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub command: String,
    pub stdout: String,
    pub stderr: String,
    /// None when the process was killed by a signal.
    pub exit_code: Option<i32>,
    pub success: bool,
    pub duration_ms: u64,
}

impl CommandOutput {
    /// @ai:intent Successful output with the given stdout
    /// @ai:effects pure
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            exit_code: Some(0),
            success: true,
            ..Self::default()
        }
    }

    /// @ai:intent Failed output with the given streams and exit code
    /// @ai:effects pure
    pub fn failed(stdout: impl Into<String>, stderr: impl Into<String>, code: i32) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code: Some(code),
            success: false,
            ..Self::default()
        }
    }

    /// @ai:intent stdout followed by stderr
    /// @ai:effects pure
    pub fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }

    /// @ai:intent Text a caller sees for this command
    /// @ai:post success -> stdout; failure + ignore_failure -> stdout+stderr; otherwise empty
    /// @ai:effects pure
    pub fn text(&self, ignore_failure: bool) -> String {
        if self.success {
            self.stdout.clone()
        } else if ignore_failure {
            self.combined()
        } else {
            String::new()
        }
    }
}

/// @ai:intent Trait for executing shell commands in a working directory
pub trait CommandRunnerTrait: Send + Sync {
    /// @ai:intent Run a command through the shell and capture both streams
    /// @ai:post Err only when the process could not be started
    fn run(&self, command: &str, cwd: &Path) -> Result<CommandOutput>;

    /// @ai:intent Run a command and return the text callers classify
    /// @ai:effects io
    fn run_text(&self, command: &str, cwd: &Path, ignore_failure: bool) -> Result<String> {
        let output = self.run(command, cwd)?;

        if !output.success && !ignore_failure {
            tracing::warn!(
                command = %command,
                exit_code = ?output.exit_code,
                "Command failed: {}",
                output.stderr.trim()
            );
        }

        Ok(output.text(ignore_failure))
    }
}

/// @ai:intent Runs commands with `sh -c`
#[derive(Debug, Clone)]
pub struct CommandRunner {
    shell: String,
    env: BTreeMap<String, String>,
}

impl CommandRunner {
    /// @ai:intent Create a runner using the inherited environment
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            shell: "sh".to_string(),
            env: BTreeMap::new(),
        }
    }

    /// @ai:intent Create a runner that adds the given variables to every command
    /// @ai:effects pure
    pub fn with_env(env: BTreeMap<String, String>) -> Self {
        Self {
            env,
            ..Self::new()
        }
    }
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunnerTrait for CommandRunner {
    /// @ai:effects io
    fn run(&self, command: &str, cwd: &Path) -> Result<CommandOutput> {
        tracing::debug!(command = %command, cwd = %cwd.display(), "Running command");
        let start = Instant::now();

        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .current_dir(cwd)
            .envs(&self.env)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to start `{}` in {}", command, cwd.display()))?;

        Ok(CommandOutput {
            command: command.to_string(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
            success: output.status.success(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// One recorded invocation of the mock runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub command: String,
    pub cwd: PathBuf,
}

struct MockRule {
    pattern: String,
    responses: Vec<CommandOutput>,
    served: usize,
}

/// @ai:intent Scripted runner for tests; answers by substring match on the command
pub struct MockCommandRunner {
    rules: Mutex<Vec<MockRule>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockCommandRunner {
    /// @ai:intent Runner whose every command succeeds with empty output
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            rules: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// @ai:intent Answer commands containing `pattern` with the given output
    /// @ai:post first matching rule wins
    pub fn on(self, pattern: &str, output: CommandOutput) -> Self {
        self.on_sequence(pattern, vec![output])
    }

    /// @ai:intent Answer successive matching commands in order, repeating the last
    pub fn on_sequence(self, pattern: &str, responses: Vec<CommandOutput>) -> Self {
        if let Ok(mut rules) = self.rules.lock() {
            rules.push(MockRule {
                pattern: pattern.to_string(),
                responses,
                served: 0,
            });
        }
        self
    }

    /// @ai:intent Commands run so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.iter().map(|c| c.command.clone()).collect())
            .unwrap_or_default()
    }

    /// @ai:intent Full call records including working directories
    pub fn recorded(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// @ai:intent Number of recorded commands containing `pattern`
    pub fn count_matching(&self, pattern: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.contains(pattern))
            .count()
    }
}

impl Default for MockCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunnerTrait for MockCommandRunner {
    /// @ai:effects pure
    fn run(&self, command: &str, cwd: &Path) -> Result<CommandOutput> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                command: command.to_string(),
                cwd: cwd.to_path_buf(),
            });
        }

        let mut rules = self
            .rules
            .lock()
            .map_err(|_| anyhow::anyhow!("mock runner lock poisoned"))?;

        let response = rules
            .iter_mut()
            .find(|rule| command.contains(&rule.pattern))
            .and_then(|rule| {
                let index = rule.served.min(rule.responses.len().saturating_sub(1));
                rule.served += 1;
                rule.responses.get(index).cloned()
            })
            .unwrap_or_else(|| CommandOutput::ok(""));

        Ok(CommandOutput {
            command: command.to_string(),
            ..response
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_echo_captures_stdout() {
        let temp = tempfile::TempDir::new().unwrap();
        let output = CommandRunner::new().run("echo hello", temp.path()).unwrap();

        assert!(output.success);
        assert_eq!(output.stdout, "hello\n");
        assert_eq!(output.exit_code, Some(0));
    }

    #[test]
    fn test_failure_text_depends_on_ignore_flag() {
        let temp = tempfile::TempDir::new().unwrap();
        let runner = CommandRunner::new();
        let command = "echo out; echo err >&2; exit 3";

        let output = runner.run(command, temp.path()).unwrap();
        assert!(!output.success);
        assert_eq!(output.exit_code, Some(3));

        assert_eq!(runner.run_text(command, temp.path(), true).unwrap(), "out\nerr\n");
        assert_eq!(runner.run_text(command, temp.path(), false).unwrap(), "");
    }

    #[test]
    fn test_env_and_cwd_are_applied() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("marker.txt"), "x").unwrap();

        let runner = CommandRunner::with_env(BTreeMap::from([(
            "PATCHVERIFY_TEST_VAR".to_string(),
            "value-42".to_string(),
        )]));

        let env = runner
            .run_text("echo $PATCHVERIFY_TEST_VAR", temp.path(), false)
            .unwrap();
        assert_eq!(env.trim(), "value-42");

        let listing = runner.run_text("ls", temp.path(), false).unwrap();
        assert!(listing.contains("marker.txt"));
    }

    #[test]
    fn test_missing_cwd_is_an_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let missing = temp.path().join("does-not-exist");

        assert!(CommandRunner::new().run("true", &missing).is_err());
    }

    #[test]
    fn test_mock_sequences_and_records() {
        let mock = MockCommandRunner::new()
            .on_sequence(
                "patch -p",
                vec![
                    CommandOutput::failed("1 out of 1 hunk FAILED", "", 1),
                    CommandOutput::ok("patching file A.java"),
                ],
            )
            .on("compile", CommandOutput::ok("BUILD OK"));
        let cwd = Path::new("/work");

        assert!(!mock.run("patch -p3 < d", cwd).unwrap().success);
        assert!(mock.run("patch -p0 < d", cwd).unwrap().success);
        assert!(mock.run("patch -p1 < d", cwd).unwrap().success);
        assert_eq!(mock.run("defects4j compile", cwd).unwrap().stdout, "BUILD OK");
        assert!(mock.run("git clean -fd", cwd).unwrap().stdout.is_empty());

        assert_eq!(mock.count_matching("patch -p"), 3);
        assert_eq!(mock.recorded()[0].cwd, PathBuf::from("/work"));
    }
}
