//! @ai:module:intent Discover the tests that fail on the unpatched project
//! @ai:module:layer application
//! @ai:module:public_api TriggerTestDiscoverer, TriggeringTests
//! @ai:module:depends_on runner, templates
//! @ai:module:stateless true

use crate::runner::CommandRunnerTrait;
use crate::templates::CommandSet;
use anyhow::Result;
use patchverify_parser::parse_test_list;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// @ai:intent Ordered pre-patch failing tests, shared read-only by a whole batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TriggeringTests(Vec<String>);

impl TriggeringTests {
    pub fn new(tests: Vec<String>) -> Self {
        Self(tests)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// @ai:intent Queries the benchmark tool for the trigger test category
pub struct TriggerTestDiscoverer<R: CommandRunnerTrait> {
    runner: Arc<R>,
    commands: Arc<CommandSet>,
    project_dir: PathBuf,
}

impl<R: CommandRunnerTrait> TriggerTestDiscoverer<R> {
    /// @ai:effects pure
    pub fn new(runner: Arc<R>, commands: Arc<CommandSet>, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            commands,
            project_dir: project_dir.into(),
        }
    }

    /// @ai:intent Export the triggering tests once
    /// @ai:post empty when the export command fails
    /// @ai:effects io
    pub fn discover(&self) -> Result<TriggeringTests> {
        let command = self.commands.export_trigger_tests()?;
        let output = self.runner.run_text(&command, &self.project_dir, false)?;

        Ok(TriggeringTests::new(parse_test_list(&output)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VerifierConfig;
    use crate::runner::{CommandOutput, MockCommandRunner};
    use pretty_assertions::assert_eq;

    fn discoverer(runner: MockCommandRunner) -> TriggerTestDiscoverer<MockCommandRunner> {
        let config = VerifierConfig::default();
        TriggerTestDiscoverer::new(
            Arc::new(runner),
            Arc::new(CommandSet::new(config.commands, config.benchmark)),
            "/work/project",
        )
    }

    #[test]
    fn test_lines_are_trimmed_and_blanks_dropped() {
        let runner = MockCommandRunner::new().on(
            "export -p tests.trigger",
            CommandOutput::ok("  org.apache.FooTest::testA \n\n org.apache.BarTest::testB\n"),
        );

        let tests = discoverer(runner).discover().unwrap();

        assert_eq!(
            tests.as_slice(),
            &[
                "org.apache.FooTest::testA".to_string(),
                "org.apache.BarTest::testB".to_string()
            ]
        );
    }

    #[test]
    fn test_failed_export_yields_empty_set() {
        let runner = MockCommandRunner::new().on(
            "export",
            CommandOutput::failed("partial", "no such project", 1),
        );

        assert!(discoverer(runner).discover().unwrap().is_empty());
    }
}
