//! @ai:module:intent Render configured command templates into shell command lines
//! @ai:module:layer infrastructure
//! @ai:module:public_api CommandSet, render_template, placeholders
//! @ai:module:depends_on config
//! @ai:module:stateless true

use crate::config::{BenchmarkConfig, CommandConfig};
use crate::error::VerifierError;
use regex::Regex;
use shell_escape::escape;
use std::borrow::Cow;
use std::path::Path;

fn placeholder_regex() -> Regex {
    Regex::new(r"\{([A-Za-z_]+)\}").expect("placeholder regex is valid")
}

/// @ai:intent Locate `{name}` placeholders, skipping shell `${name}` expansions
/// @ai:effects pure
fn placeholder_spans(template: &str) -> Vec<(std::ops::Range<usize>, &str)> {
    placeholder_regex()
        .captures_iter(template)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?;

            if template[..whole.start()].ends_with('$') {
                return None;
            }

            Some((whole.range(), name.as_str()))
        })
        .collect()
}

/// @ai:intent List the placeholder names a template references, in order
/// @ai:effects pure
pub fn placeholders(template: &str) -> Vec<String> {
    placeholder_spans(template)
        .into_iter()
        .map(|(_, name)| name.to_string())
        .collect()
}

/// @ai:intent Substitute `{name}` placeholders with the supplied values
/// @ai:pre values are already shell-safe
/// @ai:post Err names the first placeholder without a value; `${name}` is left for the shell
/// @ai:effects pure
pub fn render_template(template: &str, vars: &[(&str, String)]) -> Result<String, VerifierError> {
    let mut rendered = String::with_capacity(template.len());
    let mut cursor = 0;

    for (span, name) in placeholder_spans(template) {
        let Some((_, value)) = vars.iter().find(|(key, _)| *key == name) else {
            return Err(VerifierError::Template {
                template: template.to_string(),
                placeholder: name.to_string(),
            });
        };

        rendered.push_str(&template[cursor..span.start]);
        rendered.push_str(value);
        cursor = span.end;
    }

    rendered.push_str(&template[cursor..]);
    Ok(rendered)
}

fn quoted(value: &str) -> String {
    escape(Cow::Borrowed(value)).into_owned()
}

/// @ai:intent Configured commands bound to one benchmark project/version
#[derive(Debug, Clone)]
pub struct CommandSet {
    commands: CommandConfig,
    benchmark: BenchmarkConfig,
}

impl CommandSet {
    /// @ai:intent Bind templates to a benchmark identity
    /// @ai:effects pure
    pub fn new(commands: CommandConfig, benchmark: BenchmarkConfig) -> Self {
        Self {
            commands,
            benchmark,
        }
    }

    /// @ai:intent Render a template with the common and the given extra values
    /// @ai:effects pure
    fn render(&self, template: &str, extra: &[(&str, String)]) -> Result<String, VerifierError> {
        let mut vars = vec![
            ("project", quoted(&self.benchmark.project)),
            ("version", quoted(&self.benchmark.version)),
        ];
        vars.extend(extra.iter().cloned());

        render_template(template, &vars)
    }

    pub fn discard_changes(&self) -> Result<String, VerifierError> {
        self.render(&self.commands.discard_changes, &[])
    }

    pub fn remove_untracked(&self) -> Result<String, VerifierError> {
        self.render(&self.commands.remove_untracked, &[])
    }

    pub fn checkout(&self) -> Result<String, VerifierError> {
        self.render(&self.commands.checkout, &[])
    }

    pub fn export_trigger_tests(&self) -> Result<String, VerifierError> {
        self.render(&self.commands.export_trigger_tests, &[])
    }

    pub fn compile(&self) -> Result<String, VerifierError> {
        self.render(&self.commands.compile, &[])
    }

    /// @ai:intent Command that runs one fully-qualified test (`Class::method`)
    pub fn run_test(&self, test: &str) -> Result<String, VerifierError> {
        self.render(&self.commands.run_test, &[("test", quoted(test))])
    }

    pub fn run_all_tests(&self) -> Result<String, VerifierError> {
        self.render(&self.commands.run_all_tests, &[])
    }

    /// @ai:intent Command that applies a diff file with the given strip level
    pub fn apply_patch(&self, strip: usize, patch: &Path) -> Result<String, VerifierError> {
        self.render(
            &self.commands.apply_patch,
            &[
                ("strip", strip.to_string()),
                ("patch", quoted(&patch.to_string_lossy())),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn default_set() -> CommandSet {
        CommandSet::new(CommandConfig::default(), BenchmarkConfig::default())
    }

    #[test]
    fn test_render_defaults() {
        let set = default_set();

        assert_eq!(
            set.checkout().unwrap(),
            "defects4j checkout -p Math -v 1b -w ."
        );
        assert_eq!(
            set.run_test("org.apache.commons.math.FooTest::testBar").unwrap(),
            "defects4j test -t 'org.apache.commons.math.FooTest::testBar'"
        );
        assert_eq!(
            set.apply_patch(5, Path::new("/data/patches/Patch_1/diff"))
                .unwrap(),
            "patch -p5 < /data/patches/Patch_1/diff"
        );
    }

    #[test]
    fn test_paths_with_spaces_are_quoted() {
        let command = default_set()
            .apply_patch(1, Path::new("/tmp/my patches/a.diff"))
            .unwrap();

        assert_eq!(command, "patch -p1 < '/tmp/my patches/a.diff'");
    }

    #[test]
    fn test_unknown_placeholder_is_an_error() {
        let result = render_template("run {nope}", &[]);

        match result {
            Err(VerifierError::Template { placeholder, .. }) => assert_eq!(placeholder, "nope"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_placeholders_in_order() {
        assert_eq!(
            placeholders("patch -p{strip} < {patch}"),
            vec!["strip".to_string(), "patch".to_string()]
        );
    }

    #[test]
    fn test_shell_expansion_is_not_a_placeholder() {
        let template = "defects4j test -w ${HOME}";

        assert!(placeholders(template).is_empty());
        assert_eq!(render_template(template, &[]).unwrap(), template);

        let mut commands = CommandConfig::default();
        commands.run_all_tests = template.to_string();
        assert!(commands.validate().is_ok());
        assert_eq!(
            CommandSet::new(commands, BenchmarkConfig::default())
                .run_all_tests()
                .unwrap(),
            template
        );
    }

    #[test]
    fn test_adjacent_placeholders_and_expansions_mix() {
        let rendered = render_template(
            "cd ${D4J_HOME}/{project}{version} && echo $HOME",
            &[("project", "Math".to_string()), ("version", "1b".to_string())],
        )
        .unwrap();

        assert_eq!(rendered, "cd ${D4J_HOME}/Math1b && echo $HOME");
    }
}
