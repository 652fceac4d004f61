//! @ai:module:intent Configuration structs for batch patch verification
//! @ai:module:layer infrastructure
//! @ai:module:public_api VerifierConfig, BenchmarkConfig, PathConfig, CommandConfig
//! @ai:module:stateless true

use crate::error::VerifierError;
use crate::templates::placeholders;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// @ai:intent Main configuration for a verification batch
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifierConfig {
    #[serde(default)]
    pub benchmark: BenchmarkConfig,
    #[serde(default)]
    pub paths: PathConfig,
    #[serde(default)]
    pub commands: CommandConfig,
}

/// @ai:intent Benchmark project/version the pristine checkout comes from
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    #[serde(default = "default_project")]
    pub project: String,
    #[serde(default = "default_version")]
    pub version: String,
}

/// @ai:intent Input and output locations
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    #[serde(default = "default_patches_dir")]
    pub patches_dir: PathBuf,
    #[serde(default = "default_project_dir")]
    pub project_dir: PathBuf,
    #[serde(default = "default_results_file")]
    pub results_file: PathBuf,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    /// JSON and Markdown summaries are written here when set.
    #[serde(default)]
    pub report_dir: Option<PathBuf>,
}

/// @ai:intent Shell command templates for every external tool the pipeline drives
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandConfig {
    #[serde(default = "default_discard_changes")]
    pub discard_changes: String,
    #[serde(default = "default_remove_untracked")]
    pub remove_untracked: String,
    #[serde(default = "default_checkout")]
    pub checkout: String,
    #[serde(default = "default_export_trigger_tests")]
    pub export_trigger_tests: String,
    #[serde(default = "default_compile")]
    pub compile: String,
    #[serde(default = "default_run_test")]
    pub run_test: String,
    #[serde(default = "default_run_all_tests")]
    pub run_all_tests: String,
    #[serde(default = "default_apply_patch")]
    pub apply_patch: String,
    /// Extra environment for every command.
    #[serde(default = "default_env")]
    pub env: BTreeMap<String, String>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            project: default_project(),
            version: default_version(),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            patches_dir: default_patches_dir(),
            project_dir: default_project_dir(),
            results_file: default_results_file(),
            log_file: default_log_file(),
            report_dir: None,
        }
    }
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            discard_changes: default_discard_changes(),
            remove_untracked: default_remove_untracked(),
            checkout: default_checkout(),
            export_trigger_tests: default_export_trigger_tests(),
            compile: default_compile(),
            run_test: default_run_test(),
            run_all_tests: default_run_all_tests(),
            apply_patch: default_apply_patch(),
            env: default_env(),
        }
    }
}

fn default_project() -> String {
    "Math".to_string()
}

fn default_version() -> String {
    "1b".to_string()
}

fn default_patches_dir() -> PathBuf {
    PathBuf::from("patches")
}

fn default_project_dir() -> PathBuf {
    PathBuf::from("project")
}

fn default_results_file() -> PathBuf {
    PathBuf::from("patch_verification_results.csv")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("batch_verify.log")
}

fn default_discard_changes() -> String {
    "git checkout .".to_string()
}

fn default_remove_untracked() -> String {
    "git clean -fd".to_string()
}

fn default_checkout() -> String {
    "defects4j checkout -p {project} -v {version} -w .".to_string()
}

fn default_export_trigger_tests() -> String {
    "defects4j export -p tests.trigger".to_string()
}

fn default_compile() -> String {
    "defects4j compile".to_string()
}

fn default_run_test() -> String {
    "defects4j test -t {test}".to_string()
}

fn default_run_all_tests() -> String {
    "defects4j test".to_string()
}

fn default_apply_patch() -> String {
    "patch -p{strip} < {patch}".to_string()
}

fn default_env() -> BTreeMap<String, String> {
    BTreeMap::from([("TZ".to_string(), "America/Los_Angeles".to_string())])
}

/// Placeholders every template may use.
const COMMON_PLACEHOLDERS: &[&str] = &["project", "version"];
const NO_EXTRA: &[&str] = &[];
const RUN_TEST_EXTRA: &[&str] = &["test"];
const APPLY_PATCH_EXTRA: &[&str] = &["strip", "patch"];

impl CommandConfig {
    /// @ai:intent Pair each template with its name and the placeholders it may use
    /// @ai:effects pure
    pub fn templates(&self) -> Vec<(&'static str, &str, &'static [&'static str])> {
        vec![
            ("discard_changes", self.discard_changes.as_str(), NO_EXTRA),
            ("remove_untracked", self.remove_untracked.as_str(), NO_EXTRA),
            ("checkout", self.checkout.as_str(), NO_EXTRA),
            ("export_trigger_tests", self.export_trigger_tests.as_str(), NO_EXTRA),
            ("compile", self.compile.as_str(), NO_EXTRA),
            ("run_test", self.run_test.as_str(), RUN_TEST_EXTRA),
            ("run_all_tests", self.run_all_tests.as_str(), NO_EXTRA),
            ("apply_patch", self.apply_patch.as_str(), APPLY_PATCH_EXTRA),
        ]
    }

    /// @ai:intent Reject templates that reference placeholders they cannot be given
    /// @ai:effects pure
    pub fn validate(&self) -> Result<(), VerifierError> {
        for (_, template, extra) in self.templates() {
            for placeholder in placeholders(template) {
                let known = COMMON_PLACEHOLDERS.contains(&placeholder.as_str())
                    || extra.contains(&placeholder.as_str());

                if !known {
                    return Err(VerifierError::Template {
                        template: template.to_string(),
                        placeholder,
                    });
                }
            }
        }

        Ok(())
    }
}

impl VerifierConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// @ai:intent Validate the parts of the configuration that can be checked without I/O
    /// @ai:effects pure
    pub fn validate(&self) -> Result<(), VerifierError> {
        self.commands.validate()
    }
}
