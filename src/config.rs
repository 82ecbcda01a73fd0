use crate::utils::parse_bool_input;
use std::path::PathBuf;

/// Input holding the directory svelte-check runs in.
pub const INPUT_WORKING_DIRECTORY: &str = "working-directory";
/// Input that turns warnings into a failing result.
pub const INPUT_FAIL_ON_WARNINGS: &str = "fail-on-warnings";
/// Input that turns hints into a failing result.
pub const INPUT_FAIL_ON_HINTS: &str = "fail-on-hints";
/// Input with an optional path passed through as `--tsconfig`.
pub const INPUT_TSCONFIG: &str = "tsconfig";

/// Configuration for a single run of the action.
///
/// Built once at the boundary (environment or CLI) and passed into the pipeline,
/// nothing downstream reads the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionConfig {
    /// Directory svelte-check runs in. Finding paths are resolved against it.
    pub working_directory: PathBuf,
    /// Fail the run when at least one warning is reported.
    pub fail_on_warnings: bool,
    /// Fail the run when at least one hint is reported.
    pub fail_on_hints: bool,
    /// Optional tsconfig path forwarded to svelte-check.
    pub tsconfig: Option<PathBuf>,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            working_directory: PathBuf::from("."),
            fail_on_warnings: false,
            fail_on_hints: false,
            tsconfig: None,
        }
    }
}

impl ActionConfig {
    /// Resolves the configuration through a named-input lookup.
    ///
    /// Values are trimmed and empty values count as absent, so an input the
    /// workflow declares but leaves blank falls back to its default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let input = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        Self {
            working_directory: input(INPUT_WORKING_DIRECTORY)
                .map(PathBuf::from)
                .unwrap_or(defaults.working_directory),
            fail_on_warnings: input(INPUT_FAIL_ON_WARNINGS)
                .map(|v| parse_bool_input(&v))
                .unwrap_or(defaults.fail_on_warnings),
            fail_on_hints: input(INPUT_FAIL_ON_HINTS)
                .map(|v| parse_bool_input(&v))
                .unwrap_or(defaults.fail_on_hints),
            tsconfig: input(INPUT_TSCONFIG).map(PathBuf::from),
        }
    }

    /// Reads the action inputs from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(input_env_var(name)).ok())
    }
}

/// Name of the environment variable the Actions runner exports for an input.
///
/// `working-directory` becomes `INPUT_WORKING-DIRECTORY`: spaces turn into
/// underscores, hyphens are kept.
pub fn input_env_var(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}
