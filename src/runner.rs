use crate::config::ActionConfig;
use anyhow::{Context, Result};
use std::fmt;
use std::path::PathBuf;
use std::process::Command;

/// Package runner used to launch both svelte-check and the SvelteKit sync helper.
pub const PACKAGE_RUNNER: &str = if cfg!(windows) { "npx.cmd" } else { "npx" };

/// Name of the analysis tool as the package runner knows it.
pub const SVELTE_CHECK: &str = "svelte-check";

/// A subprocess to run: program, arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl CommandSpec {
    /// `npx svelte-check [--tsconfig <path>]` in the configured working directory.
    pub fn svelte_check(config: &ActionConfig) -> Self {
        let mut args = vec![SVELTE_CHECK.to_string()];
        if let Some(tsconfig) = &config.tsconfig {
            args.push("--tsconfig".to_string());
            args.push(tsconfig.to_string_lossy().into_owned());
        }
        Self {
            program: PACKAGE_RUNNER.to_string(),
            args,
            cwd: config.working_directory.clone(),
        }
    }

    /// `npx svelte-kit sync`, which generates the `.svelte-kit` types svelte-check relies on.
    pub fn svelte_kit_sync(config: &ActionConfig) -> Self {
        Self {
            program: PACKAGE_RUNNER.to_string(),
            args: vec!["svelte-kit".to_string(), "sync".to_string()],
            cwd: config.working_directory.clone(),
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Fully captured result of a finished subprocess.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Stdout followed by stderr, with a line break between them so the last
    /// stdout line and the first stderr line never merge.
    pub fn combined(&self) -> String {
        let mut text = String::with_capacity(self.stdout.len() + self.stderr.len() + 1);
        text.push_str(&self.stdout);
        if !self.stdout.is_empty() && !self.stdout.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&self.stderr);
        text
    }

    /// Human-readable exit code for log lines.
    pub fn code_label(&self) -> String {
        match self.code {
            Some(code) => code.to_string(),
            None => "signal".to_string(),
        }
    }
}

/// Executes subprocesses for the pipeline.
///
/// A non-zero exit is reported through [`CommandOutput::code`], only a failure
/// to run the program at all is an error.
pub trait CommandRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput>;
}

/// Runs commands as real child processes and waits for them to finish.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        log::debug!("running `{}` in {}", spec, spec.cwd.display());

        let output = Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(&spec.cwd)
            .output()
            .with_context(|| {
                format!(
                    "failed to run `{}` in {}",
                    spec.program,
                    spec.cwd.display()
                )
            })?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
