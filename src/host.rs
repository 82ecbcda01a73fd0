use crate::utils::{escape_data, escape_property};
use anyhow::{Context, Result};
use colored::*;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Location of the problem matcher descriptor, relative to the action root.
pub const MATCHER_FILE: &str = ".github/svelte-check-matcher.json";

/// Level of a host annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationLevel {
    Error,
    Warning,
    Notice,
}

impl AnnotationLevel {
    /// Workflow command name for this level.
    pub fn command(&self) -> &'static str {
        match self {
            AnnotationLevel::Error => "error",
            AnnotationLevel::Warning => "warning",
            AnnotationLevel::Notice => "notice",
        }
    }
}

/// Source position an annotation points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: PathBuf,
    pub line: u32,
    pub column: u32,
}

/// The automation platform the action reports to.
///
/// Everything user-visible goes through this trait, so the pipeline never
/// prints or touches the environment directly.
pub trait Host {
    /// Plain log line.
    fn info(&mut self, message: &str);
    /// Log line only shown when step debugging is enabled.
    fn debug(&mut self, message: &str);
    /// Annotation, optionally attached to a file position.
    fn annotate(&mut self, level: AnnotationLevel, message: &str, location: Option<&Location>);
    /// Publishes a named output value.
    fn set_output(&mut self, name: &str, value: &str) -> Result<()>;
    /// Registers the problem matcher descriptor at `path`.
    fn add_matcher(&mut self, path: &Path);
    /// Marks the run failed.
    fn set_failed(&mut self, message: &str);
    /// Whether `set_failed` has been called. The binary's exit status follows this.
    fn failed(&self) -> bool;
    /// Echoes raw tool output into the log, where the problem matcher reads it.
    fn tool_output(&mut self, text: &str);
}

/// Resolves where the problem matcher descriptor is shipped.
///
/// Inside a workflow the runner exports `GITHUB_ACTION_PATH` for the checked-out
/// action. Outside of one the descriptor next to this crate's manifest is used.
pub fn matcher_path() -> PathBuf {
    let root = std::env::var_os("GITHUB_ACTION_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")));
    root.join(MATCHER_FILE)
}

/// Formats a workflow command line such as `::error file=a,line=1::msg`.
pub fn workflow_command(command: &str, properties: &[(&str, String)], message: &str) -> String {
    let mut line = format!("::{}", command);
    if !properties.is_empty() {
        let props: Vec<String> = properties
            .iter()
            .map(|(key, value)| format!("{}={}", key, escape_property(value)))
            .collect();
        line.push(' ');
        line.push_str(&props.join(","));
    }
    line.push_str("::");
    line.push_str(&escape_data(message));
    line
}

fn location_properties(location: Option<&Location>) -> Vec<(&'static str, String)> {
    match location {
        Some(loc) => vec![
            ("file", loc.file.to_string_lossy().into_owned()),
            ("line", loc.line.to_string()),
            ("col", loc.column.to_string()),
        ],
        None => Vec::new(),
    }
}

/// Host adapter speaking the GitHub Actions workflow-command protocol.
pub struct GithubActionsHost<W: Write> {
    out: W,
    /// File the runner collects step outputs from (`GITHUB_OUTPUT`).
    output_file: Option<PathBuf>,
    failed: bool,
}

impl GithubActionsHost<io::Stdout> {
    /// Writes to stdout and picks up `GITHUB_OUTPUT` from the environment.
    pub fn from_env() -> Self {
        let output_file = std::env::var_os("GITHUB_OUTPUT")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::new(io::stdout(), output_file)
    }
}

impl<W: Write> GithubActionsHost<W> {
    pub fn new(out: W, output_file: Option<PathBuf>) -> Self {
        Self {
            out,
            output_file,
            failed: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: &str) {
        // Nothing sensible can be reported if the log stream itself is gone.
        let _ = writeln!(self.out, "{}", line);
    }
}

impl<W: Write> Host for GithubActionsHost<W> {
    fn info(&mut self, message: &str) {
        self.emit(message);
    }

    fn debug(&mut self, message: &str) {
        let line = workflow_command("debug", &[], message);
        self.emit(&line);
    }

    fn annotate(&mut self, level: AnnotationLevel, message: &str, location: Option<&Location>) {
        let line = workflow_command(level.command(), &location_properties(location), message);
        self.emit(&line);
    }

    fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
        match &self.output_file {
            Some(path) => {
                let mut file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("failed to open output file {}", path.display()))?;
                writeln!(file, "{}={}", name, value)
                    .with_context(|| format!("failed to write output `{}`", name))?;
            }
            None => {
                let line = workflow_command("set-output", &[("name", name.to_string())], value);
                self.emit(&line);
            }
        }
        Ok(())
    }

    fn add_matcher(&mut self, path: &Path) {
        self.emit(&format!("Adding problem matcher: {}", path.display()));
        let line = workflow_command("add-matcher", &[], &path.to_string_lossy());
        self.emit(&line);
    }

    fn set_failed(&mut self, message: &str) {
        self.failed = true;
        self.annotate(AnnotationLevel::Error, message, None);
    }

    fn failed(&self) -> bool {
        self.failed
    }

    fn tool_output(&mut self, text: &str) {
        // Verbatim: the registered problem matcher runs over these lines.
        let _ = self.out.write_all(text.as_bytes());
        if !text.is_empty() && !text.ends_with('\n') {
            self.emit("");
        }
    }
}

/// Host adapter for running outside of a workflow: colored, human-readable lines.
pub struct ConsoleHost<W: Write> {
    out: W,
    failed: bool,
}

impl ConsoleHost<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleHost<W> {
    pub fn new(out: W) -> Self {
        Self { out, failed: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: &str) {
        let _ = writeln!(self.out, "{}", line);
    }
}

impl<W: Write> Host for ConsoleHost<W> {
    fn info(&mut self, message: &str) {
        self.emit(message);
    }

    fn debug(&mut self, message: &str) {
        log::debug!("{}", message);
    }

    fn annotate(&mut self, level: AnnotationLevel, message: &str, location: Option<&Location>) {
        let label = match level {
            AnnotationLevel::Error => "error".red().bold(),
            AnnotationLevel::Warning => "warning".yellow().bold(),
            AnnotationLevel::Notice => "hint".cyan().bold(),
        };
        let line = match location {
            Some(loc) => format!(
                "{}: {}\n    └─ {}:{}:{}",
                label,
                message,
                loc.file.display(),
                loc.line,
                loc.column
            ),
            None => format!("{}: {}", label, message),
        };
        self.emit(&line);
    }

    fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
        let line = format!("{} = {}", name.dimmed(), value);
        self.emit(&line);
        Ok(())
    }

    fn add_matcher(&mut self, path: &Path) {
        // Problem matchers only mean something to a workflow runner.
        log::debug!("skipping problem matcher {}", path.display());
    }

    fn set_failed(&mut self, message: &str) {
        self.failed = true;
        let line = format!("{} {}", "✗".red().bold(), message.red());
        self.emit(&line);
    }

    fn failed(&self) -> bool {
        self.failed
    }

    fn tool_output(&mut self, text: &str) {
        for line in text.lines() {
            let line = format!("  {}", line.dimmed());
            self.emit(&line);
        }
    }
}
