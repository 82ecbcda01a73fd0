use crate::host::{AnnotationLevel, Host, Location};
use crate::runner::{CommandOutput, CommandRunner, CommandSpec};
use anyhow::{anyhow, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Canned behaviour for one tool.
#[derive(Debug, Clone)]
enum Script {
    Output(CommandOutput),
    SpawnError(String),
}

/// A [`CommandRunner`] that replays canned results instead of spawning processes.
///
/// Scripts are keyed by the tool the package runner launches (`svelte-check`,
/// `svelte-kit`), i.e. the first argument. Every call is recorded.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    scripts: HashMap<String, Script>,
    calls: RefCell<Vec<CommandSpec>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `tool` finish with the given exit code and streams.
    pub fn with_output(mut self, tool: &str, code: i32, stdout: &str, stderr: &str) -> Self {
        let output = CommandOutput {
            code: Some(code),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        };
        self.scripts.insert(tool.to_string(), Script::Output(output));
        self
    }

    /// Makes `tool` fail to start with `message`.
    pub fn with_spawn_error(mut self, tool: &str, message: &str) -> Self {
        self.scripts
            .insert(tool.to_string(), Script::SpawnError(message.to_string()));
        self
    }

    /// Commands run so far, in order.
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.borrow().clone()
    }

    /// Whether a command for `tool` was run.
    pub fn ran(&self, tool: &str) -> bool {
        self.calls
            .borrow()
            .iter()
            .any(|spec| spec.args.first().map(String::as_str) == Some(tool))
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        self.calls.borrow_mut().push(spec.clone());
        let tool = spec.args.first().cloned().unwrap_or_default();
        match self.scripts.get(&tool) {
            Some(Script::Output(output)) => Ok(output.clone()),
            Some(Script::SpawnError(message)) => Err(anyhow!("{}", message)),
            None => Err(anyhow!("no scripted result for `{}`", spec)),
        }
    }
}

/// A single call made on a [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Info(String),
    Debug(String),
    Annotation {
        level: AnnotationLevel,
        message: String,
        location: Option<Location>,
    },
    Output {
        name: String,
        value: String,
    },
    Matcher(PathBuf),
    Failed(String),
    ToolOutput(String),
}

/// A [`Host`] that records every call for later assertions.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub events: Vec<HostEvent>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value published for output `name`.
    pub fn output(&self, name: &str) -> Option<&str> {
        self.events.iter().rev().find_map(|event| match event {
            HostEvent::Output { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// Messages passed to `set_failed`.
    pub fn failures(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                HostEvent::Failed(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Annotations emitted at `level`, as (message, location) pairs.
    pub fn annotations(&self, level: AnnotationLevel) -> Vec<(&str, Option<&Location>)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                HostEvent::Annotation {
                    level: l,
                    message,
                    location,
                } if *l == level => Some((message.as_str(), location.as_ref())),
                _ => None,
            })
            .collect()
    }

    /// Raw tool output echoed to the log, concatenated.
    pub fn tool_output_text(&self) -> String {
        self.events
            .iter()
            .filter_map(|event| match event {
                HostEvent::ToolOutput(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Whether `message` was logged as an info line.
    pub fn logged(&self, message: &str) -> bool {
        self.events
            .iter()
            .any(|event| matches!(event, HostEvent::Info(m) if m == message))
    }
}

impl Host for RecordingHost {
    fn info(&mut self, message: &str) {
        self.events.push(HostEvent::Info(message.to_string()));
    }

    fn debug(&mut self, message: &str) {
        self.events.push(HostEvent::Debug(message.to_string()));
    }

    fn annotate(&mut self, level: AnnotationLevel, message: &str, location: Option<&Location>) {
        self.events.push(HostEvent::Annotation {
            level,
            message: message.to_string(),
            location: location.cloned(),
        });
    }

    fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
        self.events.push(HostEvent::Output {
            name: name.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn add_matcher(&mut self, path: &Path) {
        self.events.push(HostEvent::Matcher(path.to_path_buf()));
    }

    fn set_failed(&mut self, message: &str) {
        self.events.push(HostEvent::Failed(message.to_string()));
    }

    fn failed(&self) -> bool {
        self.events
            .iter()
            .any(|event| matches!(event, HostEvent::Failed(_)))
    }

    fn tool_output(&mut self, text: &str) {
        self.events.push(HostEvent::ToolOutput(text.to_string()));
    }
}
