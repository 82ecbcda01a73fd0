use crate::config::ActionConfig;
use crate::diagnostics::{parse_findings, Finding};
use crate::framework::presync;
use crate::host::{matcher_path, Host};
use crate::report::{
    annotate_findings, decide, publish_summary, publish_verdict, FailureReason, Summary, Verdict,
};
use crate::runner::{CommandRunner, CommandSpec};
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

/// What svelte-check reported, once parsed.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    /// Findings in the order they appeared in the output.
    pub findings: Vec<Finding>,
    /// Per-severity counts.
    pub summary: Summary,
    /// svelte-check exit code, informational only.
    pub exit_code: Option<i32>,
}

/// Result of one run of the action.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub verdict: Verdict,
    /// Missing when the pipeline aborted before svelte-check produced output.
    pub report: Option<CheckReport>,
}

/// The svelte-check action.
///
/// Configuration lives here. The subprocess runner and the host are passed to
/// [`SvelteCheck::run`] so tests can swap both out.
pub struct SvelteCheck {
    pub config: ActionConfig,
    /// Problem matcher descriptor registered with the host before the check.
    pub matcher: PathBuf,
}

impl SvelteCheck {
    /// Creates the action with the shipped problem matcher.
    pub fn new(config: ActionConfig) -> Self {
        Self {
            config,
            matcher: matcher_path(),
        }
    }

    /// Overrides the problem matcher location.
    pub fn with_matcher(mut self, matcher: PathBuf) -> Self {
        self.matcher = matcher;
        self
    }

    /// Runs the whole pipeline and reports the verdict to `host`.
    ///
    /// Never returns an error: anything that goes wrong is reported through
    /// `host.set_failed` as "Action failed: ..." and comes back as a failed verdict.
    pub fn run(&self, runner: &dyn CommandRunner, host: &mut dyn Host) -> RunOutcome {
        match self.execute(runner, host) {
            Ok(outcome) => outcome,
            Err(err) => {
                log::debug!("pipeline aborted: {:?}", err);
                let verdict = Verdict::Failed(vec![FailureReason::Aborted {
                    message: format!("{:#}", err),
                }]);
                publish_verdict(host, &verdict);
                RunOutcome {
                    verdict,
                    report: None,
                }
            }
        }
    }

    fn execute(&self, runner: &dyn CommandRunner, host: &mut dyn Host) -> Result<RunOutcome> {
        host.add_matcher(&self.matcher);

        // SvelteKit projects need their generated types before the check.
        presync(&self.config, runner, host);

        let spec = CommandSpec::svelte_check(&self.config);
        host.info(&format!("Running {}", spec));
        let output = runner.run(&spec)?;
        let text = output.combined();
        host.tool_output(&text);
        host.info(&format!("svelte-check exit code: {}", output.code_label()));

        let findings = parse_findings(&text, &self.config.working_directory);
        annotate_findings(host, &findings);

        let summary = Summary::from_findings(&findings);
        publish_summary(host, &summary)?;

        let verdict = decide(&summary, &self.config, &output);
        publish_verdict(host, &verdict);

        Ok(RunOutcome {
            verdict,
            report: Some(CheckReport {
                findings,
                summary,
                exit_code: output.code,
            }),
        })
    }
}
