use crate::config::ActionConfig;
use crate::diagnostics::{Finding, Severity};
use crate::host::{AnnotationLevel, Host, Location};
use crate::runner::CommandOutput;
use anyhow::Result;
use serde::Serialize;
use std::fmt;

/// Output name carrying the error count.
pub const OUTPUT_ERRORS: &str = "errors";
/// Output name carrying the warning count.
pub const OUTPUT_WARNINGS: &str = "warnings";
/// Output name carrying the hint count.
pub const OUTPUT_HINTS: &str = "hints";

/// Failure message used when findings trip the policy.
pub const FOUND_ISSUES: &str = "Svelte check found issues";

/// Per-severity finding counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
    pub hints: usize,
}

impl Summary {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut summary = Self::default();
        for finding in findings {
            match finding.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
                Severity::Hint => summary.hints += 1,
            }
        }
        summary
    }
}

/// Why a run failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    /// Any error fails the run.
    Errors { count: usize },
    /// Warnings with `fail-on-warnings` enabled.
    Warnings { count: usize },
    /// Hints with `fail-on-hints` enabled.
    Hints { count: usize },
    /// svelte-check exited non-zero with stderr but reported nothing structured.
    ToolFailure { code: Option<i32>, stderr: String },
    /// The pipeline itself failed, e.g. svelte-check could not be spawned.
    Aborted { message: String },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Errors { count } => write!(f, "Found {} errors", count),
            FailureReason::Warnings { count } => {
                write!(f, "Found {} warnings (fail-on-warnings is enabled)", count)
            }
            FailureReason::Hints { count } => {
                write!(f, "Found {} hints (fail-on-hints is enabled)", count)
            }
            FailureReason::ToolFailure { code, .. } => match code {
                Some(code) => write!(f, "svelte-check exited with code {}", code),
                None => write!(f, "svelte-check was terminated by a signal"),
            },
            FailureReason::Aborted { message } => write!(f, "Action failed: {}", message),
        }
    }
}

/// Overall result of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reasons", rename_all = "snake_case")]
pub enum Verdict {
    Passed,
    Failed(Vec<FailureReason>),
}

impl Verdict {
    pub fn is_failed(&self) -> bool {
        matches!(self, Verdict::Failed(_))
    }
}

/// Applies the failure policy to the counts and the raw tool result.
///
/// Every severity that trips the policy is listed, errors first. The stderr
/// fallback only applies when no finding failed the run.
pub fn decide(summary: &Summary, config: &ActionConfig, output: &CommandOutput) -> Verdict {
    let mut reasons = Vec::new();

    if summary.errors > 0 {
        reasons.push(FailureReason::Errors {
            count: summary.errors,
        });
    }
    if config.fail_on_warnings && summary.warnings > 0 {
        reasons.push(FailureReason::Warnings {
            count: summary.warnings,
        });
    }
    if config.fail_on_hints && summary.hints > 0 {
        reasons.push(FailureReason::Hints {
            count: summary.hints,
        });
    }

    if reasons.is_empty() && !output.success() && !output.stderr.trim().is_empty() {
        reasons.push(FailureReason::ToolFailure {
            code: output.code,
            stderr: output.stderr.trim().to_string(),
        });
    }

    if reasons.is_empty() {
        Verdict::Passed
    } else {
        Verdict::Failed(reasons)
    }
}

/// Host annotation level for a severity.
pub fn annotation_level(severity: Severity) -> AnnotationLevel {
    match severity {
        Severity::Error => AnnotationLevel::Error,
        Severity::Warning => AnnotationLevel::Warning,
        Severity::Hint => AnnotationLevel::Notice,
    }
}

/// Emits one annotation per finding, in output order.
pub fn annotate_findings(host: &mut dyn Host, findings: &[Finding]) {
    for finding in findings {
        let location = Location {
            file: finding.file.clone(),
            line: finding.line,
            column: finding.column,
        };
        host.annotate(
            annotation_level(finding.severity),
            &finding.message,
            Some(&location),
        );
    }
}

/// Publishes the three count outputs and logs the results block.
pub fn publish_summary(host: &mut dyn Host, summary: &Summary) -> Result<()> {
    host.set_output(OUTPUT_ERRORS, &summary.errors.to_string())?;
    host.set_output(OUTPUT_WARNINGS, &summary.warnings.to_string())?;
    host.set_output(OUTPUT_HINTS, &summary.hints.to_string())?;

    host.info("Svelte Check Results:");
    host.info(&format!("  Errors: {}", summary.errors));
    host.info(&format!("  Warnings: {}", summary.warnings));
    host.info(&format!("  Hints: {}", summary.hints));
    Ok(())
}

/// Reports a verdict: one error line per tripped severity, then the failure or success message.
pub fn publish_verdict(host: &mut dyn Host, verdict: &Verdict) {
    let reasons = match verdict {
        Verdict::Passed => {
            host.info("Svelte check completed successfully");
            return;
        }
        Verdict::Failed(reasons) => reasons,
    };

    let mut failure = FOUND_ISSUES.to_string();
    for reason in reasons {
        match reason {
            // The raw stderr is the one error-level report for an unstructured failure.
            FailureReason::ToolFailure { stderr, .. } => failure = stderr.clone(),
            FailureReason::Aborted { .. } => failure = reason.to_string(),
            _ => host.annotate(AnnotationLevel::Error, &reason.to_string(), None),
        }
    }
    host.set_failed(&failure);
}
