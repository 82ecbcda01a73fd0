use crate::utils::strip_ansi;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

lazy_static::lazy_static! {
    /// A locator line: `src/App.svelte:3:10`, nothing else on the line.
    static ref LOCATOR_RE: Regex =
        Regex::new(r"^\s*(?P<path>\S.*?):(?P<line>\d+):(?P<column>\d+)\s*$").unwrap();

    /// A severity line: `Error: Type mismatch (ts)`.
    /// The trailing parenthesised source tag is matched separately so it never ends up in the message.
    /// A tag is whitespace separated and non-empty, so a message ending in `init()` stays intact.
    static ref SEVERITY_RE: Regex = Regex::new(
        r"^\s*(?P<severity>Error|Warning|Warn|Hint):\s*(?P<message>.+?)(?:\s+\([^()]+\))?\s*$"
    )
    .unwrap();
}

/// Severity of a finding, ordered by blocking precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Always fails the run.
    Error,
    /// Fails the run only with `fail-on-warnings`.
    Warning,
    /// Fails the run only with `fail-on-hints`.
    Hint,
}

impl Severity {
    /// Maps a keyword from svelte-check output to a severity.
    ///
    /// `Warn` is an alias of `Warning`. Matching is case-sensitive.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "Error" => Some(Severity::Error),
            "Warning" | "Warn" => Some(Severity::Warning),
            "Hint" => Some(Severity::Hint),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Hint => "hint",
        };
        f.write_str(name)
    }
}

/// One diagnostic extracted from svelte-check output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Classified severity.
    pub severity: Severity,
    /// Message text without the trailing source tag.
    pub message: String,
    /// File path joined onto the working directory.
    pub file: PathBuf,
    /// 1-indexed line number.
    pub line: u32,
    /// 1-indexed column number.
    pub column: u32,
}

/// Parses svelte-check output into findings, in the order they appear.
///
/// The output is scanned for two-line stanzas:
///
/// ```text
/// src/App.svelte:3:10
///   Error: Type mismatch (ts)
/// ```
///
/// A locator line that is not immediately followed by a severity line is skipped
/// without producing a finding. Scanning continues with the line after it, so a
/// locator directly followed by another locator still lets the second one pair up.
pub fn parse_findings(output: &str, working_directory: &Path) -> Vec<Finding> {
    let clean = strip_ansi(output);
    let lines: Vec<&str> = clean.lines().collect();
    let mut findings = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let Some(locator) = LOCATOR_RE.captures(lines[i]) else {
            i += 1;
            continue;
        };

        let finding = lines
            .get(i + 1)
            .and_then(|next| SEVERITY_RE.captures(next))
            .and_then(|caps| {
                let severity = Severity::from_keyword(&caps["severity"])?;
                Some(Finding {
                    severity,
                    message: caps["message"].trim().to_string(),
                    file: working_directory.join(&locator["path"]),
                    line: parse_position(&locator["line"]),
                    column: parse_position(&locator["column"]),
                })
            });

        match finding {
            Some(finding) => {
                findings.push(finding);
                // The severity line belongs to this stanza.
                i += 2;
            }
            None => {
                log::debug!("locator without severity line skipped: {}", lines[i].trim());
                i += 1;
            }
        }
    }

    findings
}

/// Line and column numbers fall back to 1 when they do not fit.
fn parse_position(raw: &str) -> u32 {
    raw.parse().unwrap_or(1)
}
