use regex::Regex;
use std::borrow::Cow;

lazy_static::lazy_static! {
    /// Matches ANSI escape sequences: CSI (colors, cursor movement) and OSC (hyperlinks, titles).
    /// svelte-check colors its human output when it thinks it is attached to a terminal.
    static ref ANSI_RE: Regex =
        Regex::new(r"\x1b\[[0-?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)").unwrap();
}

/// Removes ANSI escape sequences from tool output.
///
/// Returns the input unchanged (borrowed) when there is nothing to strip.
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    ANSI_RE.replace_all(text, "")
}

/// Escapes the message part of a workflow command.
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escapes a `key=value` property of a workflow command.
///
/// Properties are comma separated and end at `::`, so both characters are encoded too.
pub fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

/// Coerces a boolean-like input string.
///
/// Anything that is not recognisably "true" counts as false, including an empty value.
pub fn parse_bool_input(value: &str) -> bool {
    matches!(value.trim(), "true" | "True" | "TRUE" | "1" | "yes")
}
