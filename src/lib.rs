// Lib file to expose modules for testing and external usage.
// The binary in main.rs is a thin adapter over `action::SvelteCheck`.

/// Module containing the pipeline entry point.
/// This wires configuration, the subprocesses, parsing and reporting together.
pub mod action;

/// Module resolving the action inputs into an `ActionConfig`.
pub mod config;

/// Module parsing svelte-check output into classified findings.
pub mod diagnostics;

/// Module detecting SvelteKit projects and running `svelte-kit sync`.
pub mod framework;

/// Module implementing the host adapters (GitHub Actions, local console).
pub mod host;

/// Module counting findings, publishing outputs and deciding pass/fail.
pub mod report;

/// Module building and executing subprocesses.
pub mod runner;

/// Module containing test utilities.
/// Scripted command runner and recording host used by the integration tests.
pub mod test_utils;

/// Module containing utility functions.
/// ANSI stripping, workflow-command escaping and boolean input coercion.
pub mod utils;
