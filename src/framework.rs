use crate::config::ActionConfig;
use crate::host::{AnnotationLevel, Host};
use crate::runner::{CommandRunner, CommandSpec};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Manifest file inspected for framework dependencies.
pub const MANIFEST_FILE: &str = "package.json";

/// Dependency that marks a SvelteKit project.
///
/// SvelteKit generates `./.svelte-kit/tsconfig.json` and the route types on
/// sync, and svelte-check reports bogus errors without them.
pub const SVELTEKIT_DEPENDENCY: &str = "@sveltejs/kit";

/// The parts of `package.json` that can declare a dependency.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    #[serde(default)]
    pub dependencies: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub dev_dependencies: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub peer_dependencies: HashMap<String, serde_json::Value>,
}

impl PackageManifest {
    /// Reads and parses the manifest in `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE);
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Whether any dependency section declares `name`.
    pub fn declares(&self, name: &str) -> bool {
        self.dependencies.contains_key(name)
            || self.dev_dependencies.contains_key(name)
            || self.peer_dependencies.contains_key(name)
    }
}

/// Detects a SvelteKit project in `dir`.
///
/// A missing or malformed manifest counts as "not SvelteKit".
pub fn uses_sveltekit(dir: &Path) -> bool {
    match PackageManifest::load(dir) {
        Ok(manifest) => manifest.declares(SVELTEKIT_DEPENDENCY),
        Err(err) => {
            log::debug!("framework detection skipped: {:#}", err);
            false
        }
    }
}

/// Runs `svelte-kit sync` ahead of the check when the project uses SvelteKit.
///
/// Never fails the run: spawn errors and non-zero exits become warnings.
/// Returns whether the sync step was attempted.
pub fn presync(config: &ActionConfig, runner: &dyn CommandRunner, host: &mut dyn Host) -> bool {
    if !uses_sveltekit(&config.working_directory) {
        return false;
    }

    let spec = CommandSpec::svelte_kit_sync(config);
    host.info(&format!("SvelteKit detected, running {}", spec));

    match runner.run(&spec) {
        Ok(output) if output.success() => {
            host.debug("svelte-kit sync completed");
        }
        Ok(output) => {
            let detail = output.stderr.trim();
            let message = if detail.is_empty() {
                format!("svelte-kit sync exited with code {}", output.code_label())
            } else {
                format!(
                    "svelte-kit sync exited with code {}: {}",
                    output.code_label(),
                    detail
                )
            };
            host.annotate(AnnotationLevel::Warning, &message, None);
        }
        Err(err) => {
            host.annotate(
                AnnotationLevel::Warning,
                &format!("svelte-kit sync failed: {:#}", err),
                None,
            );
        }
    }
    true
}
