// Unit tests for SvelteKit detection and the pre-sync step

use std::fs;
use svelte_check_action::config::ActionConfig;
use svelte_check_action::framework::{presync, uses_sveltekit, PackageManifest};
use svelte_check_action::host::AnnotationLevel;
use svelte_check_action::test_utils::{RecordingHost, ScriptedRunner};
use tempfile::tempdir;

fn config_for(dir: &std::path::Path) -> ActionConfig {
    ActionConfig {
        working_directory: dir.to_path_buf(),
        ..ActionConfig::default()
    }
}

#[test]
fn test_detects_kit_in_dev_dependencies() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{ "name": "app", "devDependencies": { "@sveltejs/kit": "^2.0.0", "svelte": "^4.0.0" } }"#,
    )
    .unwrap();

    assert!(uses_sveltekit(dir.path()));
}

#[test]
fn test_detects_kit_in_dependencies() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{ "dependencies": { "@sveltejs/kit": "2.5.0" } }"#,
    )
    .unwrap();

    assert!(uses_sveltekit(dir.path()));
}

#[test]
fn test_plain_svelte_project_is_not_kit() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{ "devDependencies": { "svelte": "^4.0.0", "svelte-check": "^3.6.0" } }"#,
    )
    .unwrap();

    assert!(!uses_sveltekit(dir.path()));
}

#[test]
fn test_missing_manifest_is_not_kit() {
    let dir = tempdir().unwrap();
    assert!(!uses_sveltekit(dir.path()));
}

#[test]
fn test_malformed_manifest_is_not_kit() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("package.json"), "{ not json").unwrap();

    assert!(!uses_sveltekit(dir.path()));
    assert!(PackageManifest::load(dir.path()).is_err());
}

#[test]
fn test_presync_skipped_without_kit() {
    let dir = tempdir().unwrap();
    let runner = ScriptedRunner::new();
    let mut host = RecordingHost::new();

    assert!(!presync(&config_for(dir.path()), &runner, &mut host));
    assert!(runner.calls().is_empty());
    assert!(host.events.is_empty());
}

#[test]
fn test_presync_runs_sync_in_working_directory() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{ "devDependencies": { "@sveltejs/kit": "^2.0.0" } }"#,
    )
    .unwrap();
    let runner = ScriptedRunner::new().with_output("svelte-kit", 0, "", "");
    let mut host = RecordingHost::new();

    assert!(presync(&config_for(dir.path()), &runner, &mut host));

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].args, vec!["svelte-kit", "sync"]);
    assert_eq!(calls[0].cwd, dir.path());
    assert!(host.annotations(AnnotationLevel::Warning).is_empty());
}

#[test]
fn test_presync_failure_is_a_warning() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{ "devDependencies": { "@sveltejs/kit": "^2.0.0" } }"#,
    )
    .unwrap();
    let runner = ScriptedRunner::new().with_output("svelte-kit", 1, "", "Cannot find module 'vite'");
    let mut host = RecordingHost::new();

    presync(&config_for(dir.path()), &runner, &mut host);

    let warnings = host.annotations(AnnotationLevel::Warning);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].0.contains("Cannot find module 'vite'"));
    assert!(host.failures().is_empty());
}

#[test]
fn test_presync_spawn_error_is_a_warning() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{ "devDependencies": { "@sveltejs/kit": "^2.0.0" } }"#,
    )
    .unwrap();
    let runner = ScriptedRunner::new().with_spawn_error("svelte-kit", "npx not found");
    let mut host = RecordingHost::new();

    presync(&config_for(dir.path()), &runner, &mut host);

    let warnings = host.annotations(AnnotationLevel::Warning);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].0.contains("npx not found"));
    assert!(host.failures().is_empty());
}
