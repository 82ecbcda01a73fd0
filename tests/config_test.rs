// Unit tests for input resolution
// Tests defaults, boolean coercion and the INPUT_* variable naming

use std::collections::HashMap;
use std::path::PathBuf;
use svelte_check_action::config::{input_env_var, ActionConfig};

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| map.get(name).cloned()
}

#[test]
fn test_defaults_when_inputs_absent() {
    let config = ActionConfig::from_lookup(|_| None);

    assert_eq!(config.working_directory, PathBuf::from("."));
    assert!(!config.fail_on_warnings);
    assert!(!config.fail_on_hints);
    assert_eq!(config.tsconfig, None);
    assert_eq!(config, ActionConfig::default());
}

#[test]
fn test_blank_inputs_fall_back_to_defaults() {
    let config = ActionConfig::from_lookup(lookup_from(&[
        ("working-directory", "  "),
        ("fail-on-warnings", ""),
        ("tsconfig", ""),
    ]));

    assert_eq!(config.working_directory, PathBuf::from("."));
    assert!(!config.fail_on_warnings);
    assert_eq!(config.tsconfig, None);
}

#[test]
fn test_all_inputs_set() {
    let config = ActionConfig::from_lookup(lookup_from(&[
        ("working-directory", "./web "),
        ("fail-on-warnings", "true"),
        ("fail-on-hints", "TRUE"),
        ("tsconfig", "tsconfig.check.json"),
    ]));

    assert_eq!(config.working_directory, PathBuf::from("./web"));
    assert!(config.fail_on_warnings);
    assert!(config.fail_on_hints);
    assert_eq!(config.tsconfig, Some(PathBuf::from("tsconfig.check.json")));
}

#[test]
fn test_unrecognised_booleans_are_false() {
    let config = ActionConfig::from_lookup(lookup_from(&[
        ("fail-on-warnings", "sure"),
        ("fail-on-hints", "false"),
    ]));

    assert!(!config.fail_on_warnings);
    assert!(!config.fail_on_hints);
}

#[test]
fn test_input_env_var_names() {
    assert_eq!(input_env_var("working-directory"), "INPUT_WORKING-DIRECTORY");
    assert_eq!(input_env_var("tsconfig"), "INPUT_TSCONFIG");
    assert_eq!(input_env_var("some input"), "INPUT_SOME_INPUT");
}

#[test]
fn test_from_env_reads_runner_variables() {
    std::env::set_var("INPUT_WORKING-DIRECTORY", "packages/site");
    std::env::set_var("INPUT_FAIL-ON-WARNINGS", "true");
    std::env::set_var("INPUT_FAIL-ON-HINTS", "false");
    std::env::set_var("INPUT_TSCONFIG", "");

    let config = ActionConfig::from_env();

    std::env::remove_var("INPUT_WORKING-DIRECTORY");
    std::env::remove_var("INPUT_FAIL-ON-WARNINGS");
    std::env::remove_var("INPUT_FAIL-ON-HINTS");
    std::env::remove_var("INPUT_TSCONFIG");

    assert_eq!(config.working_directory, PathBuf::from("packages/site"));
    assert!(config.fail_on_warnings);
    assert!(!config.fail_on_hints);
    assert_eq!(config.tsconfig, None);
}
