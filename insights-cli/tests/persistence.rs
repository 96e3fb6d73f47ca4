//! Integration tests for value resolution and persistence across runs.
//!
//! Values come from flags, environment aliases and the config file, and the
//! resolved values are written back once a command succeeds.

mod common;

use common::TestEnv;
use predicates::prelude::*;

// ============================================================================
// Resolution sources
// ============================================================================

#[test]
fn test_config_file_satisfies_required_option() {
    let env = TestEnv::new();
    env.write_config(r#"{"dagName": "etl"}"#);

    // dagName comes from the file, so the run gets past the required check.
    env.command().args(["dag", "deploy"]).assert().code(3);
}

#[test]
fn test_env_alias_satisfies_required_option() {
    let env = TestEnv::new();

    env.command()
        .env("DAG_NAME", "etl")
        .args(["dag", "deploy"])
        .assert()
        .code(3);
}

#[test]
fn test_empty_env_alias_is_absent() {
    let env = TestEnv::new();

    env.command()
        .env("DAG_NAME", "")
        .args(["dag", "deploy"])
        .assert()
        .code(2);
}

#[test]
fn test_config_path_from_env() {
    let env = TestEnv::new();
    env.write_config(r#"{"dagName": "etl"}"#);

    env.command_bare()
        .env("CONFIG", &env.config_path)
        .args(["dag", "deploy"])
        .assert()
        .code(3);
}

// ============================================================================
// Interactive prompting
// ============================================================================

#[test]
fn test_interactive_prompts_for_missing_value() {
    let env = TestEnv::new();

    env.command()
        .args(["-i", "dag", "deploy"])
        .write_stdin("etl\n")
        .assert()
        .code(3)
        .stdout(predicate::str::contains("Enter dagName: "));
}

#[test]
fn test_interactive_empty_answer_is_missing() {
    let env = TestEnv::new();

    env.command()
        .args(["--interactive", "dag", "deploy"])
        .write_stdin("\n")
        .assert()
        .code(2);
}

// ============================================================================
// Delete confirmation and persistence
// ============================================================================

#[test]
fn test_declined_delete_persists_values() {
    let env = TestEnv::new();
    env.write_credentials();

    env.command()
        .args(["dag", "delete", "--dagName", "etl"])
        .write_stdin("no\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Really delete the DAG 'etl'? "));

    let config = env.read_config();
    assert_eq!(config["dagName"], "etl");
    // Credentials written before the run survive the merge.
    assert_eq!(config["ClientID"], "app");
}

#[test]
fn test_confirmation_gives_up_after_bad_answers() {
    let env = TestEnv::new();
    env.write_credentials();

    env.command()
        .args(["dag", "delete", "--dagName", "etl"])
        .write_stdin("maybe\nperhaps\nsure\n")
        .assert()
        .code(4)
        .stdout(predicate::str::contains("Please type yes or no"));
}

#[test]
fn test_failed_command_does_not_persist() {
    let env = TestEnv::new();
    env.write_credentials();

    // The service is unreachable, so the delete fails after confirmation.
    env.command()
        .args(["dag", "delete", "--dagName", "etl"])
        .write_stdin("yes\n")
        .assert()
        .failure();

    let config = env.read_config();
    assert!(config.get("dagName").is_none());
}
