//! End-to-end tests for the adx CLI.
//!
//! Tests invoke the `adx` binary as a subprocess with a controlled
//! environment.

use std::process::Command;

fn adx() -> Command {
    Command::new(env!("CARGO_BIN_EXE_adx"))
}

#[test]
fn e2e_no_subcommand_prints_version_and_help_hint() {
    let output = adx().output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("adx v"));
    assert!(stdout.contains("--help"));
}

#[test]
fn e2e_config_masks_secret_and_marks_missing_values() {
    let output = adx()
        .arg("config")
        .env_clear()
        .env("ADX_CLUSTER_NAME", "mycluster")
        .env("ADX_CLIENT_ID", "client")
        .env("ADX_CLIENT_SECRET", "raw-secret-value")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "config failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Cluster Name: mycluster"));
    assert!(stdout.contains("Client Secret: ********"));
    assert!(!stdout.contains("raw-secret-value"));
    assert!(stdout.contains("Tenant ID: Not set"));
}
