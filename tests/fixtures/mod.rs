//! Shared test fixtures for E2E CLI tests.
#![allow(dead_code)] // Not every test file uses every helper

use std::path::Path;
use std::process::{Command, Output};

/// Path to the lazyqr binary
pub fn lazyqr_bin() -> String {
    std::env::var("CARGO_BIN_EXE_lazyqr").unwrap_or_else(|_| "target/release/lazyqr".to_string())
}

/// Creates a Command with an isolated storage directory.
/// Pass the same directory to share state between commands in one test.
pub fn isolated_command(args: &[&str], config_dir: &Path) -> Command {
    let mut cmd = Command::new(lazyqr_bin());
    cmd.env("LAZYQR_CONFIG_DIR", config_dir);
    cmd.env("TZ", "UTC");
    cmd.env_remove("RUST_LOG");
    cmd.args(args);
    cmd
}

/// Runs a command in an isolated storage directory and returns its output.
pub fn run(args: &[&str], config_dir: &Path) -> Output {
    isolated_command(args, config_dir)
        .output()
        .expect("Failed to execute command")
}

/// Stdout as a string with the trailing newline removed.
pub fn stdout_line(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout)
        .trim_end_matches('\n')
        .to_string()
}

/// Parses stdout as JSON.
pub fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("Should parse JSON output")
}

/// Asserts an exit code, showing stderr on mismatch.
pub fn assert_exit(output: &Output, code: i32) {
    assert_eq!(
        output.status.code(),
        Some(code),
        "unexpected exit code. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Reads the state shown by `config show --json`.
pub fn show_state(config_dir: &Path) -> serde_json::Value {
    let output = run(&["config", "show", "--json"], config_dir);
    assert_exit(&output, 0);
    stdout_json(&output)
}
