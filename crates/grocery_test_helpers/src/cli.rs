//! CLI command builders for tests

use assert_cmd::Command;

/// Get a Command for the `grocery` binary with clean environment
///
/// This command is pre-configured with:
/// - `RUST_LOG=error` to suppress logs in tests
/// - `GROCERY_API_URL` removed so the user's endpoint is never contacted
///
/// # Example
///
/// ```rust,no_run
/// use grocery_test_helpers::cli::grocery_command;
///
/// grocery_command()
///     .arg("--version")
///     .assert()
///     .success();
/// ```
#[allow(deprecated)]
pub fn grocery_command() -> Command {
    let mut cmd = Command::cargo_bin("grocery").expect("Failed to find grocery binary");
    cmd.env("RUST_LOG", "error");
    cmd.env_remove("GROCERY_API_URL");
    cmd
}
