//! Workspace initialization utilities for tests

use assert_fs::TempDir;
use std::fs;

/// Create a temporary directory for testing
///
/// The directory will be automatically cleaned up when the `TempDir` is dropped.
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Create a workspace whose config points at `api_url`
///
/// # Example
///
/// ```rust
/// use grocery_test_helpers::workspace::workspace_for;
///
/// let workspace = workspace_for("http://127.0.0.1:9/items");
/// assert!(workspace.path().join(".grocery/config.toml").exists());
/// ```
pub fn workspace_for(api_url: &str) -> TempDir {
    let temp = temp_dir();
    let grocery_dir = temp.path().join(".grocery");
    fs::create_dir_all(&grocery_dir).expect("Failed to create .grocery directory");

    let config = format!(
        "[remote]\napi_url = \"{}\"\ntimeout_secs = 5\n\n[display]\nshow_footer = true\n",
        api_url
    );
    fs::write(grocery_dir.join("config.toml"), config).expect("Failed to write config.toml");

    temp
}
