//! Configuration management for the grocery list
//!
//! This crate handles loading and validating `.grocery/config.toml`

use grocery_common::{GroceryError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file location relative to the workspace root
pub const CONFIG_PATH: &str = ".grocery/config.toml";

/// Environment variable overriding `remote.api_url`
pub const API_URL_ENV: &str = "GROCERY_API_URL";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Workspace root path (set programmatically, not in TOML)
    #[serde(skip)]
    pub root: PathBuf,

    /// Remote item collection settings
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Display settings
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Remote configuration ([remote])
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// URL of the item collection (GET/POST target; `{api_url}/{id}` for PATCH/DELETE)
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout; unset uses the HTTP client's default
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_api_url() -> String {
    "http://localhost:3500/items".to_string()
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: None,
        }
    }
}

impl RemoteConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Display configuration ([display])
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub show_footer: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { show_footer: true }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            remote: RemoteConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from workspace root
    ///
    /// A missing config file yields defaults. `GROCERY_API_URL` overrides
    /// the file either way.
    pub fn load(workspace_root: &Path) -> Result<Self> {
        let mut config = Self::load_file(workspace_root)?;
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                tracing::debug!("Using {} from environment", API_URL_ENV);
                config.remote.api_url = url;
            }
        }
        config.validate()?;
        Ok(config)
    }

    fn load_file(workspace_root: &Path) -> Result<Self> {
        let config_path = workspace_root.join(CONFIG_PATH);

        if !config_path.exists() {
            return Ok(Self {
                root: workspace_root.to_path_buf(),
                ..Default::default()
            });
        }

        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| GroceryError::ConfigError(format!("Failed to read config: {}", e)))?;

        let mut config: Config = toml::from_str(&content)
            .map_err(|e| GroceryError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.root = workspace_root.to_path_buf();
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = self.remote.api_url.trim();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(GroceryError::ConfigError(
                "api_url must start with http:// or https://".to_string(),
            ));
        }
        if url.contains(char::is_whitespace) {
            return Err(GroceryError::ConfigError(format!(
                "api_url '{}' contains whitespace",
                url
            )));
        }
        if self.remote.timeout_secs == Some(0) {
            return Err(GroceryError::ConfigError(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Render the default config file written by `grocery init`
    pub fn default_toml() -> String {
        format!(
            r#"# Grocery list configuration

[remote]
api_url = "{}"
# timeout_secs = 10

[display]
show_footer = true
"#,
            default_api_url()
        )
    }
}
