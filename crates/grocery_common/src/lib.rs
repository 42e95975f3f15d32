//! Common types and errors for the grocery list
//!
//! This crate provides the error type and process conventions shared by all
//! grocery list components.

pub mod telemetry;

use thiserror::Error;

/// Core error types for grocery list operations
///
/// Only local failures live here. A failed remote call is not an error of
/// the operation that triggered it; see `grocery_core::SyncError`.
#[derive(Error, Debug)]
pub enum GroceryError {
    #[error("Invalid input: {0}")]
    ValidationError(String),

    #[error("Item not found: {id}")]
    NotFound { id: u64 },

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl GroceryError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            GroceryError::ConfigError(_) => EXIT_CONFIG_ERROR,
            _ => EXIT_ERROR,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, GroceryError>;

/// Exit code constants
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 1;
pub const EXIT_USAGE: i32 = 2;
pub const EXIT_SYNC_ERROR: i32 = 3;
pub const EXIT_CONFIG_ERROR: i32 = 101;
