//! Shared test utilities for grocery list test suites
//!
//! # Modules
//!
//! - [`server`]: In-process fake of the remote item collection
//! - [`workspace`]: Temp workspaces with a `.grocery/config.toml`
//! - [`cli`]: Command builders with pre-configured environments
//! - [`logging`]: Test logging configuration
//! - [`assertions`]: Predicates over rendered list output
//!
//! # Example
//!
//! ```rust,no_run
//! use grocery_test_helpers::prelude::*;
//!
//! let server = FakeItemServer::start();
//! let workspace = workspace_for(&server.url());
//!
//! grocery_command()
//!     .current_dir(workspace.path())
//!     .args(["add", "Bread"])
//!     .assert()
//!     .success()
//!     .stdout(lists_item(1, "Bread", false));
//! ```

pub mod assertions;
pub mod cli;
pub mod logging;
pub mod server;
pub mod workspace;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::assertions::*;
    pub use crate::cli::grocery_command;
    pub use crate::logging::{init_test_logging, suppress_logs};
    pub use crate::server::{FakeItemServer, RecordedRequest};
    pub use crate::workspace::{temp_dir, workspace_for};
}
