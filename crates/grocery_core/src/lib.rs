//! # Grocery List Core
//!
//! Optimistic local state with a best-effort remote mirror.
//!
//! ## Architecture
//!
//! - **ItemStore**: the authoritative in-memory list
//! - **ItemRemote**: one HTTP request per local mutation, no retries
//! - **LoadSequence**: the one-shot startup fetch
//! - **GroceryApp**: applies mutations locally, syncs them, and records
//!   sync failures without rolling back
//!
//! ## Usage
//!
//! ```rust,no_run
//! use grocery_config::Config;
//! use grocery_core::{GroceryApp, HttpRemote};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let mut app = GroceryApp::new(HttpRemote::new(&config.remote)?);
//!     app.start().await;
//!
//!     let snapshot = app.add_item("Bread").await?;
//!     if let Some(error) = &snapshot.fetch_error {
//!         eprintln!("Error: {}", error);
//!     }
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod item;
pub mod load;
pub mod remote;
pub mod store;

pub use app::{item_count_label, AppSnapshot, GroceryApp};
pub use item::{CheckedPatch, Item, ItemId};
pub use load::{LoadSequence, LoadState};
pub use remote::{HttpRemote, ItemRemote, SyncError, SyncOperation, SyncResult};
pub use store::ItemStore;
