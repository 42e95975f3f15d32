//! Startup load: `Loading -> Ready` or `Loading -> Failed`

use crate::remote::ItemRemote;
use crate::store::ItemStore;

/// Where the startup load stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    /// Carries the user-facing error message
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Populates the store from the remote collection, once
#[derive(Debug)]
pub struct LoadSequence {
    state: LoadState,
}

impl Default for LoadSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadSequence {
    pub fn new() -> Self {
        Self {
            state: LoadState::Loading,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Fetch the collection and install it into `store`
    ///
    /// Only the first call does anything; the state is terminal afterwards.
    /// On failure the store is left empty.
    pub async fn run<R: ItemRemote>(&mut self, remote: &R, store: &mut ItemStore) -> &LoadState {
        if !self.state.is_loading() {
            tracing::debug!(state = ?self.state, "Load already finished");
            return &self.state;
        }

        self.state = match remote.load_all().await {
            Ok(items) => match store.replace_all(items) {
                Ok(()) => {
                    tracing::info!(count = store.len(), "Items loaded");
                    LoadState::Ready
                }
                Err(e) => {
                    tracing::warn!("Rejected loaded items: {}", e);
                    LoadState::Failed(e.to_string())
                }
            },
            Err(e) => {
                tracing::warn!("Failed to load items: {}", e);
                LoadState::Failed(e.to_string())
            }
        };

        &self.state
    }
}
