//! Application state and mutation orchestration
//!
//! Every user action runs the same three steps:
//! 1. apply the mutation to the local store
//! 2. send the matching request to the remote collection
//! 3. if the request failed, record its message as the current fetch error
//!
//! The local mutation is never rolled back. Observers see the optimistic
//! state before the request is sent.

use grocery_common::Result;
use serde::Serialize;

use crate::item::{CheckedPatch, Item, ItemId};
use crate::load::{LoadSequence, LoadState};
use crate::remote::{ItemRemote, SyncError};
use crate::store::ItemStore;

type Observer = Box<dyn Fn(&AppSnapshot) + Send + Sync>;

/// Everything the presentation layer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppSnapshot {
    /// Items matching the current search, in display order
    pub items: Vec<Item>,

    /// Size of the whole list, ignoring the search
    pub total: usize,

    pub search: String,

    pub loading: bool,

    pub fetch_error: Option<String>,
}

impl AppSnapshot {
    pub fn footer_label(&self) -> String {
        item_count_label(self.total)
    }
}

/// Footer text: "1 List item", "3 List items"
pub fn item_count_label(count: usize) -> String {
    if count == 1 {
        format!("{} List item", count)
    } else {
        format!("{} List items", count)
    }
}

/// The grocery list application state
pub struct GroceryApp<R> {
    store: ItemStore,
    remote: R,
    load: LoadSequence,
    search: String,
    fetch_error: Option<String>,
    observers: Vec<Observer>,
}

impl<R: ItemRemote> GroceryApp<R> {
    pub fn new(remote: R) -> Self {
        Self {
            store: ItemStore::new(),
            remote,
            load: LoadSequence::new(),
            search: String::new(),
            fetch_error: None,
            observers: Vec::new(),
        }
    }

    /// Register a callback invoked with every published snapshot
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: Fn(&AppSnapshot) + Send + Sync + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Run the startup load
    ///
    /// Only the first call loads; later calls return the current snapshot.
    pub async fn start(&mut self) -> AppSnapshot {
        if !self.load.state().is_loading() {
            return self.snapshot();
        }
        self.publish();

        match self.load.run(&self.remote, &mut self.store).await {
            LoadState::Failed(message) => self.fetch_error = Some(message.clone()),
            _ => self.fetch_error = None,
        }

        self.publish()
    }

    /// Add an item and mirror it remotely
    pub async fn add_item(&mut self, text: &str) -> Result<AppSnapshot> {
        let item = self.store.add(text)?;
        self.publish();

        if let Err(e) = self.remote.create(&item).await {
            self.record_sync_error(e);
        }
        Ok(self.snapshot())
    }

    /// Flip an item's checked flag and mirror it remotely
    pub async fn toggle_checked(&mut self, id: ItemId) -> Result<AppSnapshot> {
        let item = self.store.toggle_checked(id)?;
        self.publish();

        let patch = CheckedPatch {
            checked: item.checked,
        };
        if let Err(e) = self.remote.update(id, patch).await {
            self.record_sync_error(e);
        }
        Ok(self.snapshot())
    }

    /// Delete an item and mirror it remotely
    pub async fn delete_item(&mut self, id: ItemId) -> Result<AppSnapshot> {
        self.store.remove(id)?;
        self.publish();

        if let Err(e) = self.remote.delete(id).await {
            self.record_sync_error(e);
        }
        Ok(self.snapshot())
    }

    pub fn set_search(&mut self, query: &str) -> AppSnapshot {
        self.search = query.to_string();
        self.publish()
    }

    pub fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            items: self.store.filtered(&self.search),
            total: self.store.len(),
            search: self.search.clone(),
            loading: self.load.state().is_loading(),
            fetch_error: self.fetch_error.clone(),
        }
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    pub fn load_state(&self) -> &LoadState {
        self.load.state()
    }

    pub fn fetch_error(&self) -> Option<&str> {
        self.fetch_error.as_deref()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    fn record_sync_error(&mut self, error: SyncError) {
        tracing::warn!(operation = %error.operation(), "Sync failed: {}", error);
        self.fetch_error = Some(error.to_string());
        self.publish();
    }

    fn publish(&self) -> AppSnapshot {
        let snapshot = self.snapshot();
        for observer in &self.observers {
            observer(&snapshot);
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{SyncOperation, SyncResult};
    use grocery_common::GroceryError;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Load,
        Create(Item),
        Update(ItemId, bool),
        Delete(ItemId),
    }

    /// In-memory remote that records calls and can be told to fail
    #[derive(Default)]
    struct RecordingRemote {
        seed: Vec<Item>,
        fail_load: bool,
        fail_mutations: Mutex<bool>,
        calls: Mutex<Vec<Call>>,
    }

    impl RecordingRemote {
        fn seeded(items: Vec<Item>) -> Self {
            Self {
                seed: items,
                ..Default::default()
            }
        }

        fn set_failing(&self, failing: bool) {
            *self.fail_mutations.lock().unwrap() = failing;
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call, operation: SyncOperation) -> SyncResult<()> {
            self.calls.lock().unwrap().push(call);
            if *self.fail_mutations.lock().unwrap() {
                return Err(SyncError::Status {
                    operation,
                    status: 500,
                    detail: None,
                });
            }
            Ok(())
        }
    }

    impl ItemRemote for RecordingRemote {
        async fn load_all(&self) -> SyncResult<Vec<Item>> {
            self.calls.lock().unwrap().push(Call::Load);
            if self.fail_load {
                return Err(SyncError::Transport {
                    operation: SyncOperation::Load,
                    message: "connection refused".to_string(),
                });
            }
            Ok(self.seed.clone())
        }

        async fn create(&self, item: &Item) -> SyncResult<()> {
            self.record(Call::Create(item.clone()), SyncOperation::Create(item.id))
        }

        async fn update(&self, id: ItemId, patch: CheckedPatch) -> SyncResult<()> {
            self.record(Call::Update(id, patch.checked), SyncOperation::Update(id))
        }

        async fn delete(&self, id: ItemId) -> SyncResult<()> {
            self.record(Call::Delete(id), SyncOperation::Delete(id))
        }
    }

    async fn started(remote: RecordingRemote) -> GroceryApp<RecordingRemote> {
        let mut app = GroceryApp::new(remote);
        app.start().await;
        app
    }

    #[tokio::test]
    async fn test_start_ready() {
        let app = started(RecordingRemote::seeded(vec![Item::new(1, "Bread")])).await;

        assert_eq!(app.load_state(), &LoadState::Ready);
        assert!(app.fetch_error().is_none());
        let snapshot = app.snapshot();
        assert!(!snapshot.loading);
        assert_eq!(snapshot.total, 1);
    }

    #[tokio::test]
    async fn test_start_failed() {
        let remote = RecordingRemote {
            fail_load: true,
            ..Default::default()
        };
        let app = started(remote).await;

        assert!(matches!(app.load_state(), LoadState::Failed(_)));
        assert!(app.store().is_empty());
        assert!(app.fetch_error().unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_add_sends_full_item() {
        let mut app = started(RecordingRemote::seeded(vec![
            Item::new(1, "Bread"),
            Item::new(2, "Milk"),
        ]))
        .await;

        let snapshot = app.add_item("Eggs").await.unwrap();
        assert_eq!(snapshot.total, 3);
        assert_eq!(
            app.remote().calls().last(),
            Some(&Call::Create(Item::new(3, "Eggs")))
        );
        assert!(snapshot.fetch_error.is_none());
    }

    #[tokio::test]
    async fn test_failed_create_keeps_local_item() {
        let mut app = started(RecordingRemote::default()).await;
        app.remote().set_failing(true);

        let snapshot = app.add_item("Milk").await.unwrap();
        assert_eq!(app.store().list(), &[Item::new(1, "Milk")]);
        let error = snapshot.fetch_error.unwrap();
        assert!(error.starts_with("Please reload the app."));
        assert!(error.contains("create item 1"));
    }

    #[tokio::test]
    async fn test_toggle_sends_new_checked_value() {
        let mut app = started(RecordingRemote::seeded(vec![Item::new(4, "Tea")])).await;

        app.toggle_checked(4).await.unwrap();
        app.toggle_checked(4).await.unwrap();

        let calls = app.remote().calls();
        assert_eq!(&calls[1..], &[Call::Update(4, true), Call::Update(4, false)]);
        assert!(!app.store().get(4).unwrap().checked);
    }

    #[tokio::test]
    async fn test_failed_delete_not_rolled_back() {
        let mut app = started(RecordingRemote::seeded(vec![
            Item::new(1, "Bread"),
            Item::new(2, "Milk"),
        ]))
        .await;
        app.remote().set_failing(true);

        app.delete_item(1).await.unwrap();
        assert_eq!(app.store().list(), &[Item::new(2, "Milk")]);
        assert!(app.fetch_error().unwrap().contains("delete item 1"));
    }

    #[tokio::test]
    async fn test_latest_sync_error_replaces_previous() {
        let mut app = started(RecordingRemote::seeded(vec![Item::new(1, "Bread")])).await;
        app.remote().set_failing(true);

        app.toggle_checked(1).await.unwrap();
        app.add_item("Jam").await.unwrap();
        assert!(app.fetch_error().unwrap().contains("create item 2"));

        // A later success leaves the last error visible
        app.remote().set_failing(false);
        app.delete_item(2).await.unwrap();
        assert!(app.fetch_error().unwrap().contains("create item 2"));
    }

    #[tokio::test]
    async fn test_second_start_keeps_sync_error() {
        let mut app = started(RecordingRemote::seeded(vec![Item::new(1, "Bread")])).await;
        app.remote().set_failing(true);
        app.add_item("Jam").await.unwrap();

        let snapshot = app.start().await;
        assert!(snapshot.fetch_error.unwrap().contains("create item 2"));
        assert_eq!(snapshot.total, 2);
        let loads = app
            .remote()
            .calls()
            .into_iter()
            .filter(|call| *call == Call::Load)
            .count();
        assert_eq!(loads, 1);
    }

    #[tokio::test]
    async fn test_add_after_max_id_skips_remote() {
        let mut app = started(RecordingRemote::seeded(vec![Item::new(ItemId::MAX, "Huge")])).await;

        let err = app.add_item("Bread").await.unwrap_err();
        assert!(matches!(err, GroceryError::ValidationError(_)));
        assert_eq!(app.remote().calls(), vec![Call::Load]);
        assert_eq!(app.snapshot().total, 1);
    }

    #[tokio::test]
    async fn test_local_errors_skip_remote() {
        let mut app = started(RecordingRemote::seeded(vec![Item::new(1, "Bread")])).await;

        assert!(matches!(
            app.add_item("").await,
            Err(GroceryError::ValidationError(_))
        ));
        assert!(matches!(
            app.toggle_checked(9).await,
            Err(GroceryError::NotFound { id: 9 })
        ));
        assert!(matches!(
            app.delete_item(9).await,
            Err(GroceryError::NotFound { id: 9 })
        ));
        assert_eq!(app.remote().calls(), vec![Call::Load]);
    }

    #[tokio::test]
    async fn test_search_filters_snapshot_not_total() {
        let mut app = started(RecordingRemote::seeded(vec![
            Item::new(1, "Milk"),
            Item::new(2, "Bread"),
        ]))
        .await;

        let snapshot = app.set_search("MILK");
        assert_eq!(snapshot.items, vec![Item::new(1, "Milk")]);
        assert_eq!(snapshot.total, 2);
        assert_eq!(snapshot.footer_label(), "2 List items");
        assert_eq!(app.search(), "MILK");
    }

    #[tokio::test]
    async fn test_observers_see_optimistic_state_first() {
        let seen: Arc<Mutex<Vec<AppSnapshot>>> = Arc::default();
        let mut app = GroceryApp::new(RecordingRemote::default());
        let sink = Arc::clone(&seen);
        app.subscribe(move |snapshot| sink.lock().unwrap().push(snapshot.clone()));

        app.start().await;
        app.remote().set_failing(true);
        app.add_item("Milk").await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 4);
        assert!(seen[0].loading);
        assert!(!seen[1].loading);
        // optimistic frame: item present, no error yet
        assert_eq!(seen[2].total, 1);
        assert!(seen[2].fetch_error.is_none());
        // failure frame: item still present, error recorded
        assert_eq!(seen[3].total, 1);
        assert!(seen[3].fetch_error.is_some());
    }

    #[test]
    fn test_item_count_label() {
        assert_eq!(item_count_label(0), "0 List items");
        assert_eq!(item_count_label(1), "1 List item");
        assert_eq!(item_count_label(2), "2 List items");
    }
}
