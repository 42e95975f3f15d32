//! Remote item collection client
//!
//! Each local mutation maps to exactly one request:
//! - `GET /items` - load the collection
//! - `POST /items` - create an item
//! - `PATCH /items/{id}` - update the checked flag
//! - `DELETE /items/{id}` - delete an item
//!
//! Failures are returned, never retried.

use std::collections::HashSet;
use std::fmt;
use std::future::Future;

use grocery_common::{GroceryError, Result};
use grocery_config::RemoteConfig;
use reqwest::{Client, RequestBuilder, Response};

use crate::item::{CheckedPatch, ErrorBody, Item, ItemId};

/// Result type for remote calls
pub type SyncResult<T> = std::result::Result<T, SyncError>;

/// The remote call a `SyncError` belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOperation {
    Load,
    Create(ItemId),
    Update(ItemId),
    Delete(ItemId),
}

impl fmt::Display for SyncOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncOperation::Load => write!(f, "load items"),
            SyncOperation::Create(id) => write!(f, "create item {}", id),
            SyncOperation::Update(id) => write!(f, "update item {}", id),
            SyncOperation::Delete(id) => write!(f, "delete item {}", id),
        }
    }
}

/// Failure of a single remote call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// The server answered with a non-2xx status
    #[error("{} (HTTP {status} while trying to {operation}{})", headline(.operation), detail_suffix(.detail))]
    Status {
        operation: SyncOperation,
        status: u16,
        detail: Option<String>,
    },

    /// The request never produced a response
    #[error("{} (could not {operation}: {message})", headline(.operation))]
    Transport {
        operation: SyncOperation,
        message: String,
    },

    /// The response body did not match the item contract
    #[error("Did not receive expected data. (invalid response to {operation}: {message})")]
    Malformed {
        operation: SyncOperation,
        message: String,
    },
}

fn headline(operation: &SyncOperation) -> &'static str {
    match operation {
        SyncOperation::Load => "Did not receive expected data.",
        _ => "Please reload the app.",
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {}", d))
        .unwrap_or_default()
}

impl SyncError {
    pub fn operation(&self) -> SyncOperation {
        match self {
            SyncError::Status { operation, .. }
            | SyncError::Transport { operation, .. }
            | SyncError::Malformed { operation, .. } => *operation,
        }
    }
}

/// Remote mirror of the item collection
pub trait ItemRemote {
    /// Fetch the full collection
    fn load_all(&self) -> impl Future<Output = SyncResult<Vec<Item>>> + Send;

    /// Create a record with the full item payload
    fn create(&self, item: &Item) -> impl Future<Output = SyncResult<()>> + Send;

    /// Partially update a record's checked flag
    fn update(&self, id: ItemId, patch: CheckedPatch)
        -> impl Future<Output = SyncResult<()>> + Send;

    /// Delete a record
    fn delete(&self, id: ItemId) -> impl Future<Output = SyncResult<()>> + Send;
}

/// `ItemRemote` over HTTP/JSON
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: Client,
    api_url: String,
}

impl HttpRemote {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| GroceryError::ConfigError(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn item_url(&self, id: ItemId) -> String {
        format!("{}/{}", self.api_url, id)
    }

    /// Send a request and classify the outcome
    async fn send(&self, operation: SyncOperation, request: RequestBuilder) -> SyncResult<Response> {
        tracing::debug!(%operation, "Sending request");

        let response = request.send().await.map_err(|e| SyncError::Transport {
            operation,
            message: e.to_string(),
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(SyncError::Status {
            operation,
            status: status.as_u16(),
            detail: ErrorBody::detail_from(&body),
        })
    }
}

impl ItemRemote for HttpRemote {
    async fn load_all(&self) -> SyncResult<Vec<Item>> {
        let operation = SyncOperation::Load;
        let response = self.send(operation, self.client.get(&self.api_url)).await?;

        let bytes = response.bytes().await.map_err(|e| SyncError::Transport {
            operation,
            message: e.to_string(),
        })?;
        let items: Vec<Item> =
            serde_json::from_slice(&bytes).map_err(|e| SyncError::Malformed {
                operation,
                message: e.to_string(),
            })?;

        validate_collection(&items).map_err(|message| SyncError::Malformed { operation, message })?;
        tracing::debug!(count = items.len(), "Loaded items");
        Ok(items)
    }

    async fn create(&self, item: &Item) -> SyncResult<()> {
        let request = self.client.post(&self.api_url).json(item);
        self.send(SyncOperation::Create(item.id), request).await?;
        Ok(())
    }

    async fn update(&self, id: ItemId, patch: CheckedPatch) -> SyncResult<()> {
        let request = self.client.patch(self.item_url(id)).json(&patch);
        self.send(SyncOperation::Update(id), request).await?;
        Ok(())
    }

    async fn delete(&self, id: ItemId) -> SyncResult<()> {
        let request = self.client.delete(self.item_url(id));
        self.send(SyncOperation::Delete(id), request).await?;
        Ok(())
    }
}

/// Reject collections the store could not hold
fn validate_collection(items: &[Item]) -> std::result::Result<(), String> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if item.item.is_empty() {
            return Err(format!("item {} has empty text", item.id));
        }
        if !seen.insert(item.id) {
            return Err(format!("duplicate item id {}", item.id));
        }
    }
    Ok(())
}
