//! Grocery item model and its JSON contract with the remote collection

use serde::{Deserialize, Deserializer, Serialize};

/// Client-assigned item identifier
pub type ItemId = u64;

/// A single grocery-list entry
///
/// Serialized as `{"id", "checked", "item"}`, the payload `POST /items` expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: ItemId,

    pub checked: bool,

    /// Display text
    pub item: String,
}

impl Item {
    pub fn new(id: ItemId, text: impl Into<String>) -> Self {
        Self {
            id,
            checked: false,
            item: text.into(),
        }
    }

    /// Case-insensitive substring match against the display text
    pub fn matches(&self, query: &str) -> bool {
        query.is_empty() || self.item.to_lowercase().contains(&query.to_lowercase())
    }
}

/// Body of `PATCH /items/{id}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckedPatch {
    pub checked: bool,
}

/// Error body some servers attach to non-2xx responses
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Extract a human-readable detail from a raw response body, if any
    pub fn detail_from(body: &str) -> Option<String> {
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        parsed
            .message
            .or(parsed.error)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

/// json-server >= 1.0 stores ids as strings; accept `3` and `"3"` alike
fn deserialize_id<'de, D>(deserializer: D) -> Result<ItemId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(id) => Ok(id),
        RawId::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid item id: {:?}", text))),
    }
}
