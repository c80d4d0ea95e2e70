//! Admin API response envelope
//!
//! Every admin API response is wrapped as `{success, data, error, message}`.
//! Some endpoints put extra fields beside `data` (login's `token`, image
//! paging), so the envelope keeps unknown top-level fields in `extra`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Response envelope shared by every admin API endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Top-level fields outside the standard four
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<T> Envelope<T> {
    /// Human readable failure reason, preferring `error` over `message`
    pub fn failure_reason(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "Request failed".to_string())
    }
}

/// One page of results as returned by the list endpoints
///
/// Articles and visitors name the item array differently, so the
/// item field is renamed at the use site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub total: u64,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size", rename = "pageSize", alias = "page_size")]
    pub page_size: u64,
}

/// Deserialize `null` as the type's default; the admin API emits `null`
/// for empty lists
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    20
}
