//! IP blacklist and whitelist entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlacklistEntry {
    pub id: i64,
    pub ip_address: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// `None` blocks permanently
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WhitelistEntry {
    pub id: i64,
    pub ip_address: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Input for blocking an IP
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BlacklistInput {
    pub ip_address: String,
    #[serde(default)]
    pub reason: String,
    /// `YYYY-MM-DD HH:MM:SS`, empty for a permanent block
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub expires_at: String,
}

/// Input for allowing an IP
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WhitelistInput {
    pub ip_address: String,
    #[serde(default)]
    pub description: String,
}
