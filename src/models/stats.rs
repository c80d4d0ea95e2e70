//! Dashboard, visitor and system statistics
//!
//! The admin API computes these; only the fields the admin client
//! renders are typed, the rest are kept as raw JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::envelope::null_as_default;
use super::PageInfo;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DayCounts {
    #[serde(default)]
    pub pv: u64,
    #[serde(default)]
    pub uv: u64,
    #[serde(default)]
    pub ips: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(default)]
    pub today: DayCounts,
    #[serde(default)]
    pub yesterday: DayCounts,
    #[serde(default)]
    pub realtime_online: u64,
    #[serde(default)]
    pub total_articles: u64,
    #[serde(default)]
    pub published_articles: u64,
    #[serde(default)]
    pub total_categories: u64,
    #[serde(default)]
    pub blacklist_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub trends: Vec<TrendPoint>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recent_visitors: Vec<Value>,
}

/// One day of the visitor trend
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrendPoint {
    pub date: String,
    #[serde(default)]
    pub pv: u64,
    #[serde(default)]
    pub uv: u64,
    #[serde(default)]
    pub ips: u64,
}

/// Visitor statistics; the breakdowns stay untyped
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisitorStats {
    #[serde(default)]
    pub today: DayCounts,
    #[serde(default)]
    pub yesterday: DayCounts,
    #[serde(default)]
    pub realtime_online: u64,
    #[serde(flatten)]
    pub breakdowns: serde_json::Map<String, Value>,
}

/// One row of the visitor log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VisitorRecord {
    pub id: i64,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub visitor_id: String,
    #[serde(default)]
    pub page: String,
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub os: String,
    #[serde(default)]
    pub browser: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub visit_time: Option<String>,
    /// Seconds on site
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub page_view_count: u64,
}

/// One page of visitor log rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitorList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub visitors: Vec<VisitorRecord>,
    #[serde(flatten)]
    pub page: PageInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SystemInfo {
    #[serde(default)]
    pub total_visitors: u64,
    #[serde(default)]
    pub total_articles: u64,
    #[serde(default)]
    pub total_images: u64,
    #[serde(default)]
    pub db_size: String,
}
