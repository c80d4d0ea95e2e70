//! Upstream HTTP clients
//!
//! Thin wrappers around the services this server sits in front of:
//! - [`FootballClient`]: API-Football (`x-apisports-key` auth)
//! - [`NewsFeed`]: the sports RSS feed
//! - [`AdminApi`]: the public half of the admin API (categories, tracking)
//!
//! Failures are typed and left to the caller; the HTTP layer decides
//! what an outage looks like to browsers.

pub mod admin;
pub mod football;
pub mod news;

use serde_json::Value;
use std::time::Duration;

pub use admin::{AdminApi, ForwardedTrack};
pub use football::FootballClient;
pub use news::{parse_feed, NewsFeed, NewsItem};

/// Timeout for admin API and RSS requests
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for upstream requests
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("FOOTBALL_API_KEY is not configured")]
    MissingKey,
    #[error("Request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },
    #[error("Failed to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

impl UpstreamError {
    pub(crate) fn http(endpoint: &str, source: reqwest::Error) -> Self {
        Self::Http {
            endpoint: endpoint.to_string(),
            source,
        }
    }

    pub(crate) fn decode(endpoint: &str, message: impl ToString) -> Self {
        Self::Decode {
            endpoint: endpoint.to_string(),
            message: message.to_string(),
        }
    }
}

/// Build the shared outbound HTTP client
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("bongdaha/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// The `response` array of an API-Football body, or empty when absent
pub fn response_array(body: &Value) -> Vec<Value> {
    body.get("response")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}
