//! Cache layer
//!
//! In-process cache for upstream football API and RSS responses.
//! Keys are built from a resource prefix plus the JSON of the request
//! parameters, e.g. `standings:{"league":"39","season":"2025"}`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bongdaha::cache::{cache_key, create_cache};
//!
//! let cache = create_cache(&config.cache);
//! let key = cache_key("leagues", &serde_json::json!({}));
//! cache.set(&key, &leagues, Duration::from_secs(86_400)).await?;
//! ```

pub mod memory;

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{CacheConfig, CacheTtlConfig};

pub use memory::MemoryCache;

/// Cached resource kinds, each with its own TTL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Live,
    Fixtures,
    Teams,
    Standings,
    Leagues,
    News,
}

impl CacheTtlConfig {
    /// TTL configured for a resource kind
    pub fn for_resource(&self, resource: Resource) -> Duration {
        let secs = match resource {
            Resource::Live => self.live,
            Resource::Fixtures => self.fixtures,
            Resource::Teams => self.teams,
            Resource::Standings => self.standings,
            Resource::Leagues => self.leagues,
            Resource::News => self.news,
        };
        Duration::from_secs(secs)
    }
}

/// Build a cache key from a prefix and the request parameters
pub fn cache_key<P: Serialize>(prefix: &str, params: &P) -> String {
    let params = serde_json::to_string(params).unwrap_or_else(|_| "{}".to_string());
    format!("{}:{}", prefix, params)
}

/// Create the shared response cache
pub fn create_cache(config: &CacheConfig) -> Arc<MemoryCache> {
    Arc::new(MemoryCache::with_capacity(config.max_capacity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cache_key_format() {
        assert_eq!(cache_key("leagues", &json!({})), "leagues:{}");
        assert_eq!(
            cache_key("fixtures", &json!({"date": "2025-03-01"})),
            "fixtures:{\"date\":\"2025-03-01\"}"
        );
    }

    #[test]
    fn test_ttl_for_resource() {
        let ttl = CacheTtlConfig::default();
        assert_eq!(ttl.for_resource(Resource::Live), Duration::from_secs(15));
        assert_eq!(ttl.for_resource(Resource::Fixtures), Duration::from_secs(300));
        assert_eq!(ttl.for_resource(Resource::Teams), Duration::from_secs(43_200));
        assert_eq!(ttl.for_resource(Resource::Standings), Duration::from_secs(1_800));
        assert_eq!(ttl.for_resource(Resource::Leagues), Duration::from_secs(86_400));
        assert_eq!(ttl.for_resource(Resource::News), Duration::from_secs(600));
    }

    #[tokio::test]
    async fn test_create_cache() {
        let cache = create_cache(&CacheConfig::default());
        cache
            .set("k", &"v".to_string(), Duration::from_secs(60))
            .await
            .unwrap();
        let result: Option<String> = cache.get("k").await.unwrap();
        assert_eq!(result.as_deref(), Some("v"));
    }
}
