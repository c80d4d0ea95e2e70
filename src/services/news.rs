//! News headlines service

use serde_json::json;
use std::sync::Arc;

use crate::cache::{cache_key, MemoryCache, Resource};
use crate::config::CacheTtlConfig;
use crate::upstream::{NewsFeed, NewsItem, UpstreamError};

pub struct NewsService {
    feed: NewsFeed,
    cache: Arc<MemoryCache>,
    ttl: CacheTtlConfig,
    default_limit: usize,
}

impl NewsService {
    pub fn new(feed: NewsFeed, cache: Arc<MemoryCache>, ttl: CacheTtlConfig, default_limit: usize) -> Self {
        Self {
            feed,
            cache,
            ttl,
            default_limit,
        }
    }

    /// Number of items to return for a raw `limit` query value
    ///
    /// Only the leading digits count, so `5abc` is 5. Missing, non-numeric
    /// and zero limits fall back to the default.
    pub fn effective_limit(&self, raw: Option<&str>) -> usize {
        raw.map(str::trim_start)
            .map(|l| {
                let end = l.find(|c: char| !c.is_ascii_digit()).unwrap_or(l.len());
                &l[..end]
            })
            .and_then(|digits| digits.parse::<usize>().ok())
            .filter(|&l| l > 0)
            .unwrap_or(self.default_limit)
    }

    /// First `limit` headlines of the feed
    ///
    /// The whole feed is cached once and sliced per request.
    pub async fn latest(&self, limit: usize) -> Result<Vec<NewsItem>, UpstreamError> {
        let key = cache_key("news", &json!({}));
        let items = match self.cache.get::<Vec<NewsItem>>(&key).await.ok().flatten() {
            Some(items) => items,
            None => {
                let items = self.feed.fetch().await?;
                let _ = self
                    .cache
                    .set(&key, &items, self.ttl.for_resource(Resource::News))
                    .await;
                items
            }
        };

        Ok(items.into_iter().take(limit).collect())
    }
}
