//! In-memory response cache using moka
//!
//! Provides a thread-safe cache for upstream responses with a TTL per entry,
//! so short-lived data (live scores) and long-lived data (league lists) can
//! share one cache.
//!
//! # Features
//! - Per-entry TTL expiration
//! - Glob-style pattern matching for bulk deletion
//! - Key listing for the debug stats endpoint

use anyhow::{Context, Result};
use moka::future::Cache;
use moka::Expiry;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default maximum cache capacity (number of entries)
const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// Cache entry wrapper that stores serialized JSON data with its own TTL
#[derive(Clone)]
struct CacheEntry {
    /// JSON-serialized value
    data: Arc<String>,
    ttl: Duration,
}

impl CacheEntry {
    fn new<T: Serialize>(value: &T, ttl: Duration) -> Result<Self> {
        let json = serde_json::to_string(value).context("Failed to serialize cache value")?;
        Ok(Self {
            data: Arc::new(json),
            ttl,
        })
    }

    fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.data).context("Failed to deserialize cache value")
    }
}

/// Expiry policy that reads the TTL stored on each entry.
/// Overwriting a key restarts its clock.
struct PerEntryTtl;

impl Expiry<String, CacheEntry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-memory cache using moka
///
/// Values are stored as JSON strings so any serializable response shape
/// can be cached under a string key.
pub struct MemoryCache {
    cache: Cache<String, CacheEntry>,
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entry_count", &self.cache.entry_count())
            .finish()
    }
}

impl MemoryCache {
    /// Create a new memory cache holding at most 10,000 entries
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_CAPACITY)
    }

    /// Create a new memory cache with custom max capacity
    pub fn with_capacity(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self { cache }
    }

    /// Get a value from cache
    ///
    /// Returns `Ok(None)` if the key doesn't exist or has expired.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.cache.get(key).await {
            Some(entry) => Ok(Some(entry.deserialize()?)),
            None => Ok(None),
        }
    }

    /// Set a value in cache; it expires after `ttl`
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) -> Result<()> {
        let entry = CacheEntry::new(value, ttl)?;
        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    /// Delete a value from cache
    pub async fn delete(&self, key: &str) {
        self.cache.invalidate(key).await;
    }

    /// Delete all values matching a glob-style pattern, returning how many were removed
    ///
    /// - `*` matches any sequence of characters
    /// - `?` matches any single character
    pub async fn delete_pattern(&self, pattern: &str) -> usize {
        let keys_to_delete: Vec<String> = self
            .cache
            .iter()
            .filter(|(key, _)| pattern_matches(pattern, key.as_ref()))
            .map(|(key, _)| (*key).clone())
            .collect();

        for key in &keys_to_delete {
            self.cache.invalidate(key).await;
        }
        self.cache.run_pending_tasks().await;

        keys_to_delete.len()
    }

    /// Clear all cache entries
    pub async fn clear(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }

    /// Live keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.cache.iter().map(|(key, _)| (*key).clone()).collect();
        keys.sort();
        keys
    }

    /// Number of live entries after pending maintenance has run
    pub async fn size(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if a pattern matches a key using glob-style matching
///
/// - `live:*` matches `live:{}`
/// - `fixtures:?*` matches any non-empty fixtures key suffix
pub(crate) fn pattern_matches(pattern: &str, key: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let key: Vec<char> = key.chars().collect();
    glob_match(&pattern, &key)
}

/// Iterative glob matching with single-star backtracking
fn glob_match(pattern: &[char], key: &[char]) -> bool {
    let (mut pi, mut ki) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while ki < key.len() {
        match pattern.get(pi) {
            Some('*') => {
                star = Some((pi, ki));
                pi += 1;
            }
            Some('?') => {
                pi += 1;
                ki += 1;
            }
            Some(&c) if c == key[ki] => {
                pi += 1;
                ki += 1;
            }
            _ => match star {
                Some((star_pi, star_ki)) => {
                    pi = star_pi + 1;
                    ki = star_ki + 1;
                    star = Some((star_pi, star_ki + 1));
                }
                None => return false,
            },
        }
    }

    pattern[pi..].iter().all(|&c| c == '*')
}
