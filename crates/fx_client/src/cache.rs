//! In-memory TTL cache for upstream responses.
//!
//! Uses `DashMap` so concurrent requests for different ranges do not contend.
//! Expiry is checked lazily on read; nothing sweeps the map in the background.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use common::RateSeries;
use dashmap::DashMap;
use tracing::info;

/// What a cached value was fetched for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Range {
        base: &'static str,
        symbol: &'static str,
        start: NaiveDate,
        end: NaiveDate,
    },
    Latest {
        base: &'static str,
        symbol: &'static str,
    },
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Range {
                base,
                symbol,
                start,
                end,
            } => write!(f, "range:{start}:{end}:{base}:{symbol}"),
            CacheKey::Latest { base, symbol } => write!(f, "latest:{base}:{symbol}"),
        }
    }
}

/// A cached series with the time it was fetched.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: Arc<RateSeries>,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.fetched_at < ttl
    }
}

/// Storage for live responses, keyed by request.
pub trait RateCache: Send + Sync {
    /// Return the value for `key` if it is still fresh at `now`.
    fn get(&self, key: &CacheKey, now: DateTime<Utc>) -> Option<Arc<RateSeries>>;

    /// Store `value`, replacing any previous entry for `key`.
    fn put(&self, key: CacheKey, value: Arc<RateSeries>, fetched_at: DateTime<Utc>);

    fn clear(&self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Strict TTL cache: one entry per key, no size-based eviction.
#[derive(Debug)]
pub struct TtlCache {
    entries: DashMap<CacheKey, CacheEntry>,
    ttl: Duration,
}

impl TtlCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// TTLs beyond what `Duration` can hold saturate to `Duration::MAX`.
    pub fn with_ttl_secs(secs: u64) -> Self {
        let ttl = i64::try_from(secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        Self::new(ttl)
    }
}

impl RateCache for TtlCache {
    fn get(&self, key: &CacheKey, now: DateTime<Utc>) -> Option<Arc<RateSeries>> {
        // The read guard must be released before `remove_if` touches the shard.
        let fresh = match self.entries.get(key) {
            None => return None,
            Some(entry) if entry.is_fresh(now, self.ttl) => Some(entry.value.clone()),
            Some(_) => None,
        };

        if fresh.is_some() {
            info!("Cache hit for key: {}", key);
            return fresh;
        }

        // A concurrent refresh may have landed in between; keep it if so.
        if self
            .entries
            .remove_if(key, |_, entry| !entry.is_fresh(now, self.ttl))
            .is_some()
        {
            info!("Cache expired for key: {}", key);
        }
        None
    }

    fn put(&self, key: CacheKey, value: Arc<RateSeries>, fetched_at: DateTime<Utc>) {
        info!("Cached key: {}", key);
        self.entries.insert(key, CacheEntry { value, fetched_at });
    }

    fn clear(&self) {
        self.entries.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
