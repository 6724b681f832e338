//! Caching layer for geocoding responses.
//!
//! The picker re-issues near-identical lookups constantly: the debounce
//! fires on every pause while typing, and reverse lookups repeat whenever
//! a forward variant returns the same coordinates. Caching by normalized
//! query text and by quantized coordinate bounds cardinality while keeping
//! entries fresh enough for an interactive picker.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache as MokaCache;

use crate::domain::{Coordinate, StructuredAddress};
use crate::geo::{GeoError, GeoProvider};

/// Quantized coordinate key (1e-5 degrees, ~1 m).
type CoordKey = (i64, i64);

/// Configuration for the geocode cache.
#[derive(Debug, Clone)]
pub struct GeoCacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries per cache.
    pub max_capacity: u64,
}

impl Default for GeoCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5 * 60),
            max_capacity: 1000,
        }
    }
}

/// A [`GeoProvider`] wrapper that caches successful responses.
///
/// Only successes are cached: a transient provider failure must stay
/// retryable on the next keystroke.
pub struct CachedGeoProvider<P> {
    inner: Arc<P>,
    forward: MokaCache<String, Arc<Vec<Coordinate>>>,
    reverse: MokaCache<CoordKey, Arc<Vec<StructuredAddress>>>,
}

impl<P: GeoProvider> CachedGeoProvider<P> {
    /// Wrap a provider with the given cache configuration.
    pub fn new(inner: Arc<P>, config: &GeoCacheConfig) -> Self {
        let forward = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let reverse = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            inner,
            forward,
            reverse,
        }
    }

    /// Normalize a query for use as a cache key.
    fn forward_key(query: &str) -> String {
        query.trim().to_lowercase()
    }

    /// Number of cached forward entries (for monitoring).
    pub fn forward_entry_count(&self) -> u64 {
        self.forward.entry_count()
    }

    /// Number of cached reverse entries (for monitoring).
    pub fn reverse_entry_count(&self) -> u64 {
        self.reverse.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.forward.invalidate_all();
        self.reverse.invalidate_all();
    }
}

#[async_trait]
impl<P: GeoProvider> GeoProvider for CachedGeoProvider<P> {
    async fn forward(&self, query: &str) -> Result<Vec<Coordinate>, GeoError> {
        let key = Self::forward_key(query);

        if let Some(cached) = self.forward.get(&key).await {
            return Ok(cached.as_ref().clone());
        }

        let matches = self.inner.forward(query).await?;
        self.forward.insert(key, Arc::new(matches.clone())).await;
        Ok(matches)
    }

    async fn reverse(&self, position: Coordinate) -> Result<Vec<StructuredAddress>, GeoError> {
        let key = position.key_e5();

        if let Some(cached) = self.reverse.get(&key).await {
            return Ok(cached.as_ref().clone());
        }

        let addresses = self.inner.reverse(position).await?;
        self.reverse
            .insert(key, Arc::new(addresses.clone()))
            .await;
        Ok(addresses)
    }
}
