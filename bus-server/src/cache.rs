//! Caching layer for loaded snapshots.
//!
//! Building a snapshot reads every stop and route and rebuilds the transfer
//! and place indexes, so the result is kept for a while and shared between
//! requests. When the entry expires the next request reloads it; concurrent
//! requests during a reload wait for the same load.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::{debug, warn};

use crate::store::{SnapshotLoader, StoreError, TransitStore};

/// There is one snapshot per server.
type SnapshotKey = ();

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for a loaded snapshot.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl CacheConfig {
    /// Create a config with the given TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            ..Self::default()
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 1,
        }
    }
}

/// Loader with a cached snapshot.
pub struct SnapshotCache {
    loader: SnapshotLoader,
    snapshots: MokaCache<SnapshotKey, Arc<TransitStore>>,
}

impl SnapshotCache {
    /// Create a new cache with the given configuration.
    pub fn new(loader: SnapshotLoader, config: &CacheConfig) -> Self {
        let snapshots = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { loader, snapshots }
    }

    /// Get the current snapshot, loading it if absent or expired.
    pub async fn get(&self) -> Result<Arc<TransitStore>, Arc<StoreError>> {
        if let Some(store) = self.snapshots.get(&()).await {
            return Ok(store);
        }

        debug!("snapshot not cached, loading");
        self.snapshots
            .try_get_with((), async { self.loader.load().await.map(Arc::new) })
            .await
            .inspect_err(|e| warn!(error = %e, "failed to load snapshot"))
    }

    /// Replace the cached snapshot.
    pub async fn insert(&self, store: TransitStore) {
        self.snapshots.insert((), Arc::new(store)).await;
    }

    /// Drop the cached snapshot so the next request reloads it.
    pub fn invalidate(&self) {
        self.snapshots.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StopId;
    use crate::store::{Source, fixtures};

    fn cache_for(stops: std::path::PathBuf, routes: std::path::PathBuf) -> SnapshotCache {
        let loader = SnapshotLoader::new(Source::File(stops), Source::File(routes)).unwrap();
        SnapshotCache::new(loader, &CacheConfig::default())
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert_eq!(config.max_capacity, 1);

        let config = CacheConfig::with_ttl(Duration::from_secs(5));
        assert_eq!(config.ttl, Duration::from_secs(5));
        assert_eq!(config.max_capacity, 1);
    }

    #[tokio::test]
    async fn loads_once_and_shares_snapshot() {
        let (_dir, stops, routes) = fixtures::write();
        let cache = cache_for(stops, routes);

        let first = cache.get().await.unwrap();
        let second = cache.get().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.network().stops().len(), 5);
    }

    #[tokio::test]
    async fn cached_snapshot_survives_source_changes_until_invalidated() {
        let (_dir, stops, routes) = fixtures::write();
        let cache = cache_for(stops.clone(), routes);

        assert!(cache.get().await.unwrap().stop(StopId::new(5)).is_some());

        std::fs::write(
            &stops,
            r#"[{"id": 1, "name": {"en": "Hledan", "mm": ""}, "lat": 16.8, "lng": 96.1},
                {"id": 2, "name": {"en": "Myaynigone", "mm": ""}, "lat": 16.8, "lng": 96.1},
                {"id": 3, "name": {"en": "Sule", "mm": ""}, "lat": 16.7, "lng": 96.1},
                {"id": 4, "name": {"en": "Hledan", "mm": ""}, "lat": 16.8, "lng": 96.1}]"#,
        )
        .unwrap();
        assert!(cache.get().await.unwrap().stop(StopId::new(5)).is_some());

        cache.invalidate();

        // Route 61 now calls at a stop that no longer exists
        let err = cache.get().await.unwrap_err();
        assert!(matches!(*err, StoreError::Network(_)));
    }

    #[tokio::test]
    async fn failed_load_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_for(dir.path().join("stops.json"), dir.path().join("routes.json"));

        assert!(cache.get().await.is_err());

        std::fs::write(dir.path().join("stops.json"), fixtures::STOPS).unwrap();
        std::fs::write(dir.path().join("routes.json"), fixtures::ROUTES).unwrap();

        assert!(cache.get().await.is_ok());
    }

    #[tokio::test]
    async fn insert_replaces_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_for(dir.path().join("stops.json"), dir.path().join("routes.json"));

        let stops = serde_json::from_str(fixtures::STOPS).unwrap();
        cache
            .insert(TransitStore::new(stops, Vec::new()).unwrap())
            .await;

        let store = cache.get().await.unwrap();
        assert!(store.network().routes().is_empty());
    }
}
