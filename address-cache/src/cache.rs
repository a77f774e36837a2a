use crate::address::Address;
use crate::deduplication::deduplicate_owned;
use crate::error::CacheError;
use crate::identity::{IdentityKey, KeyScheme};
use crate::store::SharedBlobStore;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use strum_macros::{Display, EnumString};
use tokio::sync::Mutex;

/// How concurrent updates of the same record are handled
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum WritePolicy {
    /// Updates read, merge and write without coordination. When two updates
    /// of one identity overlap, the later write wins and addresses only the
    /// earlier one submitted are lost.
    #[default]
    LastWriterWins,
    /// Updates of one identity run one after another. Different identities
    /// still run in parallel.
    Serialized,
}

/// Configuration for the cache coordinator
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheConfig {
    pub policy: WritePolicy,
    pub key_scheme: KeyScheme,
}

/// Receives the outcome of every cache update.
///
/// Updates usually run detached from any caller, so this is the only place
/// their failures become visible.
pub trait CacheObserver: Send + Sync {
    /// A request was answered and its cache update handed off
    fn request_processed(
        &self,
        _key: &IdentityKey,
        _submitted: usize,
        _removed: usize,
        _elapsed: Duration,
    ) {
    }
    fn update_started(&self, _key: &IdentityKey) {}
    fn update_succeeded(&self, key: &IdentityKey, stored: usize);
    fn update_failed(&self, key: &IdentityKey, error: &CacheError);
}

/// Reports update outcomes through the `log` facade
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl CacheObserver for LogObserver {
    fn request_processed(
        &self,
        key: &IdentityKey,
        submitted: usize,
        removed: usize,
        elapsed: Duration,
    ) {
        log::debug!(
            "Processed {} addresses for {} in {:?}, {} duplicates removed",
            submitted,
            key,
            elapsed,
            removed
        );
    }

    fn update_started(&self, key: &IdentityKey) {
        log::debug!("Updating cache for {}", key);
    }

    fn update_succeeded(&self, key: &IdentityKey, stored: usize) {
        log::debug!("Cache for {} now holds {} addresses", key, stored);
    }

    fn update_failed(&self, key: &IdentityKey, error: &CacheError) {
        log::error!("Cache update for {} failed: {}", key, error);
    }
}

/// Counters of cache update outcomes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub in_flight: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Counts update outcomes, then forwards them to an inner observer
pub struct CacheTelemetry {
    in_flight: AtomicUsize,
    succeeded: AtomicUsize,
    failed: AtomicUsize,
    inner: Arc<dyn CacheObserver>,
}

impl Default for CacheTelemetry {
    fn default() -> Self {
        Self::new(Arc::new(LogObserver))
    }
}

impl CacheTelemetry {
    pub fn new(inner: Arc<dyn CacheObserver>) -> Self {
        Self {
            in_flight: AtomicUsize::new(0),
            succeeded: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            inner,
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            in_flight: self.in_flight.load(Ordering::SeqCst),
            succeeded: self.succeeded.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
        }
    }
}

impl CacheObserver for CacheTelemetry {
    fn request_processed(
        &self,
        key: &IdentityKey,
        submitted: usize,
        removed: usize,
        elapsed: Duration,
    ) {
        self.inner.request_processed(key, submitted, removed, elapsed);
    }

    fn update_started(&self, key: &IdentityKey) {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.inner.update_started(key);
    }

    fn update_succeeded(&self, key: &IdentityKey, stored: usize) {
        self.succeeded.fetch_add(1, Ordering::SeqCst);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.inner.update_succeeded(key, stored);
    }

    fn update_failed(&self, key: &IdentityKey, error: &CacheError) {
        self.failed.fetch_add(1, Ordering::SeqCst);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.inner.update_failed(key, error);
    }
}

/// Merges submitted addresses into the stored address set of each identity
pub struct CacheCoordinator {
    store: SharedBlobStore,
    observer: Arc<dyn CacheObserver>,
    config: CacheConfig,
    /// Per-record locks, only used by [`WritePolicy::Serialized`]
    locks: DashMap<String, Arc<Mutex<()>>>,
}

pub type SharedCacheCoordinator = Arc<CacheCoordinator>;

impl CacheCoordinator {
    pub fn new(
        store: SharedBlobStore,
        observer: Arc<dyn CacheObserver>,
        config: CacheConfig,
    ) -> Self {
        Self {
            store,
            observer,
            config,
            locks: DashMap::new(),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Stored addresses of an identity, empty if nothing was stored yet
    pub async fn load(&self, key: &IdentityKey) -> Result<Vec<Address>, CacheError> {
        let record = key.record_name(self.config.key_scheme);
        self.load_record(&record).await
    }

    /// Merge `addresses` into the stored set of `key` and return the size of
    /// the stored set.
    ///
    /// The outcome is also reported to the observer.
    pub async fn update(
        &self,
        key: &IdentityKey,
        addresses: Vec<Address>,
    ) -> Result<usize, CacheError> {
        self.observer.update_started(key);

        let record = key.record_name(self.config.key_scheme);
        let result = match self.config.policy {
            WritePolicy::LastWriterWins => self.merge_and_store(&record, addresses).await,
            WritePolicy::Serialized => {
                let lock = self.lock_for(&record);
                let result = {
                    let _guard = lock.lock().await;
                    self.merge_and_store(&record, addresses).await
                };
                drop(lock);
                self.release_lock(&record);
                result
            }
        };

        match &result {
            Ok(stored) => self.observer.update_succeeded(key, *stored),
            Err(e) => self.observer.update_failed(key, e),
        }
        result
    }

    async fn load_record(&self, record: &str) -> Result<Vec<Address>, CacheError> {
        match self.store.read(record).await? {
            Some(bytes) => {
                serde_json::from_slice(&bytes).map_err(|source| CacheError::Decode {
                    record: record.to_string(),
                    source,
                })
            }
            None => Ok(vec![]),
        }
    }

    async fn merge_and_store(
        &self,
        record: &str,
        addresses: Vec<Address>,
    ) -> Result<usize, CacheError> {
        let mut merged = self.load_record(record).await?;
        merged.extend(addresses);

        let unique = deduplicate_owned(merged).unique;
        let bytes = serde_json::to_vec(&unique)?;
        self.store.write(record, bytes).await?;

        Ok(unique.len())
    }

    fn lock_for(&self, record: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(record.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn release_lock(&self, record: &str) {
        // the map holds the last reference once no task waits on the lock
        self.locks
            .remove_if(record, |_, lock| Arc::strong_count(lock) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{BlobStore, FileBlobStore, MemoryBlobStore};
    use std::str::FromStr;
    use tempdir::TempDir;

    fn coordinator(store: SharedBlobStore, config: CacheConfig) -> CacheCoordinator {
        CacheCoordinator::new(store, Arc::new(LogObserver), config)
    }

    fn addr(country: &str, city: &str) -> Address {
        Address::new(country, city)
    }

    #[tokio::test]
    async fn test_load_without_record_is_empty() {
        let cache = coordinator(Arc::new(MemoryBlobStore::new()), CacheConfig::default());
        let loaded = cache.load(&IdentityKey::new("John", "Doe")).await.unwrap();
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_update_merges_with_existing_record() {
        let dir = TempDir::new("cache").unwrap();
        let config = CacheConfig {
            key_scheme: KeyScheme::Legacy,
            ..Default::default()
        };
        let cache = coordinator(Arc::new(FileBlobStore::new(dir.path())), config);
        let key = IdentityKey::new("John", "Doe");

        cache.update(&key, vec![addr("USA", "Baltimore")]).await.unwrap();
        let stored = cache
            .update(&key, vec![addr("USA", "Baltimore"), addr("USA", "Baltimore")])
            .await
            .unwrap();

        assert_eq!(stored, 1);
        assert_eq!(cache.load(&key).await.unwrap(), vec![addr("USA", "Baltimore")]);

        let raw = std::fs::read_to_string(dir.path().join("John_Doe.json")).unwrap();
        let on_disk: Vec<Address> = serde_json::from_str(&raw).unwrap();
        assert_eq!(on_disk, vec![addr("USA", "Baltimore")]);
    }

    #[tokio::test]
    async fn test_update_grows_set() {
        let cache = coordinator(Arc::new(MemoryBlobStore::new()), CacheConfig::default());
        let key = IdentityKey::new("Jane", "Roe");

        cache.update(&key, vec![addr("France", "Paris")]).await.unwrap();
        cache
            .update(&key, vec![addr("France", "Lyon"), addr("France", "Paris")])
            .await
            .unwrap();

        assert_eq!(
            cache.load(&key).await.unwrap(),
            vec![addr("France", "Paris"), addr("France", "Lyon")]
        );
    }

    #[tokio::test]
    async fn test_update_with_long_legacy_name() {
        let dir = TempDir::new("cache").unwrap();
        let config = CacheConfig {
            key_scheme: KeyScheme::Legacy,
            ..Default::default()
        };
        let cache = coordinator(Arc::new(FileBlobStore::new(dir.path())), config);
        let key = IdentityKey::new("x".repeat(300), "Doe");

        cache.update(&key, vec![addr("USA", "Boston")]).await.unwrap();

        assert_eq!(cache.load(&key).await.unwrap(), vec![addr("USA", "Boston")]);
    }

    #[tokio::test]
    async fn test_identities_are_independent() {
        let cache = coordinator(Arc::new(MemoryBlobStore::new()), CacheConfig::default());
        let john = IdentityKey::new("John", "Doe");
        let jane = IdentityKey::new("Jane", "Doe");

        cache.update(&john, vec![addr("USA", "Boston")]).await.unwrap();

        assert!(cache.load(&jane).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_record_fails_update_and_is_kept() {
        let store = Arc::new(MemoryBlobStore::new());
        let cache = coordinator(store.clone(), CacheConfig::default());
        let key = IdentityKey::new("John", "Doe");
        let record = key.record_name(KeyScheme::Hashed);
        store.write(&record, b"{not json".to_vec()).await.unwrap();

        let err = cache.update(&key, vec![addr("USA", "Boston")]).await.unwrap_err();

        assert!(matches!(err, CacheError::Decode { .. }));
        assert!(matches!(cache.load(&key).await, Err(CacheError::Decode { .. })));
        assert_eq!(store.read(&record).await.unwrap(), Some(b"{not json".to_vec()));
    }

    #[tokio::test]
    async fn test_telemetry_counts_outcomes() {
        let store = Arc::new(MemoryBlobStore::new());
        let telemetry = Arc::new(CacheTelemetry::default());
        let cache = CacheCoordinator::new(store.clone(), telemetry.clone(), CacheConfig::default());
        let good = IdentityKey::new("John", "Doe");
        let bad = IdentityKey::new("Bad", "Record");
        store
            .write(&bad.record_name(KeyScheme::Hashed), b"oops".to_vec())
            .await
            .unwrap();

        cache.update(&good, vec![addr("USA", "Boston")]).await.unwrap();
        let _ = cache.update(&bad, vec![addr("USA", "Boston")]).await;

        assert_eq!(
            telemetry.stats(),
            CacheStats {
                in_flight: 0,
                succeeded: 1,
                failed: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_serialized_policy_releases_locks() {
        let config = CacheConfig {
            policy: WritePolicy::Serialized,
            ..Default::default()
        };
        let cache = coordinator(Arc::new(MemoryBlobStore::new()), config);
        let key = IdentityKey::new("John", "Doe");

        cache.update(&key, vec![addr("USA", "Boston")]).await.unwrap();

        assert!(cache.locks.is_empty());
    }

    #[test]
    fn test_policy_names() {
        assert_eq!(
            WritePolicy::from_str("last-writer-wins").unwrap(),
            WritePolicy::LastWriterWins
        );
        assert_eq!(WritePolicy::from_str("serialized").unwrap(), WritePolicy::Serialized);
        assert_eq!(WritePolicy::LastWriterWins.to_string(), "last-writer-wins");
    }
}
