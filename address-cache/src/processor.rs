use crate::address::{Address, ProcessRequest, ProcessResponse, ProcessingInfo};
use crate::cache::{CacheObserver, CacheStats, CacheTelemetry, SharedCacheCoordinator};
use crate::deduplication::deduplicate;
use crate::dispatch::Dispatcher;
use crate::error::{CacheError, ProcessError};
use crate::identity::IdentityKey;
use std::sync::Arc;
use std::time::Instant;

/// Handles a submitted address list: answers with its deduplicated form and
/// merges the submission into the submitter's cache record in the background.
#[derive(Clone)]
pub struct AddressProcessor {
    cache: SharedCacheCoordinator,
    telemetry: Arc<CacheTelemetry>,
}

impl AddressProcessor {
    /// `telemetry` should be the observer `cache` reports to
    pub fn new(cache: SharedCacheCoordinator, telemetry: Arc<CacheTelemetry>) -> Self {
        Self { cache, telemetry }
    }

    /// Deduplicate the request's own addresses and schedule the cache merge.
    ///
    /// The response never depends on the cache: it is built before the merge
    /// has started and is not affected by its outcome. Merge failures only
    /// reach the cache observer.
    pub fn process(&self, request: ProcessRequest) -> Result<ProcessResponse, ProcessError> {
        let started = Instant::now();
        let dispatcher = Dispatcher::current()?;

        let deduplicated = deduplicate(&request.addresses);

        // the merge gets the submitted list as is, not the deduplicated one
        let key = IdentityKey::new(request.name.clone(), request.last.clone());
        let submitted = request.addresses;
        let submitted_count = submitted.len();
        let cache = self.cache.clone();
        let update_key = key.clone();
        dispatcher.detach(async move {
            // outcome already reported to the observer
            let _ = cache.update(&update_key, submitted).await;
        });

        let time_taken = started.elapsed();
        self.telemetry
            .request_processed(&key, submitted_count, deduplicated.removed, time_taken);

        Ok(ProcessResponse {
            name: request.name,
            last: request.last,
            addresses: deduplicated.unique,
            processing_info: ProcessingInfo {
                time_taken: format!("{:?}", time_taken),
                duplicates_removed: deduplicated.removed,
            },
        })
    }

    /// Stored addresses of a person
    pub async fn cached(&self, name: &str, last: &str) -> Result<Vec<Address>, CacheError> {
        self.cache.load(&IdentityKey::new(name, last)).await
    }

    pub fn stats(&self) -> CacheStats {
        self.telemetry.stats()
    }
}
