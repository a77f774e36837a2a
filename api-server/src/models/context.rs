use super::config::Config;
use address_cache::{
    AddressProcessor, CacheCoordinator, CacheTelemetry, FileBlobStore, LogObserver,
};
use getset::Getters;
use log::info;
use std::sync::Arc;

#[derive(Getters)]
#[get = "pub"]
pub struct Context {
    processor: AddressProcessor,
    config: Config,
}

impl Context {
    pub fn new(config: Config) -> Self {
        let store = Arc::new(FileBlobStore::new(config.cache_dir().clone()));
        let telemetry = Arc::new(CacheTelemetry::new(Arc::new(LogObserver)));
        let cache_config = config.cache_config();
        let coordinator = Arc::new(CacheCoordinator::new(store, telemetry.clone(), cache_config));

        info!(
            "Initialized address cache in {} (write policy: {}, key scheme: {})",
            config.cache_dir().display(),
            cache_config.policy,
            cache_config.key_scheme
        );

        Self {
            processor: AddressProcessor::new(coordinator, telemetry),
            config,
        }
    }
}

pub type ContextPointer = Arc<Context>;
