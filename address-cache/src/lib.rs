// Address deduplication and the per-person address cache behind it

pub mod address;
pub mod cache;
pub mod deduplication;
pub mod dispatch;
mod error;
pub mod identity;
pub mod processor;
pub mod store;


pub use address::{Address, ProcessRequest, ProcessResponse, ProcessingInfo};
pub use cache::{
    CacheConfig, CacheCoordinator, CacheObserver, CacheStats, CacheTelemetry, LogObserver,
    SharedCacheCoordinator, WritePolicy,
};
pub use deduplication::{deduplicate, deduplicate_owned, Deduplicated};
pub use dispatch::Dispatcher;
pub use error::{CacheError, ProcessError};
pub use identity::{IdentityKey, KeyScheme};
pub use processor::AddressProcessor;
pub use store::{BlobStore, FileBlobStore, MemoryBlobStore, SharedBlobStore};
