use std::io;

/// Errors raised while reading or writing a cache record
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("I/O error on cache record {record}: {source}")]
    Io {
        record: String,
        #[source]
        source: io::Error,
    },
    #[error("Cache record {record} is not a valid address list: {source}")]
    Decode {
        record: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode addresses: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CacheError {
    pub(crate) fn io(record: &str, source: io::Error) -> Self {
        CacheError::Io {
            record: record.to_string(),
            source,
        }
    }
}

/// Errors raised on the request path
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("No async runtime available to run the cache update")]
    NoRuntime,
}
