//! storage::traits
//!
//! Object storage trait for staging raw data.
//!
//! # Design
//!
//! Generated or ingested payloads are staged in object storage before
//! the catalog imports them; the catalog only ever sees a URI. The
//! trait is deliberately narrow: orchestrators need `put` and nothing
//! else (no listing, no deletion — staged objects are cheap and the
//! catalog references them by content URI).

use async_trait::async_trait;
use thiserror::Error;

/// Errors from object storage operations.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// Authentication failed.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The store rejected the request.
    #[error("storage error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the store
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),
}

/// Object storage used to stage data before import.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async
/// tasks.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Get the store implementation name (e.g. "http", "mock").
    fn name(&self) -> &'static str;

    /// Upload `bytes` to `bucket` under `key`.
    ///
    /// Returns the content URI (`s3://bucket/key`) that the catalog
    /// imports from. The upload has fully completed when this returns:
    /// callers rely on that to order upload before import.
    async fn put(&self, bytes: &[u8], bucket: &str, key: &str) -> Result<String, StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_display() {
        assert_eq!(
            format!("{}", StorageError::AuthFailed("bad creds".into())),
            "authentication failed: bad creds"
        );
        assert_eq!(
            format!(
                "{}",
                StorageError::ApiError {
                    status: 403,
                    message: "denied".into()
                }
            ),
            "storage error: 403 - denied"
        );
        assert_eq!(
            format!("{}", StorageError::NetworkError("timed out".into())),
            "network error: timed out"
        );
    }
}
