//! storage::mock
//!
//! Mock object store for deterministic testing.
//!
//! # Design
//!
//! The mock stores uploaded objects in memory and registers each one in
//! a shared [`SourceRegistry`]. A [`crate::catalog::mock::MockCatalog`]
//! built over the same registry resolves import URIs through it, which
//! makes the upload-before-import ordering property directly
//! observable: importing a URI that was never uploaded fails.
//!
//! # Example
//!
//! ```
//! use landfall::storage::mock::{MockObjectStore, SourceRegistry};
//! use landfall::storage::ObjectStore;
//!
//! # tokio_test::block_on(async {
//! let registry = SourceRegistry::new();
//! let store = MockObjectStore::new(registry.clone());
//!
//! let uri = store.put(b"{\"a\":1}\n{\"a\":2}\n", "bucket", "raw/x.ndjson")
//!     .await
//!     .unwrap();
//! assert_eq!(uri, "s3://bucket/raw/x.ndjson");
//! assert_eq!(registry.rows_for(&uri), Some(2));
//! # });
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::traits::{ObjectStore, StorageError};

/// Shared map from staged content URI to its record count.
///
/// Rows are counted as non-empty NDJSON lines at upload time. Cloning
/// shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    inner: Arc<Mutex<HashMap<String, u64>>>,
}

impl SourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a staged source and its record count.
    pub fn register(&self, uri: impl Into<String>, rows: u64) {
        let mut inner = self.inner.lock().unwrap();
        inner.insert(uri.into(), rows);
    }

    /// Look up the record count of a staged source.
    pub fn rows_for(&self, uri: &str) -> Option<u64> {
        let inner = self.inner.lock().unwrap();
        inner.get(uri).copied()
    }
}

/// Recorded upload for test verification.
#[derive(Debug, Clone)]
pub struct MockUpload {
    pub bucket: String,
    pub key: String,
    pub bytes: usize,
    pub rows: u64,
}

/// Mock object store.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone)]
pub struct MockObjectStore {
    registry: SourceRegistry,
    inner: Arc<Mutex<MockStoreInner>>,
}

#[derive(Debug, Default)]
struct MockStoreInner {
    /// Recorded uploads, in order.
    uploads: Vec<MockUpload>,
    /// Error to return from the next `put`, if configured.
    fail_with: Option<StorageError>,
}

impl MockObjectStore {
    /// Create a mock store registering sources in `registry`.
    pub fn new(registry: SourceRegistry) -> Self {
        Self {
            registry,
            inner: Arc::new(Mutex::new(MockStoreInner::default())),
        }
    }

    /// Configure every subsequent `put` to fail with `error`.
    pub fn fail_with(self, error: StorageError) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_with = Some(error);
        }
        self
    }

    /// Get all recorded uploads.
    pub fn uploads(&self) -> Vec<MockUpload> {
        let inner = self.inner.lock().unwrap();
        inner.uploads.clone()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn put(&self, bytes: &[u8], bucket: &str, key: &str) -> Result<String, StorageError> {
        {
            let inner = self.inner.lock().unwrap();
            if let Some(error) = &inner.fail_with {
                return Err(error.clone());
            }
        }

        let rows = bytes
            .split(|b| *b == b'\n')
            .filter(|line| !line.is_empty())
            .count() as u64;
        let uri = format!("s3://{}/{}", bucket, key);
        self.registry.register(&uri, rows);

        let mut inner = self.inner.lock().unwrap();
        inner.uploads.push(MockUpload {
            bucket: bucket.to_string(),
            key: key.to_string(),
            bytes: bytes.len(),
            rows,
        });
        Ok(uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_registers_row_count() {
        let registry = SourceRegistry::new();
        let store = MockObjectStore::new(registry.clone());

        let uri = store
            .put(b"line1\nline2\nline3\n", "b", "raw/k.ndjson")
            .await
            .unwrap();

        assert_eq!(uri, "s3://b/raw/k.ndjson");
        assert_eq!(registry.rows_for(&uri), Some(3));
        assert_eq!(store.uploads().len(), 1);
        assert_eq!(store.uploads()[0].rows, 3);
    }

    #[tokio::test]
    async fn unknown_uri_is_unregistered() {
        let registry = SourceRegistry::new();
        assert_eq!(registry.rows_for("s3://b/missing"), None);
    }

    #[tokio::test]
    async fn configured_failure_is_returned() {
        let registry = SourceRegistry::new();
        let store = MockObjectStore::new(registry.clone())
            .fail_with(StorageError::NetworkError("unreachable".into()));

        let result = store.put(b"x\n", "b", "k").await;
        assert!(matches!(result, Err(StorageError::NetworkError(_))));
        // Nothing registered on failure.
        assert_eq!(registry.rows_for("s3://b/k"), None);
    }
}
