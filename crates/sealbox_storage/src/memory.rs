//! In-memory storage provider for testing.

use crate::error::{StorageError, StorageResult};
use crate::store::{validate_key, BlobStore};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::sync::Arc;

/// An in-memory storage provider.
///
/// This provider keeps all artifacts in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral stores that don't need persistence
///
/// Cloning yields a handle to the same underlying store, which lets tests
/// keep a view on the artifacts after handing the store to an engine.
///
/// # Thread Safety
///
/// This provider is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use sealbox_storage::{BlobStore, MemoryStore};
///
/// let store = MemoryStore::new();
/// store.write_iv("k", &[0u8; 16]).unwrap();
/// assert!(!store.contains("k")); // ciphertext artifact still missing
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Shared>,
}

#[derive(Debug, Default)]
struct Shared {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
    ivs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the ciphertext artifact for `key`, if present.
    ///
    /// Useful for asserting on stored ciphertext in tests.
    #[must_use]
    pub fn blob(&self, key: &str) -> Option<Vec<u8>> {
        self.inner.blobs.read().get(key).cloned()
    }

    /// Returns the number of ciphertext artifacts currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.blobs.read().len()
    }

    /// Returns true if no ciphertext artifacts are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.blobs.read().is_empty()
    }
}

/// Write handle that publishes its buffer to the store when dropped.
struct MemoryWriter {
    key: String,
    buf: Vec<u8>,
    inner: Arc<Shared>,
}

impl Write for MemoryWriter {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Drop for MemoryWriter {
    fn drop(&mut self) {
        self.inner
            .blobs
            .write()
            .insert(std::mem::take(&mut self.key), std::mem::take(&mut self.buf));
    }
}

impl BlobStore for MemoryStore {
    fn writer(&self, key: &str) -> StorageResult<Box<dyn Write + Send>> {
        validate_key(key)?;
        Ok(Box::new(MemoryWriter {
            key: key.to_owned(),
            buf: Vec::new(),
            inner: Arc::clone(&self.inner),
        }))
    }

    fn reader(&self, key: &str) -> StorageResult<Box<dyn Read + Send>> {
        validate_key(key)?;
        let blob = self
            .inner
            .blobs
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::not_found(key))?;
        Ok(Box::new(Cursor::new(blob)))
    }

    fn write_iv(&self, key: &str, iv: &[u8]) -> StorageResult<()> {
        validate_key(key)?;
        self.inner.ivs.write().insert(key.to_owned(), iv.to_vec());
        Ok(())
    }

    fn read_iv(&self, key: &str) -> StorageResult<Vec<u8>> {
        validate_key(key)?;
        self.inner
            .ivs
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::iv_not_found(key))
    }

    fn contains(&self, key: &str) -> bool {
        validate_key(key).is_ok()
            && self.inner.blobs.read().contains_key(key)
            && self.inner.ivs.read().contains_key(key)
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        validate_key(key)?;
        self.inner.blobs.write().remove(key);
        self.inner.ivs.write().remove(key);
        Ok(())
    }

    fn clean(&self) -> StorageResult<()> {
        self.inner.blobs.write().clear();
        self.inner.ivs.write().clear();
        Ok(())
    }
}
