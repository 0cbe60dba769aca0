//! Key material handling and the key supplier seam.
//!
//! The engine never persists or caches the encryption key itself; it asks a
//! [`KeySupplier`] for it on every operation. Suppliers own the key's
//! lifecycle, including secure erasure: all [`KeyBytes`] copies overwrite
//! their contents when dropped.
//!
//! Platform-backed suppliers (hardware keystore, keychain) are external
//! adapters; this module ships a caching random supplier and a static one.

use crate::error::CoreResult;
use parking_lot::Mutex;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Raw symmetric key material.
///
/// The bytes are zeroized when the value is dropped, and `Debug` output is
/// redacted so key material cannot leak through logging.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyBytes {
    bytes: Vec<u8>,
}

impl KeyBytes {
    /// Wraps caller-provided key bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// Generates `len` random key bytes from a cryptographically secure
    /// source.
    #[must_use]
    pub fn generate(len: usize) -> Self {
        let mut bytes = vec![0u8; len];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Returns the key as a byte slice.
    ///
    /// # Security
    ///
    /// Be careful with this method - don't log or serialize the result.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the key length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the key is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for KeyBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyBytes")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Produces the symmetric encryption key for the engine.
///
/// # Contract
///
/// - `key` must return the same key on every call within a process
///   lifetime, so entries written earlier remain decryptable
/// - Implementations own secure erasure of any cached material; dropping
///   the supplier must not leave key bytes readable in memory
pub trait KeySupplier: Send + Sync {
    /// Returns the encryption key.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing key source is unavailable.
    fn key(&self) -> CoreResult<KeyBytes>;
}

/// A supplier that generates a random key on first use and caches it.
///
/// The cached key lives for the supplier's lifetime and is zeroized on
/// drop. Entries written through it are unreadable once the supplier is
/// gone, which makes this fit for ephemeral stores and tests; durable
/// deployments want a supplier backed by a platform secure store.
pub struct CachingKeySupplier {
    len: usize,
    cached: Mutex<Option<KeyBytes>>,
}

impl CachingKeySupplier {
    /// Creates a supplier that will generate a key of `len` bytes.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            len,
            cached: Mutex::new(None),
        }
    }
}

impl KeySupplier for CachingKeySupplier {
    fn key(&self) -> CoreResult<KeyBytes> {
        let mut cached = self.cached.lock();
        let key = cached.get_or_insert_with(|| KeyBytes::generate(self.len));
        Ok(key.clone())
    }
}

impl std::fmt::Debug for CachingKeySupplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingKeySupplier")
            .field("len", &self.len)
            .finish()
    }
}

/// A supplier over externally managed key bytes.
///
/// Useful when the key comes from an outside secure store, and in tests
/// that need a deterministic key across engine instances.
pub struct StaticKeySupplier {
    key: KeyBytes,
}

impl StaticKeySupplier {
    /// Wraps the given key bytes.
    #[must_use]
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            key: KeyBytes::from_bytes(bytes),
        }
    }
}

impl KeySupplier for StaticKeySupplier {
    fn key(&self) -> CoreResult<KeyBytes> {
        Ok(self.key.clone())
    }
}

impl std::fmt::Debug for StaticKeySupplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticKeySupplier")
            .field("key", &self.key)
            .finish()
    }
}
