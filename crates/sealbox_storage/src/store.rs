//! Storage provider trait definition.

use crate::error::{StorageError, StorageResult};
use std::io::{Read, Write};

/// Extension of the ciphertext artifact.
pub const DATA_EXTENSION: &str = "cst";
/// Extension of the initialization-vector artifact.
pub const IV_EXTENSION: &str = "iv";

/// A raw storage provider for sealbox entries.
///
/// Providers are **opaque byte stores**. Each logical key maps to a pair of
/// artifacts - a ciphertext blob and an IV blob - and the provider offers
/// existence checks, streaming handles, deletion, and a root-wide purge.
/// The encryption engine owns all interpretation of the bytes.
///
/// # Invariants
///
/// - `contains` is true iff *both* artifacts exist for the key
/// - `delete` is idempotent; deleting an absent key is a no-op
/// - `clean` only touches artifacts carrying the two known extensions
/// - Providers must be `Send + Sync` for concurrent access
///
/// # Implementors
///
/// - [`super::MemoryStore`] - For testing
/// - [`super::DirStore`] - For persistent storage
pub trait BlobStore: Send + Sync {
    /// Opens (or creates) a streaming write handle for the ciphertext
    /// artifact of `key`.
    ///
    /// The caller must drop the handle to release it; data written through
    /// it is visible to readers once the handle is flushed and dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or an I/O error occurs.
    fn writer(&self, key: &str) -> StorageResult<Box<dyn Write + Send>>;

    /// Opens a streaming read handle for the ciphertext artifact of `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if the artifact does not exist.
    fn reader(&self, key: &str) -> StorageResult<Box<dyn Read + Send>>;

    /// Persists the IV artifact for `key` as a whole.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or an I/O error occurs.
    fn write_iv(&self, key: &str, iv: &[u8]) -> StorageResult<()>;

    /// Retrieves the IV artifact for `key` as a whole.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::IvNotFound`] if the artifact does not exist.
    fn read_iv(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Returns true iff both artifacts exist for `key`.
    ///
    /// Never fails: malformed keys simply report `false`.
    fn contains(&self, key: &str) -> bool;

    /// Removes both artifacts of `key` if present.
    ///
    /// Removing an absent key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or deletion fails.
    fn delete(&self, key: &str) -> StorageResult<()>;

    /// Removes every artifact pair under the storage root.
    ///
    /// Files that do not carry one of the two known extensions are left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if enumeration or deletion fails.
    fn clean(&self) -> StorageResult<()>;
}

/// Validates that `key` can be used verbatim as an artifact filename stem.
///
/// Keys must be non-empty and must not contain path separators or NUL,
/// nor name the current or parent directory. The allowed character set is
/// a documented precondition rather than an escaping layer.
///
/// # Errors
///
/// Returns [`StorageError::InvalidKey`] describing the violation.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::invalid_key(key, "key must not be empty"));
    }
    if key == "." || key == ".." {
        return Err(StorageError::invalid_key(key, "key must name an entry"));
    }
    if key.contains(['/', '\\', '\0']) {
        return Err(StorageError::invalid_key(
            key,
            "key must not contain path separators or NUL",
        ));
    }
    Ok(())
}
