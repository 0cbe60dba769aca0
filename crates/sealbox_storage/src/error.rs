//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The configured storage root directory does not exist.
    #[error("storage root does not exist: {path}")]
    RootNotFound {
        /// The missing root path.
        path: String,
    },

    /// The ciphertext artifact for a key does not exist.
    #[error("no data artifact for key {key:?}")]
    NotFound {
        /// The key that was looked up.
        key: String,
    },

    /// The IV artifact for a key does not exist.
    ///
    /// When the ciphertext artifact *does* exist this signals a partial
    /// or corrupted entry.
    #[error("no initialization vector artifact for key {key:?}")]
    IvNotFound {
        /// The key that was looked up.
        key: String,
    },

    /// The key cannot be used as an artifact filename stem.
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey {
        /// The offending key.
        key: String,
        /// Why the key was rejected.
        reason: String,
    },
}

impl StorageError {
    /// Creates a root-not-found error.
    pub fn root_not_found(path: impl Into<String>) -> Self {
        Self::RootNotFound { path: path.into() }
    }

    /// Creates a not-found error for the ciphertext artifact.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Creates an IV-not-found error.
    pub fn iv_not_found(key: impl Into<String>) -> Self {
        Self::IvNotFound { key: key.into() }
    }

    /// Creates an invalid-key error.
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
