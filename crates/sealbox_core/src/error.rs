//! Error types for sealbox core.

use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in sealbox core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage provider error.
    #[error("storage error: {0}")]
    Storage(#[from] sealbox_storage::StorageError),

    /// I/O error on a caller-supplied stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Missing or invalid construction parameters.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the problem.
        message: String,
    },

    /// Write targeting a key that already holds an entry.
    #[error("key {key:?} already exists in the store")]
    DuplicateKey {
        /// The duplicated key.
        key: String,
    },

    /// Read targeting a key with no (complete) entry.
    #[error("key {key:?} does not exist in the store")]
    KeyNotFound {
        /// The missing key.
        key: String,
    },

    /// The key supplier returned less material than the cipher requires.
    #[error("key supplier returned {actual} bytes but the cipher requires at least {expected}")]
    KeyTooShort {
        /// Bytes the supplier returned.
        actual: usize,
        /// Bytes the cipher requires.
        expected: usize,
    },

    /// Encryption or decryption failed.
    #[error("crypto error: {message}")]
    Crypto {
        /// Description of the failure.
        message: String,
    },
}

impl CoreError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a duplicate-key error.
    pub fn duplicate_key(key: impl Into<String>) -> Self {
        Self::DuplicateKey { key: key.into() }
    }

    /// Creates a key-not-found error.
    pub fn key_not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound { key: key.into() }
    }

    /// Creates a key-too-short error.
    pub fn key_too_short(actual: usize, expected: usize) -> Self {
        Self::KeyTooShort { actual, expected }
    }

    /// Creates a crypto error.
    pub fn crypto(message: impl Into<String>) -> Self {
        Self::Crypto {
            message: message.into(),
        }
    }
}
