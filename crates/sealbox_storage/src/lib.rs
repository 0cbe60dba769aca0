//! # Sealbox Storage
//!
//! Artifact storage provider for sealbox.
//!
//! This crate provides the lowest-level storage abstraction for sealbox.
//! A logical entry is stored as a **pair of artifacts**: a ciphertext blob
//! and an initialization-vector blob, named deterministically from the
//! entry key. Storage providers are opaque byte stores - they never
//! interpret, encrypt, or decrypt the data they hold.
//!
//! ## Design Principles
//!
//! - Providers map keys to artifact pairs and move bytes, nothing more
//! - An entry is present iff *both* artifacts exist
//! - The encryption engine owns all cipher work; providers see ciphertext
//! - Must be `Send + Sync` for concurrent access
//!
//! ## Available Providers
//!
//! - [`MemoryStore`] - For testing and ephemeral storage
//! - [`DirStore`] - For persistent storage under a root directory
//!
//! ## Example
//!
//! ```rust
//! use sealbox_storage::{BlobStore, MemoryStore};
//! use std::io::Write;
//!
//! let store = MemoryStore::new();
//! store.write_iv("greeting", &[0u8; 16]).unwrap();
//! let mut writer = store.writer("greeting").unwrap();
//! writer.write_all(b"ciphertext bytes").unwrap();
//! drop(writer);
//! assert!(store.contains("greeting"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod dir;
mod error;
mod memory;
mod store;

pub use dir::DirStore;
pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use store::{validate_key, BlobStore, DATA_EXTENSION, IV_EXTENSION};
