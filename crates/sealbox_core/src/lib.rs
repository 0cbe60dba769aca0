//! # Sealbox Core
//!
//! Local encrypted key-value blob store.
//!
//! Callers write named byte streams which are transparently encrypted at
//! rest, and later read them back by name. This crate provides:
//! - [`Vault`] - the storage/encryption engine
//! - [`CipherProvider`] / [`StreamTransform`] - the pluggable cipher seam,
//!   with [`AesCbcProvider`] as the default adapter
//! - [`KeySupplier`] / [`KeyBytes`] - the pluggable key seam with
//!   zeroize-on-drop key material
//!
//! Raw artifact storage lives in the `sealbox_storage` crate; its
//! [`BlobStore`] trait and providers are re-exported here for
//! convenience.
//!
//! ## Security Model
//!
//! - Fresh random IV per entry, persisted alongside the ciphertext
//! - The encryption key is fetched from the supplier per operation and
//!   never persisted; cached copies are zeroized on drop
//! - The default cipher is AES-128-CBC with PKCS#7 padding:
//!   **confidentiality only**, no integrity or authenticity tag
//! - Same-key operations are serialized in-process; cross-process
//!   coordination is out of scope
//!
//! ## Example
//!
//! ```rust
//! use sealbox_core::{AesCbcProvider, CachingKeySupplier, MemoryStore, Vault};
//!
//! let vault = Vault::with_store(
//!     Box::new(MemoryStore::new()),
//!     Box::new(CachingKeySupplier::new(16)),
//!     Box::new(AesCbcProvider::new()),
//! )
//! .unwrap();
//!
//! vault.add_string("alpha", "hello world").unwrap();
//! assert_eq!(vault.get_string("alpha").unwrap(), "hello world");
//! assert!(vault.contains("alpha"));
//!
//! vault.delete("alpha").unwrap();
//! assert!(!vault.contains("alpha"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod cipher;
mod engine;
mod error;
mod key;
mod locks;

pub use cipher::{AesCbcProvider, CipherProvider, StreamTransform};
pub use engine::Vault;
pub use error::{CoreError, CoreResult};
pub use key::{CachingKeySupplier, KeyBytes, KeySupplier, StaticKeySupplier};

pub use sealbox_storage::{BlobStore, DirStore, MemoryStore, StorageError};
