//! The encrypted storage engine.

use crate::cipher::{AesCbcProvider, CipherProvider};
use crate::error::{CoreError, CoreResult};
use crate::key::KeySupplier;
use crate::locks::KeyLocks;
use parking_lot::RwLock;
use rand::RngCore;
use sealbox_storage::{BlobStore, DirStore, StorageError};
use std::io::{self, Cursor, Read, Write};
use std::path::Path;
use tracing::debug;

/// Chunk size for streaming payloads through the cipher.
const COPY_CHUNK: usize = 64 * 1024;

/// An encrypted key-value blob store.
///
/// Callers write named byte streams which are encrypted at rest and read
/// them back by name; encryption and decryption are transparent. Each
/// entry gets a fresh IV from a cryptographically secure source, persisted
/// alongside the ciphertext by the storage provider. The key itself comes
/// from the [`KeySupplier`] on every operation and is never persisted.
///
/// Every operation is a self-contained transaction - the vault keeps no
/// cross-call session state. Same-key operations are serialized through an
/// in-process lock table; coordination across processes is the caller's
/// concern. Dropping the vault releases the key supplier (zeroizing any
/// cached key material) but leaves persisted entries untouched.
///
/// # Example
///
/// ```no_run
/// use sealbox_core::{CachingKeySupplier, Vault};
///
/// let supplier = CachingKeySupplier::new(16);
/// let vault = Vault::open("/var/lib/app/secrets", Box::new(supplier)).unwrap();
///
/// vault.add_string("greeting", "hello world").unwrap();
/// assert_eq!(vault.get_string("greeting").unwrap(), "hello world");
/// ```
pub struct Vault {
    store: Box<dyn BlobStore>,
    cipher: Box<dyn CipherProvider>,
    keys: Box<dyn KeySupplier>,
    locks: KeyLocks,
    /// Held shared by per-entry operations, exclusively by `clean`.
    sweep: RwLock<()>,
}

impl Vault {
    /// Opens a vault over an existing storage root with the default
    /// AES-128-CBC cipher.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the root is empty or does not
    /// exist. The root directory is never created by the vault.
    pub fn open(root: impl AsRef<Path>, keys: Box<dyn KeySupplier>) -> CoreResult<Self> {
        Self::open_with_cipher(root, keys, Box::new(AesCbcProvider::new()))
    }

    /// Opens a vault over an existing storage root with a custom cipher
    /// provider.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the root is empty or does not
    /// exist, or if the cipher reports a zero IV or key length.
    pub fn open_with_cipher(
        root: impl AsRef<Path>,
        keys: Box<dyn KeySupplier>,
        cipher: Box<dyn CipherProvider>,
    ) -> CoreResult<Self> {
        let root = root.as_ref();
        if root.as_os_str().is_empty() {
            return Err(CoreError::config("storage root must not be empty"));
        }
        let store = DirStore::open(root).map_err(|err| CoreError::config(err.to_string()))?;
        Self::with_store(Box::new(store), keys, cipher)
    }

    /// Assembles a vault from explicit parts.
    ///
    /// This is the seam for custom storage providers (for instance an
    /// in-memory store in tests).
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the cipher reports a zero IV or
    /// key length.
    pub fn with_store(
        store: Box<dyn BlobStore>,
        keys: Box<dyn KeySupplier>,
        cipher: Box<dyn CipherProvider>,
    ) -> CoreResult<Self> {
        if cipher.iv_len() == 0 || cipher.key_len() == 0 {
            return Err(CoreError::config(
                "cipher provider must report non-zero key and IV lengths",
            ));
        }

        Ok(Self {
            store,
            cipher,
            keys,
            locks: KeyLocks::new(),
            sweep: RwLock::new(()),
        })
    }

    /// Encrypts and stores everything `input` yields under `key`.
    ///
    /// The payload is streamed through the cipher in fixed-size chunks, so
    /// arbitrarily large inputs never need to fit in memory. A fresh IV is
    /// generated for the entry; rewriting an existing key is not allowed.
    ///
    /// A write interrupted by process death can leave a partial entry
    /// behind (IV persisted, ciphertext missing or truncated). Such an
    /// entry reports absent from [`contains`](Self::contains) and fails
    /// clearly on [`read`](Self::read); it is not rolled back.
    ///
    /// # Errors
    ///
    /// - [`CoreError::DuplicateKey`] if the key already holds an entry
    /// - [`CoreError::KeyTooShort`] if the supplier's key is shorter than
    ///   the cipher requires
    /// - I/O and storage errors, surfaced unmodified
    pub fn write(&self, key: &str, input: &mut dyn Read) -> CoreResult<()> {
        let key = normalize_key(key)?;
        let _sweep = self.sweep.read();
        let _entry = self.locks.lock(&key);

        if self.store.contains(&key) {
            return Err(CoreError::duplicate_key(key));
        }

        let material = self.encryption_key()?;
        let mut iv = vec![0u8; self.cipher.iv_len()];
        rand::thread_rng().fill_bytes(&mut iv);

        let mut encryptor = self.cipher.encryptor(&material, &iv)?;
        self.store.write_iv(&key, &iv)?;

        let mut sink = self.store.writer(&key)?;
        let mut buf = vec![0u8; COPY_CHUNK];
        loop {
            let n = match input.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            };
            sink.write_all(&encryptor.update(&buf[..n])?)?;
        }
        sink.write_all(&encryptor.finish()?)?;
        sink.flush()?;
        drop(sink);

        debug!(key = %key, "entry written");
        Ok(())
    }

    /// Decrypts the entry under `key` into `output`.
    ///
    /// Reproduces the original plaintext byte for byte. Truncated or
    /// corrupted ciphertext fails with a crypto error rather than
    /// producing silent garbage of the wrong length.
    ///
    /// # Errors
    ///
    /// - [`CoreError::KeyNotFound`] if no complete entry exists
    /// - [`CoreError::Crypto`] on truncated ciphertext or bad padding
    /// - I/O and storage errors, surfaced unmodified
    pub fn read(&self, key: &str, output: &mut dyn Write) -> CoreResult<()> {
        let key = normalize_key(key)?;
        let _sweep = self.sweep.read();
        let _entry = self.locks.lock(&key);

        if !self.store.contains(&key) {
            return Err(CoreError::key_not_found(key));
        }

        let iv = self.store.read_iv(&key).map_err(|err| match err {
            // IV gone despite the existence check: partial entry.
            StorageError::IvNotFound { key } => CoreError::key_not_found(key),
            other => other.into(),
        })?;

        let material = self.encryption_key()?;
        let mut decryptor = self.cipher.decryptor(&material, &iv)?;

        let mut source = self.store.reader(&key)?;
        let mut buf = vec![0u8; COPY_CHUNK];
        loop {
            let n = match source.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            };
            output.write_all(&decryptor.update(&buf[..n])?)?;
        }
        output.write_all(&decryptor.finish()?)?;
        output.flush()?;

        debug!(key = %key, "entry read");
        Ok(())
    }

    /// Returns true iff a complete entry (ciphertext and IV) exists for
    /// `key`.
    ///
    /// Side-effect free and never fails; malformed keys report `false`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        let key = key.trim();
        !key.is_empty() && self.store.contains(key)
    }

    /// Removes the entry under `key` if present.
    ///
    /// Deleting an absent key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is malformed or deletion fails.
    pub fn delete(&self, key: &str) -> CoreResult<()> {
        let key = normalize_key(key)?;
        let _sweep = self.sweep.read();
        let _entry = self.locks.lock(&key);

        self.store.delete(&key)?;
        debug!(key = %key, "entry deleted");
        Ok(())
    }

    /// Removes every entry under the storage root.
    ///
    /// Files that are not sealbox artifacts are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if enumeration or deletion fails.
    pub fn clean(&self) -> CoreResult<()> {
        let _sweep = self.sweep.write();
        self.store.clean()?;
        debug!("storage cleaned");
        Ok(())
    }

    /// Stores a byte slice under `key`.
    ///
    /// Convenience wrapper over [`write`](Self::write).
    ///
    /// # Errors
    ///
    /// Same as [`write`](Self::write).
    pub fn add_bytes(&self, key: &str, bytes: &[u8]) -> CoreResult<()> {
        self.write(key, &mut Cursor::new(bytes))
    }

    /// Retrieves the entry under `key` as a byte vector.
    ///
    /// Convenience wrapper over [`read`](Self::read).
    ///
    /// # Errors
    ///
    /// Same as [`read`](Self::read).
    pub fn get_bytes(&self, key: &str) -> CoreResult<Vec<u8>> {
        let mut out = Vec::new();
        self.read(key, &mut out)?;
        Ok(out)
    }

    /// Stores a UTF-8 string under `key`.
    ///
    /// # Errors
    ///
    /// Same as [`write`](Self::write).
    pub fn add_string(&self, key: &str, value: &str) -> CoreResult<()> {
        self.add_bytes(key, value.as_bytes())
    }

    /// Retrieves the entry under `key` as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Same as [`read`](Self::read), plus a crypto error if the decrypted
    /// bytes are not valid UTF-8 (a symptom of a wrong key or corruption).
    pub fn get_string(&self, key: &str) -> CoreResult<String> {
        String::from_utf8(self.get_bytes(key)?)
            .map_err(|_| CoreError::crypto("decrypted value is not valid UTF-8"))
    }

    /// Fetches the key from the supplier and validates its length against
    /// the cipher, returning exactly the bytes the cipher needs.
    fn encryption_key(&self) -> CoreResult<Vec<u8>> {
        let material = self.keys.key()?;
        let required = self.cipher.key_len();
        if material.len() < required {
            return Err(CoreError::key_too_short(material.len(), required));
        }
        Ok(material.as_bytes()[..required].to_vec())
    }
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault").finish_non_exhaustive()
    }
}

/// Trims the key and rejects empty or whitespace-only names.
fn normalize_key(key: &str) -> CoreResult<String> {
    let key = key.trim();
    if key.is_empty() {
        return Err(CoreError::config("entry key must not be empty"));
    }
    Ok(key.to_owned())
}
