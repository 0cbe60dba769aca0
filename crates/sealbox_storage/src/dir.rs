//! Directory-backed storage provider for persistent entries.
//!
//! Layout under the storage root:
//!
//! ```text
//! <root>/
//! ├─ alpha.cst        # ciphertext artifact for key "alpha"
//! ├─ alpha.iv         # IV artifact for key "alpha"
//! └─ ...
//! ```

use crate::error::{StorageError, StorageResult};
use crate::store::{validate_key, BlobStore, DATA_EXTENSION, IV_EXTENSION};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// A storage provider that keeps artifact pairs under a root directory.
///
/// The root directory must exist before the store is opened; the provider
/// never creates it. Every operation is a self-contained filesystem
/// transaction - the store holds no open handles between calls.
///
/// # Example
///
/// ```no_run
/// use sealbox_storage::{BlobStore, DirStore};
/// use std::path::Path;
///
/// let store = DirStore::open(Path::new("/var/lib/app/secrets")).unwrap();
/// assert!(!store.contains("alpha"));
/// ```
#[derive(Debug)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Opens a store over an existing root directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::RootNotFound`] if `root` does not exist or
    /// is not a directory.
    pub fn open(root: &Path) -> StorageResult<Self> {
        if !root.is_dir() {
            return Err(StorageError::root_not_found(root.display().to_string()));
        }

        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Returns the storage root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path of the ciphertext artifact for `key`.
    #[must_use]
    pub fn data_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.{DATA_EXTENSION}"))
    }

    /// Returns the path of the IV artifact for `key`.
    #[must_use]
    pub fn iv_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.{IV_EXTENSION}"))
    }
}

impl BlobStore for DirStore {
    fn writer(&self, key: &str) -> StorageResult<Box<dyn Write + Send>> {
        validate_key(key)?;
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.data_path(key))?;
        Ok(Box::new(file))
    }

    fn reader(&self, key: &str) -> StorageResult<Box<dyn Read + Send>> {
        validate_key(key)?;
        let path = self.data_path(key);
        if !path.is_file() {
            return Err(StorageError::not_found(key));
        }
        Ok(Box::new(File::open(path)?))
    }

    fn write_iv(&self, key: &str, iv: &[u8]) -> StorageResult<()> {
        validate_key(key)?;
        fs::write(self.iv_path(key), iv)?;
        Ok(())
    }

    fn read_iv(&self, key: &str) -> StorageResult<Vec<u8>> {
        validate_key(key)?;
        let path = self.iv_path(key);
        if !path.is_file() {
            return Err(StorageError::iv_not_found(key));
        }
        Ok(fs::read(path)?)
    }

    fn contains(&self, key: &str) -> bool {
        validate_key(key).is_ok() && self.data_path(key).is_file() && self.iv_path(key).is_file()
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        validate_key(key)?;
        for path in [self.data_path(key), self.iv_path(key)] {
            if path.is_file() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }

    fn clean(&self) -> StorageResult<()> {
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            let is_artifact = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == DATA_EXTENSION || ext == IV_EXTENSION);

            if is_artifact && path.is_file() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_requires_existing_root() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");

        let result = DirStore::open(&missing);
        assert!(matches!(result, Err(StorageError::RootNotFound { .. })));

        assert!(DirStore::open(dir.path()).is_ok());
    }

    #[test]
    fn artifact_paths() {
        let dir = tempdir().unwrap();
        let store = DirStore::open(dir.path()).unwrap();

        assert_eq!(store.data_path("alpha"), dir.path().join("alpha.cst"));
        assert_eq!(store.iv_path("alpha"), dir.path().join("alpha.iv"));
    }

    #[test]
    fn write_then_read_back() {
        let dir = tempdir().unwrap();
        let store = DirStore::open(dir.path()).unwrap();

        store.write_iv("k", &[7u8; 16]).unwrap();
        let mut writer = store.writer("k").unwrap();
        writer.write_all(b"opaque bytes").unwrap();
        drop(writer);

        assert!(store.contains("k"));
        assert_eq!(store.read_iv("k").unwrap(), vec![7u8; 16]);

        let mut data = Vec::new();
        store.reader("k").unwrap().read_to_end(&mut data).unwrap();
        assert_eq!(data, b"opaque bytes");
    }

    #[test]
    fn partial_entry_reports_absent() {
        let dir = tempdir().unwrap();
        let store = DirStore::open(dir.path()).unwrap();

        // Only the IV artifact exists.
        store.write_iv("half", &[0u8; 16]).unwrap();
        assert!(!store.contains("half"));

        // Only the ciphertext artifact exists.
        drop(store.writer("other").unwrap());
        assert!(!store.contains("other"));
        assert!(matches!(
            store.read_iv("other"),
            Err(StorageError::IvNotFound { .. })
        ));
    }

    #[test]
    fn reader_missing_artifact_fails() {
        let dir = tempdir().unwrap();
        let store = DirStore::open(dir.path()).unwrap();

        assert!(matches!(
            store.reader("ghost"),
            Err(StorageError::NotFound { .. })
        ));
    }

    #[test]
    fn delete_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = DirStore::open(dir.path()).unwrap();

        store.delete("ghost").unwrap();

        store.write_iv("k", &[1u8; 16]).unwrap();
        drop(store.writer("k").unwrap());
        assert!(store.contains("k"));

        store.delete("k").unwrap();
        assert!(!store.contains("k"));
        store.delete("k").unwrap();
    }

    #[test]
    fn clean_leaves_unrelated_files() {
        let dir = tempdir().unwrap();
        let store = DirStore::open(dir.path()).unwrap();

        for key in ["a", "b", "c"] {
            store.write_iv(key, &[2u8; 16]).unwrap();
            drop(store.writer(key).unwrap());
        }
        let bystander = dir.path().join("notes.txt");
        fs::write(&bystander, b"keep me").unwrap();

        store.clean().unwrap();

        for key in ["a", "b", "c"] {
            assert!(!store.contains(key));
        }
        assert!(bystander.is_file());
    }

    #[test]
    fn invalid_key_never_touches_disk() {
        let dir = tempdir().unwrap();
        let store = DirStore::open(dir.path()).unwrap();

        assert!(store.writer("../escape").is_err());
        assert!(store.write_iv("a/b", &[0u8; 16]).is_err());
        assert!(!store.contains("../escape"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
