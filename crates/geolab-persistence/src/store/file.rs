//! Directory-backed store, one file per key.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::LocalStore;
use crate::error::{Result, StoreError};

const ENTRY_EXTENSION: &str = "entry";

/// Stores each key as a file named after the hex encoding of the key.
///
/// Hex names keep arbitrary keys (`:` included) valid on every platform.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.root
            .join(hex::encode(key.as_bytes()))
            .with_extension(ENTRY_EXTENSION)
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.entry_path(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::Io {
                    operation: "read",
                    path,
                    source: e,
                });
            }
        };
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|_| StoreError::InvalidText { path })
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.entry_path(key);
        let temp_path = path.with_extension("entry.tmp");

        fs::create_dir_all(&self.root).map_err(|e| StoreError::Io {
            operation: "create directory",
            path: self.root.clone(),
            source: e,
        })?;

        let mut file = File::create(&temp_path).map_err(|e| StoreError::Io {
            operation: "create",
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(value.as_bytes())
            .map_err(|e| StoreError::Io {
                operation: "write",
                path: temp_path.clone(),
                source: e,
            })?;

        file.sync_all().map_err(|e| StoreError::Io {
            operation: "sync",
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, &path).map_err(|e| StoreError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: path.clone(),
            source: e,
        })?;

        tracing::debug!(key, path = %path.display(), "stored entry");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.entry_path(key);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(key, "removed entry");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io {
                operation: "remove",
                path,
                source: e,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn entry_names_are_hex() {
        let store = FileStore::new("/data");
        assert_eq!(
            store.entry_path("a:1"),
            PathBuf::from("/data/613a31.entry")
        );
    }

    #[test]
    fn round_trip_and_overwrite() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "first").unwrap();
        store.set("k", "second").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("second"));

        // No temp file left behind
        let names: Vec<_> = fs::read_dir(store.root())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn remove_missing_is_ok() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.remove("never-set").unwrap();
    }

    #[test]
    fn non_utf8_entry_is_reported() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        fs::write(store.entry_path("bad"), [0xff, 0xfe]).unwrap();
        assert!(matches!(
            store.get("bad"),
            Err(StoreError::InvalidText { .. })
        ));
    }
}
