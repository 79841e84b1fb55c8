//! Key-value persistence capability.
//!
//! Components that cache or persist anything receive a [`StorageBackend`]
//! explicitly; which backend runs is a deployment decision made once at
//! startup.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key '{0}': only [A-Za-z0-9._:-] allowed, not starting with '.'")]
    InvalidKey(String),

    #[error("storage io error for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("storage lock poisoned")]
    Poisoned,
}

pub trait StorageBackend: Send + Sync {
    /// # Errors
    ///
    /// Returns [`StorageError`] on invalid keys or backend failure.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Inserts or replaces the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] on invalid keys or backend failure.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Keys starting with `prefix`, sorted ascending.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] on backend failure.
    fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;

    /// Returns whether a value was removed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] on invalid keys or backend failure.
    fn delete(&self, key: &str) -> Result<bool, StorageError>;
}

fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | ':' | '-'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

/// Process-local backend; contents vanish on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        validate_key(key)?;
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn delete(&self, key: &str) -> Result<bool, StorageError> {
        validate_key(key)?;
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.remove(key).is_some())
    }
}

/// One file per key under `root`.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Creates the root directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| StorageError::Io {
            key: root.display().to_string(),
            source: e,
        })?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

impl StorageBackend for FsStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io {
                key: key.to_string(),
                source: e,
            }),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        // Write then rename so readers never observe a partial value.
        let tmp = self
            .root
            .join(format!(".{key}.{}.tmp", uuid::Uuid::new_v4().simple()));
        std::fs::write(&tmp, value)
            .and_then(|()| std::fs::rename(&tmp, &path))
            .map_err(|e| StorageError::Io {
                key: key.to_string(),
                source: e,
            })
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let read_dir = std::fs::read_dir(&self.root).map_err(|e| StorageError::Io {
            key: prefix.to_string(),
            source: e,
        })?;

        let mut keys = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| StorageError::Io {
                key: prefix.to_string(),
                source: e,
            })?;
            let Some(name) = entry.file_name().to_str().map(ToOwned::to_owned) else {
                continue;
            };
            if name.starts_with(prefix) && validate_key(&name).is_ok() {
                keys.push(name);
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn delete(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::Io {
                key: key.to_string(),
                source: e,
            }),
        }
    }
}

/// The backend a deployment runs with: files under `dir` when configured,
/// process memory otherwise.
///
/// # Errors
///
/// Returns [`StorageError::Io`] if `dir` cannot be created.
pub fn open_store(dir: Option<&Path>) -> Result<Arc<dyn StorageBackend>, StorageError> {
    match dir {
        Some(dir) => {
            tracing::info!(root = %dir.display(), "using filesystem storage");
            Ok(Arc::new(FsStore::open(dir)?))
        }
        None => {
            tracing::debug!("using in-memory storage");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
