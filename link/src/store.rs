//! Durable local key-value storage, modelled on browser Web Storage.
//!
//! The token link never inspects its execution environment. Instead it is
//! handed a [`StoreAccessor`]: `Available` on the client, `Unavailable` during
//! server-side rendering.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use storefront_utils::atomic_write;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access local store at {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("local store at {} is not a JSON object of strings", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("local store lock poisoned")]
    Poisoned,
}

/// String-keyed, string-valued durable storage.
///
/// `get_item` returns `Ok(None)` for a missing key, matching Web Storage.
pub trait LocalStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

/// Injected capability describing whether persistent local storage exists in
/// the current execution context.
#[derive(Clone)]
pub enum StoreAccessor {
    Available(Arc<dyn LocalStore>),
    /// Server-side execution: no local store to read.
    Unavailable,
}

impl StoreAccessor {
    pub fn available(store: impl LocalStore + 'static) -> Self {
        Self::Available(Arc::new(store))
    }

    #[must_use]
    pub fn store(&self) -> Option<&dyn LocalStore> {
        match self {
            Self::Available(store) => Some(store.as_ref()),
            Self::Unavailable => None,
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

impl fmt::Debug for StoreAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available(_) => write!(f, "StoreAccessor::Available"),
            Self::Unavailable => write!(f, "StoreAccessor::Unavailable"),
        }
    }
}

/// In-process store. Used as a test double and for embedding.
#[derive(Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_item(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut items) = store.items.lock() {
            items.insert(key.to_string(), value.to_string());
        }
        store
    }
}

impl LocalStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let items = self.items.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut items = self.items.lock().map_err(|_| StoreError::Poisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        let mut items = self.items.lock().map_err(|_| StoreError::Poisoned)?;
        items.remove(key);
        Ok(())
    }
}

/// Store persisted as a single JSON object file (`{"key": "value", ...}`).
///
/// A missing file reads as an empty store. Every read goes to disk, so a
/// token written by another process is picked up by the next operation.
/// Writes are atomic and owner-only.
///
/// `set_item` and `remove_item` read, modify, and rewrite the whole file
/// without a lock. Concurrent writers (threads or processes) can lose each
/// other's updates; the last rename wins. Readers are unaffected.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_all(&self, items: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let bytes = serde_json::to_vec_pretty(items).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        atomic_write(&self.path, &bytes).map_err(io_err)
    }
}

impl LocalStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut items = self.read_all()?;
        items.insert(key.to_string(), value.to_string());
        self.write_all(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        let mut items = self.read_all()?;
        if items.remove(key).is_some() {
            self.write_all(&items)?;
        }
        Ok(())
    }
}
