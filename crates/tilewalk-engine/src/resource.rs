//! File-backed resource loading and an in-memory keyed resource store.

use std::any::Any;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::EngineError;

/// Loads raw resource bytes from under a root directory and keeps arbitrary
/// typed values under string keys.
#[derive(Default)]
pub struct ResourceManager {
    root: PathBuf,
    store: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl std::fmt::Debug for ResourceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceManager")
            .field("root", &self.root)
            .field("stored", &self.store.len())
            .finish()
    }
}

impl ResourceManager {
    /// Resource paths resolve relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            store: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read the whole resource at `path` (relative to the root).
    ///
    /// # Errors
    ///
    /// [`EngineError::Resource`] if the file cannot be read.
    pub fn load_resource(&self, path: impl AsRef<Path>) -> Result<Vec<u8>, EngineError> {
        let full = self.root.join(path.as_ref());
        let bytes = std::fs::read(&full).map_err(|source| EngineError::Resource {
            path: full.clone(),
            source,
        })?;
        tracing::debug!(path = %full.display(), bytes = bytes.len(), "resource loaded");
        Ok(bytes)
    }

    /// Whether a file exists at `path` under the root.
    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        self.root.join(path.as_ref()).is_file()
    }

    /// Keep `value` under `key`, replacing any previous value.
    pub fn store<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.store.insert(key.into(), Arc::new(value));
    }

    /// The value stored under `key`, if it exists and is a `T`.
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Option<&T> {
        self.store.get(key)?.downcast_ref::<T>()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.store.contains_key(key)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
