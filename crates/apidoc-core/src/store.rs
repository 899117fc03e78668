use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use log::info;
use once_cell::sync::OnceCell;

use crate::error::LoadError;
use crate::parse::{Document, load_document};

/// Caches parsed OpenAPI documents for the lifetime of the store.
///
/// Each cache key owns one slot. The first caller for a key parses the
/// document while concurrent callers for the same key block until it is
/// ready, then share the same `Arc`. A failed load leaves the slot empty so a
/// later call can retry. Loaded documents are never mutated or evicted.
#[derive(Debug, Default)]
pub struct SpecStore {
    slots: Mutex<HashMap<String, Arc<OnceCell<Arc<Document>>>>>,
}

impl SpecStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the document at `path`, keyed by the path itself.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Arc<Document>, LoadError> {
        let path = path.as_ref();
        self.load_keyed(&path.to_string_lossy(), path)
    }

    /// Load the document at `path` under an explicit cache key. Distinct keys
    /// may hold distinct documents even when they share a path.
    pub fn load_keyed(&self, key: &str, path: &Path) -> Result<Arc<Document>, LoadError> {
        let slot = self.slot(key);
        slot.get_or_try_init(|| {
            info!("loading OpenAPI document {} (key {key})", path.display());
            load_document(path).map(Arc::new)
        })
        .cloned()
    }

    /// The document cached under `key`, if it has been loaded.
    pub fn get(&self, key: &str) -> Option<Arc<Document>> {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.get(key).and_then(|slot| slot.get().cloned())
    }

    fn slot(&self, key: &str) -> Arc<OnceCell<Arc<Document>>> {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(slots.entry(key.to_string()).or_default())
    }
}
