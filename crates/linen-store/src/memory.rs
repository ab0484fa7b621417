use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use linen_types::Document;
use tracing::debug;

use crate::codec::{decode_document, encode_document};
use crate::error::{StoreError, StoreResult};
use crate::traits::DocumentStore;

/// Key under which the tracker document is stored by default.
pub const DEFAULT_STORAGE_KEY: &str = "spa-linen-tracker-v1";

/// In-memory key/value document store.
///
/// Holds serialized blobs under string keys, the same way a browser's local
/// storage does, so decoding rules are exercised exactly as for files.
/// Writes can be disabled to simulate an unavailable or full backend.
pub struct InMemoryDocumentStore {
    key: String,
    entries: RwLock<HashMap<String, String>>,
    read_only: AtomicBool,
}

impl InMemoryDocumentStore {
    /// Create an empty store using [`DEFAULT_STORAGE_KEY`].
    pub fn new() -> Self {
        Self::with_key(DEFAULT_STORAGE_KEY)
    }

    /// Create an empty store that reads and writes under `key`.
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            entries: RwLock::new(HashMap::new()),
            read_only: AtomicBool::new(false),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The raw blob stored under this store's key.
    pub fn raw(&self) -> Option<String> {
        self.entries
            .read()
            .ok()
            .and_then(|map| map.get(&self.key).cloned())
    }

    /// Store a raw blob, bypassing encoding. Used to plant legacy or corrupt
    /// content.
    pub fn put_raw(&self, raw: impl Into<String>) -> StoreResult<()> {
        let mut map = self.write_entries()?;
        map.insert(self.key.clone(), raw.into());
        Ok(())
    }

    /// Refuse all subsequent writes when `true`.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    fn write_entries(
        &self,
    ) -> StoreResult<std::sync::RwLockWriteGuard<'_, HashMap<String, String>>> {
        self.entries
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn load(&self) -> StoreResult<Option<Document>> {
        let map = self
            .entries
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))?;
        Ok(map.get(&self.key).and_then(|raw| decode_document(raw)))
    }

    fn save(&self, document: &Document) -> StoreResult<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("storage quota exceeded".into()));
        }
        let encoded = encode_document(document)?;
        let len = encoded.len();
        self.write_entries()?.insert(self.key.clone(), encoded);
        debug!(key = %self.key, len, "document saved");
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDocumentStore")
            .field("key", &self.key)
            .field("read_only", &self.read_only.load(Ordering::SeqCst))
            .finish()
    }
}
