// Result store: transformed payloads live here while a session exposes them.
// A `ResultHandle` is the only way to reach a payload and releases it exactly
// once, either explicitly or when the handle is dropped.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use bytes::Bytes;

#[derive(Default)]
struct StoreInner {
    next_id: u64,
    entries: HashMap<u64, Bytes>,
    releases: u64,
}

/// Shared registry of result payloads.
#[derive(Clone, Default)]
pub struct ResultStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a payload and return the handle that owns it.
    pub fn insert(&self, payload: Bytes) -> ResultHandle {
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        let len = payload.len();
        inner.entries.insert(id, payload);
        tracing::debug!(id, len, "Result registered");
        ResultHandle {
            id,
            len,
            store: self.clone(),
            released: false,
        }
    }

    /// Number of payloads currently held.
    pub fn live(&self) -> usize {
        self.lock().entries.len()
    }

    /// Total number of payloads released so far.
    pub fn releases(&self) -> u64 {
        self.lock().releases
    }

    fn fetch(&self, id: u64) -> Option<Bytes> {
        self.lock().entries.get(&id).cloned()
    }

    fn revoke(&self, id: u64) {
        let mut inner = self.lock();
        if inner.entries.remove(&id).is_some() {
            inner.releases += 1;
            tracing::debug!(id, "Result released");
        }
    }
}

impl fmt::Debug for ResultStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("ResultStore")
            .field("live", &inner.entries.len())
            .field("releases", &inner.releases)
            .finish()
    }
}

/// Releasable reference to one transformed payload.
pub struct ResultHandle {
    id: u64,
    len: usize,
    store: ResultStore,
    released: bool,
}

impl ResultHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Size of the payload in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// The payload, or `None` once the handle has been released.
    pub fn bytes(&self) -> Option<Bytes> {
        if self.released {
            return None;
        }
        self.store.fetch(self.id)
    }

    /// Write the payload to `path`.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        let bytes = self.bytes().context("Result has already been released")?;
        tokio::fs::write(path, &bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Give the payload back to the store. Calling it again does nothing.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.store.revoke(self.id);
    }
}

impl Drop for ResultHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for ResultHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultHandle")
            .field("id", &self.id)
            .field("len", &self.len)
            .field("released", &self.released)
            .finish()
    }
}
