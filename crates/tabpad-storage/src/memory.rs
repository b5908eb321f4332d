//! In-memory key-value store
//!
//! Used when no database is available and by tests that need to observe
//! how often the session store writes.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::StorageError;
use crate::{KeyValueStore, Result};

#[derive(Default)]
struct Inner {
    entries: RwLock<HashMap<String, String>>,
    writes: AtomicUsize,
    /// Maximum size of a single value, mirroring browser storage quotas
    quota: Option<usize>,
    unavailable: AtomicBool,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects values larger than `limit` bytes
    pub fn with_quota(limit: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                quota: Some(limit),
                ..Inner::default()
            }),
        }
    }

    /// Number of successful `set` calls so far
    pub fn write_count(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }

    /// Simulate the backing storage going away (or coming back)
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.inner.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(
                "memory store disabled".to_string(),
            ));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.check_available()?;
        Ok(self.inner.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_available()?;

        if let Some(limit) = self.inner.quota {
            if value.len() > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    limit,
                });
            }
        }

        self.inner
            .entries
            .write()
            .insert(key.to_string(), value.to_string());
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
