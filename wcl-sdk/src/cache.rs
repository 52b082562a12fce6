// ABOUTME: Query result cache keyed by canonical query identity
// ABOUTME: Lookup-or-execute with at most one in-flight execution per identity

use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::OnceCell;

use crate::Result;
use crate::error::WclError;
use crate::persistent::DiskStore;

/// Resolved bodies of cacheable queries. Entries are never evicted.
///
/// A cache opened with [`QueryCache::persistent`] also writes every resolved body to disk and
/// consults the disk before executing, so results survive across runs.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<Value>>>>,
    disk: Option<DiskStore>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// In-memory cache backed by the database at `path`.
    pub fn persistent(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            disk: Some(DiskStore::open(path)?),
            ..Self::default()
        })
    }

    pub fn disk(&self) -> Option<&DiskStore> {
        self.disk.as_ref()
    }

    /// Returns the stored body for `identity`, or runs `execute` and stores its result.
    ///
    /// Concurrent callers with the same identity wait for the first execution. A failed
    /// execution stores nothing. Disk read and write failures are logged and treated as misses.
    pub async fn get_or_execute<F, Fut>(&self, identity: String, execute: F) -> Result<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        let slot = self.entries.lock().entry(identity.clone()).or_default().clone();

        let mut executed = false;
        let executed_flag = &mut executed;
        let disk = self.disk.as_ref();
        let key = identity.as_str();
        let value = slot
            .get_or_try_init(move || async move {
                if let Some(stored) = disk.and_then(|disk| load_from_disk(disk, key)) {
                    return Ok(stored);
                }

                *executed_flag = true;
                let value = execute().await?;
                if let Some(disk) = disk {
                    if let Err(err) = disk.store(key, &value) {
                        log::warn!("Failed to persist cached body: {err}");
                    }
                }
                Ok::<_, WclError>(value)
            })
            .await?;

        if executed {
            self.misses.fetch_add(1, Ordering::Relaxed);
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        Ok(value.clone())
    }

    pub fn get(&self, identity: &str) -> Option<Value> {
        self.entries
            .lock()
            .get(identity)
            .and_then(|slot| slot.get().cloned())
    }

    /// Drops every in-memory entry and, for a persistent cache, every stored body.
    pub fn clear(&self) {
        self.entries.lock().clear();
        if let Some(disk) = &self.disk {
            if let Err(err) = disk.clear() {
                log::warn!("Failed to clear persisted cache: {err}");
            }
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self
                .entries
                .lock()
                .values()
                .filter(|slot| slot.initialized())
                .count(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

fn load_from_disk(disk: &DiskStore, key: &str) -> Option<Value> {
    match disk.load(key) {
        Ok(stored) => stored,
        Err(err) => {
            log::warn!("Ignoring unreadable cached body: {err}");
            None
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub size: usize,
    pub hits: u64,
    pub misses: u64,
}
