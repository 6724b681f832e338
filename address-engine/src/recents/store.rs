//! Disk-backed recent address store.
//!
//! A small JSON blob of previously chosen addresses, most-recent-first,
//! capped at a fixed capacity. Selecting an address that is already stored
//! promotes it to the front instead of duplicating it; eviction is strictly
//! LRU.
//!
//! Two pickers can be open at once (origin and destination), so writes are
//! serialized and each write re-reads the persisted blob before applying
//! the promote/cap logic — never a stale in-memory copy.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

use crate::domain::AddressCandidate;

/// Default persisted blob name.
const DEFAULT_PATH: &str = "recent_addresses.json";

/// Default capacity.
const DEFAULT_CAPACITY: usize = 5;

/// A previously chosen address with its selection time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentEntry {
    pub candidate: AddressCandidate,
    pub selected_at: DateTime<Utc>,
}

/// Configuration for the recent address store.
#[derive(Debug, Clone)]
pub struct RecentStoreConfig {
    /// Path to the persisted blob.
    pub path: PathBuf,
    /// Maximum number of entries kept.
    pub capacity: usize,
}

impl RecentStoreConfig {
    /// Create a config with the given path and default capacity.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            capacity: DEFAULT_CAPACITY,
        }
    }

    /// Set a custom capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

impl Default for RecentStoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PATH)
    }
}

/// Bounded, persistent, most-recent-first address store.
///
/// Clone-able handle; clones share the same snapshot and write lock.
#[derive(Clone)]
pub struct RecentLocationStore {
    config: Arc<RecentStoreConfig>,
    /// In-memory copy, kept even when persistence fails.
    snapshot: Arc<RwLock<Vec<RecentEntry>>>,
    /// Serializes read-modify-write cycles across clones.
    write_lock: Arc<Mutex<()>>,
}

impl RecentLocationStore {
    /// Open the store, loading any persisted entries.
    ///
    /// A missing or unreadable blob starts the store empty rather than
    /// failing: recents are a convenience, not critical data.
    pub fn open(config: RecentStoreConfig) -> Self {
        let entries = read_blob(&config.path).unwrap_or_default();

        Self {
            config: Arc::new(config),
            snapshot: Arc::new(RwLock::new(entries)),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Current entries, most-recent-first.
    pub async fn entries(&self) -> Vec<RecentEntry> {
        self.snapshot.read().await.clone()
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.snapshot.read().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.snapshot.read().await.is_empty()
    }

    /// Record a selection: insert at the front, or promote an existing
    /// entry with the same composed address. The list is then capped and
    /// persisted before returning.
    ///
    /// Persistence failures are logged and swallowed; the in-memory list
    /// still updates for the current session.
    pub async fn record(&self, candidate: AddressCandidate) {
        if candidate.composed_address.is_empty() {
            return;
        }

        let _guard = self.write_lock.lock().await;

        // Re-read the blob: another picker may have written since we loaded.
        let mut entries = match read_blob(&self.config.path) {
            Some(fresh) => fresh,
            None => self.snapshot.read().await.clone(),
        };

        if let Some(index) = entries
            .iter()
            .position(|e| e.candidate.composed_address == candidate.composed_address)
        {
            entries.remove(index);
        }
        entries.insert(
            0,
            RecentEntry {
                candidate,
                selected_at: Utc::now(),
            },
        );
        entries.truncate(self.config.capacity);

        if let Err(e) = write_blob(&self.config.path, &entries) {
            tracing::warn!(path = %self.config.path.display(), error = %e, "failed to persist recent addresses");
        }

        *self.snapshot.write().await = entries;
    }

    /// The persisted blob's path.
    pub fn path(&self) -> &Path {
        &self.config.path
    }
}

/// Read the persisted blob. `None` when missing or unreadable.
fn read_blob(path: &Path) -> Option<Vec<RecentEntry>> {
    let contents = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

/// Write the blob, creating parent directories if needed.
fn write_blob(path: &Path, entries: &[RecentEntry]) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(entries)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(path, json)
}
