//! Write-once asset cache.
//!
//! One cache type serves both room scenes (keyed by [`RoomIndex`]) and
//! artwork images (keyed by [`ImageKey`]). The key space is small and
//! bounded by the exhibition, so entries are never evicted. Each entry moves
//! `Pending -> Ready | Failed` exactly once; ready values are shared as
//! `Arc<V>` and never mutated, so readers need no further coordination.
//!
//! [`RoomIndex`]: crate::id::RoomIndex
//! [`ImageKey`]: crate::image::ImageKey

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use crate::error::AssetLoadError;

/// State of one cached asset.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheEntry<V> {
    /// A load was requested and has not completed.
    Pending,
    Ready(Arc<V>),
    Failed(AssetLoadError),
}

impl<V> CacheEntry<V> {
    pub fn is_pending(&self) -> bool {
        matches!(self, CacheEntry::Pending)
    }

    pub fn is_settled(&self) -> bool {
        !self.is_pending()
    }
}

/// Outcome of [`AssetCache::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result was stored.
    Stored,
    /// The key had already settled; the result was discarded.
    AlreadySettled,
}

#[derive(Debug, Clone)]
pub struct AssetCache<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
}

impl<K, V> Default for AssetCache<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone + Debug, V> AssetCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &K) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    /// The loaded value for `key`, if it is ready.
    pub fn ready(&self, key: &K) -> Option<Arc<V>> {
        match self.entries.get(key) {
            Some(CacheEntry::Ready(value)) => Some(Arc::clone(value)),
            _ => None,
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Mark `key` as pending if nothing is known about it yet.
    ///
    /// Returns `true` when the caller must issue the load; `false` on a
    /// cache hit or when a load is already in flight.
    pub fn request(&mut self, key: K) -> bool {
        if self.entries.contains_key(&key) {
            log::debug!("cache hit for {key:?}");
            return false;
        }
        self.entries.insert(key, CacheEntry::Pending);
        true
    }

    /// Record the result of a load. The first result for a key wins.
    pub fn complete(&mut self, key: K, result: Result<V, AssetLoadError>) -> Completion {
        if self.entries.get(&key).is_some_and(CacheEntry::is_settled) {
            log::debug!("ignoring repeated completion for {key:?}");
            return Completion::AlreadySettled;
        }
        let entry = match result {
            Ok(value) => CacheEntry::Ready(Arc::new(value)),
            Err(err) => CacheEntry::Failed(err),
        };
        self.entries.insert(key, entry);
        Completion::Stored
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries still waiting on a load.
    pub fn pending_count(&self) -> usize {
        self.entries.values().filter(|e| e.is_pending()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &CacheEntry<V>)> {
        self.entries.iter()
    }
}
