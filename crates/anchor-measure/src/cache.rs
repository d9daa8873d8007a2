//! Short-lived per-anchor measurement cache.
//!
//! Entries are used only to pre-seed a position while a fresh measurement is
//! in flight; they never replace that measurement.

use std::{collections::HashMap, time::Duration};

use anchor_geom::Rect;
use tokio::time::Instant;

/// Age below which a cached entry is considered fresh.
pub const CACHE_FRESHNESS: Duration = Duration::from_millis(300);

/// Last measured geometry for one anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CacheEntry {
    /// When the measurement completed.
    pub at: Instant,
    /// Anchor rectangle in window coordinates, after margin adjustment.
    pub anchor: Option<Rect>,
    /// Host rectangle in window coordinates.
    pub host: Option<Rect>,
}

/// Anchor-id keyed cache with a fixed freshness window.
#[derive(Debug, Clone)]
pub struct MeasureCache {
    /// Entries by anchor id.
    entries: HashMap<String, CacheEntry>,
    /// Maximum age of a usable entry.
    freshness: Duration,
}

impl Default for MeasureCache {
    fn default() -> Self {
        Self::new(CACHE_FRESHNESS)
    }
}

impl MeasureCache {
    /// Create a cache with a custom freshness window.
    #[must_use]
    pub fn new(freshness: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            freshness,
        }
    }

    /// Record a completed measurement for `id`, stamped now.
    pub fn insert(&mut self, id: impl Into<String>, anchor: Option<Rect>, host: Option<Rect>) {
        self.entries.insert(
            id.into(),
            CacheEntry {
                at: Instant::now(),
                anchor,
                host,
            },
        );
    }

    /// Entry for `id` if it was recorded less than the freshness window ago.
    #[must_use]
    pub fn fresh(&self, id: &str) -> Option<&CacheEntry> {
        self.entries
            .get(id)
            .filter(|e| e.at.elapsed() < self.freshness)
    }

    /// Drop the entry for `id`.
    pub fn remove(&mut self, id: &str) {
        self.entries.remove(id);
    }

    /// Number of stored entries, fresh or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use tokio::time;

    use super::*;

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn entries_expire_after_freshness_window() {
        let mut cache = MeasureCache::default();
        let a = Rect::new(1.0, 2.0, 3.0, 4.0);
        cache.insert("menu", Some(a), None);
        assert_eq!(cache.fresh("menu").and_then(|e| e.anchor), Some(a));

        time::advance(Duration::from_millis(299)).await;
        assert!(cache.fresh("menu").is_some());

        time::advance(Duration::from_millis(1)).await;
        assert!(cache.fresh("menu").is_none());
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn reinsert_refreshes() {
        let mut cache = MeasureCache::new(Duration::from_millis(10));
        cache.insert("x", None, None);
        time::advance(Duration::from_millis(20)).await;
        assert!(cache.fresh("x").is_none());
        cache.insert("x", None, None);
        assert!(cache.fresh("x").is_some());
        cache.remove("x");
        assert!(cache.is_empty());
        assert!(cache.fresh("unknown").is_none());
    }
}
