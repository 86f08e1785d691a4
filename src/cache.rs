//! Bounded LRU caches for the display-metadata helpers.
//!
//! Owned, explicit cache objects rather than process-wide singletons: the
//! service embedding the engine creates one `MetadataCache`, shares it
//! behind an `Arc`, and decides when (or whether) to run the sweeper. The
//! scoring pipeline itself never touches these.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::debug;

use crate::meta::{self, SplitTitle};
use crate::track::Track;

/// Default capacity for each cache.
const CACHE_CAPACITY: usize = 1000;

/// Default interval for the periodic full clear.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Two LRU maps used by the formatting/display path: track labels keyed by
/// URL, and title/artist extractions keyed by the raw title.
///
/// Both sit behind a `Mutex`, so a sweep can never interleave with an
/// in-flight lookup.
pub struct MetadataCache {
    labels: Mutex<LruCache<String, String>>,
    extractions: Mutex<LruCache<String, SplitTitle>>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::with_capacity(CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            labels: Mutex::new(LruCache::new(capacity)),
            extractions: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Display label for a track, computed once per URL.
    pub fn label_for(&self, track: &Track) -> String {
        if let Ok(mut cache) = self.labels.lock() {
            if let Some(label) = cache.get(&track.url) {
                return label.clone();
            }
            let label = meta::display_label(track);
            cache.put(track.url.clone(), label.clone());
            return label;
        }
        meta::display_label(track)
    }

    /// Artist/title split for a raw uploaded title, computed once per
    /// distinct string.
    pub fn split_for(&self, raw_title: &str) -> SplitTitle {
        if let Ok(mut cache) = self.extractions.lock() {
            if let Some(split) = cache.get(raw_title) {
                return split.clone();
            }
            let split = meta::split_artist_title(raw_title);
            cache.put(raw_title.to_string(), split.clone());
            return split;
        }
        meta::split_artist_title(raw_title)
    }

    /// Drop everything from both caches.
    pub fn clear_all(&self) {
        if let Ok(mut cache) = self.labels.lock() {
            cache.clear();
        }
        if let Ok(mut cache) = self.extractions.lock() {
            cache.clear();
        }
    }

    /// Current entry counts (labels, extractions).
    pub fn stats(&self) -> (usize, usize) {
        let labels = self.labels.lock().map(|c| c.len()).unwrap_or(0);
        let extractions = self.extractions.lock().map(|c| c.len()).unwrap_or(0);
        (labels, extractions)
    }
}

impl Default for MetadataCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn the periodic full clear on the current tokio runtime.
///
/// Returns the task handle; abort it (or drop the runtime) to stop
/// sweeping. Transient metadata accumulates between sweeps, so the
/// interval bounds worst-case memory, not steady-state size.
pub fn spawn_sweeper(
    cache: Arc<MetadataCache>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately; skip it so the first real
        // sweep happens one full interval from now.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let (labels, extractions) = cache.stats();
            cache.clear_all();
            debug!(labels, extractions, "metadata caches swept");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(url: &str, title: &str, artist: &str) -> Track {
        Track {
            id: String::new(),
            title: title.to_string(),
            artist: artist.to_string(),
            duration_ms: 205_000,
            url: url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_label_cached_by_url() {
        let cache = MetadataCache::new();
        let t = track("https://example.com/a", "Song A", "Artist X");
        assert_eq!(cache.label_for(&t), "Artist X - Song A (3:25)");
        assert_eq!(cache.stats().0, 1);
        // Second lookup hits the cache.
        assert_eq!(cache.label_for(&t), "Artist X - Song A (3:25)");
        assert_eq!(cache.stats().0, 1);
    }

    #[test]
    fn test_split_cached_by_raw_title() {
        let cache = MetadataCache::new();
        let split = cache.split_for("Artist X - Song A");
        assert_eq!(split.artist.as_deref(), Some("Artist X"));
        assert_eq!(cache.stats().1, 1);
        cache.split_for("Artist X - Song A");
        assert_eq!(cache.stats().1, 1);
    }

    #[test]
    fn test_lru_eviction_at_capacity() {
        let cache = MetadataCache::with_capacity(2);
        cache.split_for("A - 1");
        cache.split_for("B - 2");
        cache.split_for("C - 3");
        assert_eq!(cache.stats().1, 2);
    }

    #[test]
    fn test_clear_all() {
        let cache = MetadataCache::new();
        cache.label_for(&track("https://example.com/a", "Song A", "Artist X"));
        cache.split_for("Artist X - Song A");
        cache.clear_all();
        assert_eq!(cache.stats(), (0, 0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_clears_on_interval() {
        let cache = Arc::new(MetadataCache::new());
        cache.split_for("Artist X - Song A");
        assert_eq!(cache.stats().1, 1);

        let handle = spawn_sweeper(cache.clone(), Duration::from_secs(60));
        // Let the sweeper task reach its first await point.
        tokio::task::yield_now().await;

        tokio::time::advance(Duration::from_secs(61)).await;
        tokio::task::yield_now().await;

        assert_eq!(cache.stats(), (0, 0));
        handle.abort();
    }
}
