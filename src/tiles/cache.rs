use crate::core::geo::TileCoord;
use crate::tiles::source::TileSource;
use fxhash::FxBuildHasher;
use lru::LruCache;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

/// In-memory tile cache using LRU eviction
pub struct TileCache {
    cache: Arc<Mutex<LruCache<TileCoord, Arc<Vec<u8>>, FxBuildHasher>>>,
}

impl TileCache {
    /// Create a new tile cache with the given capacity (at least one tile)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Arc::new(Mutex::new(LruCache::with_hasher(
                capacity,
                FxBuildHasher::default(),
            ))),
        }
    }

    /// Create a new tile cache with default capacity (1024 tiles)
    pub fn with_default_capacity() -> Self {
        Self::new(1024)
    }

    /// Get a tile from the cache
    pub fn get(&self, coord: &TileCoord) -> Option<Arc<Vec<u8>>> {
        self.cache.lock().ok()?.get(coord).cloned()
    }

    /// Insert a tile into the cache
    pub fn insert(&self, coord: TileCoord, data: Vec<u8>) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(coord, Arc::new(data));
        }
    }

    /// Check if a tile is in the cache
    pub fn contains(&self, coord: &TileCoord) -> bool {
        self.cache
            .lock()
            .ok()
            .map(|cache| cache.contains(coord))
            .unwrap_or(false)
    }

    /// Clear all tiles from the cache
    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    /// Get the current number of cached tiles
    pub fn len(&self) -> usize {
        self.cache.lock().ok().map(|cache| cache.len()).unwrap_or(0)
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for TileCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileCache").field("len", &self.len()).finish()
    }
}

impl Clone for TileCache {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}

impl Default for TileCache {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

/// Memoizes another [`TileSource`] in memory.
///
/// Only hits are cached; a `None` from the inner source is asked again next
/// time.
pub struct CachedTileSource<S> {
    inner: S,
    cache: TileCache,
}

impl<S: TileSource> CachedTileSource<S> {
    pub fn new(inner: S, capacity: usize) -> Self {
        Self {
            inner,
            cache: TileCache::new(capacity),
        }
    }

    pub fn cache(&self) -> &TileCache {
        &self.cache
    }
}

impl<S: TileSource> TileSource for CachedTileSource<S> {
    fn fetch(&self, zoom: u8, x: u32, y: u32) -> Option<Vec<u8>> {
        let coord = TileCoord::new(x, y, zoom);
        if let Some(hit) = self.cache.get(&coord) {
            log::trace!("tile cache hit {:?}", coord);
            return Some(hit.as_ref().clone());
        }
        let data = self.inner.fetch(zoom, x, y)?;
        self.cache.insert(coord, data.clone());
        Some(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_tile_cache_basic_operations() {
        let cache = TileCache::new(2);
        let coord1 = TileCoord { x: 1, y: 2, z: 3 };
        let coord2 = TileCoord { x: 4, y: 5, z: 6 };

        assert!(cache.is_empty());

        cache.insert(coord1, vec![1, 2, 3]);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&coord1));
        assert_eq!(*cache.get(&coord1).unwrap(), vec![1, 2, 3]);

        cache.insert(coord2, vec![4, 5, 6]);
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_tile_cache_lru_eviction() {
        let cache = TileCache::new(2);
        let coord1 = TileCoord { x: 1, y: 1, z: 1 };
        let coord2 = TileCoord { x: 2, y: 2, z: 2 };
        let coord3 = TileCoord { x: 3, y: 3, z: 3 };

        cache.insert(coord1, vec![1]);
        cache.insert(coord2, vec![2]);
        cache.insert(coord3, vec![3]);
        assert_eq!(cache.len(), 2);
        assert!(!cache.contains(&coord1));
        assert!(cache.contains(&coord2));
        assert!(cache.contains(&coord3));
    }

    #[test]
    fn test_tile_cache_debug_shows_length() {
        let cache = TileCache::new(4);
        cache.insert(TileCoord::new(0, 0, 0), vec![1]);
        assert_eq!(format!("{:?}", cache), "TileCache { len: 1 }");
    }

    #[test]
    fn test_zero_capacity_still_holds_one_tile() {
        let cache = TileCache::new(0);
        cache.insert(TileCoord::new(0, 0, 0), vec![9]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cached_source_fetches_once() {
        let calls = AtomicUsize::new(0);
        let inner = |_z: u8, x: u32, _y: u32| {
            calls.fetch_add(1, Ordering::SeqCst);
            if x == 0 {
                None
            } else {
                Some(vec![x as u8])
            }
        };
        let source = CachedTileSource::new(inner, 8);
        assert_eq!(source.fetch(1, 1, 0), Some(vec![1]));
        assert_eq!(source.fetch(1, 1, 0), Some(vec![1]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert_eq!(source.fetch(1, 0, 0), None);
        assert_eq!(source.fetch(1, 0, 0), None);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(source.cache().len(), 1);
    }
}
