use crate::core::geo::TileCoord;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

const DEFAULT_CAPACITY: usize = 512;

/// Downloaded tile bytes, least recently used evicted first.
///
/// Clones share the same storage.
#[derive(Debug, Clone)]
pub struct TileCache {
    cache: Arc<Mutex<LruCache<TileCoord, Arc<Vec<u8>>>>>,
}

impl TileCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or_else(|| NonZeroUsize::new(DEFAULT_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    pub fn get(&self, coord: &TileCoord) -> Option<Arc<Vec<u8>>> {
        self.cache.lock().ok()?.get(coord).cloned()
    }

    pub fn insert(&self, coord: TileCoord, data: Vec<u8>) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(coord, Arc::new(data));
        }
    }

    pub fn contains(&self, coord: &TileCoord) -> bool {
        self.cache
            .lock()
            .map(|cache| cache.contains(coord))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.cache
            .lock()
            .map(|cache| cache.cap().get())
            .unwrap_or(0)
    }
}

impl Default for TileCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = TileCache::new(2);
        let a = TileCoord::new(0, 0, 1);
        let b = TileCoord::new(1, 0, 1);
        let c = TileCoord::new(0, 1, 1);

        cache.insert(a, vec![1]);
        cache.insert(b, vec![2]);
        assert!(cache.get(&a).is_some());
        cache.insert(c, vec![3]);

        assert!(cache.contains(&a));
        assert!(!cache.contains(&b));
        assert_eq!(cache.get(&c).as_deref(), Some(&vec![3]));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_zero_capacity_falls_back_to_default() {
        assert_eq!(TileCache::new(0).capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_clones_share_storage() {
        let cache = TileCache::new(4);
        let view = cache.clone();
        cache.insert(TileCoord::new(0, 0, 0), vec![9]);
        assert!(!view.is_empty());
    }
}
