//! Cache capability for derived listings
//!
//! Cached listings are advisory: every read that fails, misses, or returns
//! an undecodable payload falls through to the content store. Staleness is
//! bounded by the per-entry TTL.
//!
//! # Cache Strategy
//!
//! - **Backend**: anything implementing [`Cache`] (in-process map, external KV)
//! - **Values**: JSON-encoded bytes
//! - **Expiry**: per-key TTL set on write
//! - **Eviction** ([`MemoryCache`]): LRU once the entry bound is reached
//!
//! # Example
//!
//! ```
//! use blog_core::cache::{Cache, MemoryCache};
//! use std::time::Duration;
//!
//! let cache = MemoryCache::new(1000);
//! cache.set("recent_posts_5", b"[]".to_vec(), Duration::from_secs(900)).unwrap();
//! assert_eq!(cache.get("recent_posts_5").unwrap(), Some(b"[]".to_vec()));
//!
//! cache.delete("recent_posts_5").unwrap();
//! assert_eq!(cache.get("recent_posts_5").unwrap(), None);
//! ```

use crate::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Key/value store with per-key TTL
///
/// Implementations report backend failures as
/// [`BlogError::CacheUnavailable`](crate::BlogError::CacheUnavailable).
pub trait Cache: Send + Sync {
    /// Fetch a live value
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store a value that expires after `ttl`
    fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()>;

    /// Remove a key; removing an absent key is not an error
    fn delete(&self, key: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    expires_at: Instant,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, Entry>,
    /// Higher counter means more recently used
    access_order: HashMap<String, u64>,
    access_counter: u64,
}

impl Inner {
    fn touch(&mut self, key: &str) {
        self.access_counter += 1;
        self.access_order.insert(key.to_string(), self.access_counter);
    }

    fn remove(&mut self, key: &str) -> Option<Entry> {
        self.access_order.remove(key);
        self.entries.remove(key)
    }

    fn evict_lru(&mut self) -> Option<String> {
        let lru_key = self
            .access_order
            .iter()
            .min_by_key(|(_, count)| **count)
            .map(|(key, _)| key.clone())?;
        self.remove(&lru_key);
        Some(lru_key)
    }
}

/// In-process cache with TTL expiry and LRU eviction
///
/// Thread-safe; a single mutex guards the map.
///
/// # Example
///
/// ```
/// use blog_core::cache::{Cache, MemoryCache};
/// use std::time::Duration;
///
/// let cache = MemoryCache::new(2);
/// let ttl = Duration::from_secs(60);
/// cache.set("a", vec![1], ttl).unwrap();
/// cache.set("b", vec![2], ttl).unwrap();
///
/// // Touch "a" so "b" becomes least recently used
/// cache.get("a").unwrap();
/// cache.set("c", vec![3], ttl).unwrap();
///
/// assert!(cache.contains("a"));
/// assert!(!cache.contains("b"));
/// assert!(cache.contains("c"));
/// ```
pub struct MemoryCache {
    max_size: usize,
    inner: Mutex<Inner>,
}

impl MemoryCache {
    /// Create a cache holding at most `max_size` entries
    ///
    /// # Panics
    ///
    /// Panics if `max_size` is 0
    pub fn new(max_size: usize) -> Self {
        assert!(max_size > 0, "Cache size must be greater than 0");
        Self {
            max_size,
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// True if a live (unexpired) entry exists for `key`
    pub fn contains(&self, key: &str) -> bool {
        self.lock()
            .entries
            .get(key)
            .is_some_and(|entry| entry.expires_at > Instant::now())
    }

    /// Number of stored entries, including expired ones not yet purged
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// True if nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.max_size
    }

    /// Drop every entry
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.access_order.clear();
        inner.access_counter = 0;
    }
}

impl fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCache")
            .field("max_size", &self.max_size)
            .field("len", &self.len())
            .finish()
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut inner = self.lock();
        let expired = match inner.entries.get(key) {
            None => return Ok(None),
            Some(entry) => entry.expires_at <= Instant::now(),
        };
        if expired {
            inner.remove(key);
            return Ok(None);
        }
        inner.touch(key);
        Ok(inner.entries.get(key).map(|entry| entry.value.clone()))
    }

    fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        let mut inner = self.lock();
        if inner.entries.len() >= self.max_size && !inner.entries.contains_key(key) {
            if let Some(evicted) = inner.evict_lru() {
                debug!("Evicted cache entry {}", evicted);
            }
        }
        let expires_at = Instant::now() + ttl;
        inner
            .entries
            .insert(key.to_string(), Entry { value, expires_at });
        inner.touch(key);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.lock().remove(key);
        Ok(())
    }
}

/// Default bound on keys tracked by a [`CacheHandle`]
pub const DEFAULT_TRACKED_KEYS: usize = 10_000;

/// Shared cache capability handed to resolvers and the invalidation coordinator
///
/// Wraps a backend and remembers keys written through [`set_json`], so a key
/// family ("every `recent_posts_*` variant") can be invalidated with exact
/// deletes instead of a backend-side wildcard. Cloning shares both the
/// backend and the key registry.
///
/// Each tracked key carries the expiry it was written with. Expired keys are
/// pruned on the next write, and once the registry is full the key closest
/// to expiry is forgotten. A forgotten key can only be stale until its TTL.
///
/// [`set_json`]: CacheHandle::set_json
#[derive(Clone)]
pub struct CacheHandle {
    backend: Arc<dyn Cache>,
    written: Arc<Mutex<BTreeMap<String, Instant>>>,
    max_tracked: usize,
}

impl CacheHandle {
    /// Wrap a cache backend, tracking up to [`DEFAULT_TRACKED_KEYS`] keys
    pub fn new(backend: Arc<dyn Cache>) -> Self {
        Self::with_tracking_limit(backend, DEFAULT_TRACKED_KEYS)
    }

    /// Wrap a cache backend, tracking at most `max_tracked` keys
    ///
    /// # Panics
    ///
    /// Panics if `max_tracked` is 0
    pub fn with_tracking_limit(backend: Arc<dyn Cache>, max_tracked: usize) -> Self {
        assert!(max_tracked > 0, "Tracking limit must be greater than 0");
        Self {
            backend,
            written: Arc::new(Mutex::new(BTreeMap::new())),
            max_tracked,
        }
    }

    fn registry(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Instant>> {
        self.written.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn track(&self, key: &str, expires_at: Instant) {
        let now = Instant::now();
        let mut registry = self.registry();
        registry.retain(|_, expiry| *expiry > now);
        registry.insert(key.to_string(), expires_at);
        while registry.len() > self.max_tracked {
            let Some(oldest) = registry
                .iter()
                .min_by_key(|(_, expiry)| **expiry)
                .map(|(key, _)| key.clone())
            else {
                break;
            };
            registry.remove(&oldest);
            debug!("Registry full, no longer tracking {}", oldest);
        }
    }

    /// Read and decode a cached value
    ///
    /// Backend failures and undecodable payloads are logged and reported as
    /// a miss. An undecodable entry is also deleted.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = match self.backend.get(key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!("Cache miss for {}", key);
                return None;
            }
            Err(e) => {
                warn!("Cache read for {} failed, bypassing cache: {}", key, e);
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => {
                debug!("Cache hit for {}", key);
                Some(value)
            }
            Err(e) => {
                warn!("Discarding undecodable cache entry {}: {}", key, e);
                if let Err(e) = self.delete(key) {
                    warn!("Failed to delete undecodable cache entry {}: {}", key, e);
                }
                None
            }
        }
    }

    /// Encode and store a value, tracking the key for family invalidation
    ///
    /// Failures are logged and swallowed.
    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Duration) {
        if self.write_json(key, value, ttl) {
            self.track(key, Instant::now() + ttl);
        }
    }

    /// Encode and store a value that is never invalidated by family
    ///
    /// For keys whose name already changes with their content.
    pub fn set_json_untracked<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Duration) {
        self.write_json(key, value, ttl);
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Duration) -> bool {
        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to encode cache entry {}: {}", key, e);
                return false;
            }
        };
        match self.backend.set(key, bytes, ttl) {
            Ok(()) => {
                debug!("Cached {} for {}s", key, ttl.as_secs());
                true
            }
            Err(e) => {
                warn!("Cache write for {} failed, continuing uncached: {}", key, e);
                false
            }
        }
    }

    /// Delete a key from the backend
    ///
    /// On success the key is also forgotten by the registry. On failure it
    /// is kept so a later invalidation retries it.
    pub fn delete(&self, key: &str) -> Result<()> {
        self.backend.delete(key)?;
        self.registry().remove(key);
        Ok(())
    }

    /// Unexpired tracked keys, not since deleted, that satisfy `filter`
    pub fn tracked_keys(&self, filter: impl Fn(&str) -> bool) -> Vec<String> {
        let now = Instant::now();
        self.registry()
            .iter()
            .filter(|(key, expiry)| **expiry > now && filter(key))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Number of registry entries, including expired ones not yet pruned
    pub fn tracked_len(&self) -> usize {
        self.registry().len()
    }

    /// The wrapped backend
    pub fn backend(&self) -> &Arc<dyn Cache> {
        &self.backend
    }
}

impl fmt::Debug for CacheHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheHandle")
            .field("tracked_keys", &self.registry().len())
            .finish()
    }
}
