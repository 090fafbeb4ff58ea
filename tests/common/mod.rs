//! Shared fakes for integration tests

#![allow(dead_code)]

use blog_core::{
    Article, ArticleBuilder, Blog, BlogConfig, BlogError, Cache, ContentStore, MemoryCache,
    MemoryStore, Query, Result,
};
use chrono::NaiveDate;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// Install a test-writer subscriber once; honours `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Date every integration test treats as today
pub fn today() -> NaiveDate {
    date(2025, 10, 19)
}

/// A live article with a one-word body
pub fn post(title: &str, published: NaiveDate, tags: &[&str]) -> Article {
    ArticleBuilder::new()
        .title(title)
        .author("Test Author")
        .publish_date(published)
        .excerpt(format!("About {title}"))
        .tags(tags.iter().copied())
        .paragraph("body")
        .published()
        .build()
}

/// Blog over a fresh flaky store and recording cache
pub fn setup() -> (Blog, Arc<FlakyStore>, Arc<RecordingCache>) {
    init_tracing();
    let store = Arc::new(FlakyStore::new());
    let cache = Arc::new(RecordingCache::new());
    let blog = Blog::new(store.clone(), cache.clone(), BlogConfig::default());
    (blog, store, cache)
}

pub fn titles(articles: &[Article]) -> Vec<&str> {
    articles.iter().map(|a| a.title.as_str()).collect()
}

/// Cache operation seen by [`RecordingCache`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheOp {
    Get(String),
    Set(String),
    Delete(String),
}

/// Memory cache that records every call
///
/// With `fail_deletes` set, deletes are recorded and then fail.
pub struct RecordingCache {
    inner: MemoryCache,
    ops: Mutex<Vec<CacheOp>>,
    fail_deletes: AtomicBool,
}

impl RecordingCache {
    pub fn new() -> Self {
        Self {
            inner: MemoryCache::new(1000),
            ops: Mutex::new(Vec::new()),
            fail_deletes: AtomicBool::new(false),
        }
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn ops(&self) -> Vec<CacheOp> {
        self.ops.lock().unwrap().clone()
    }

    pub fn clear_ops(&self) {
        self.ops.lock().unwrap().clear();
    }

    /// Deleted keys in call order
    pub fn deletes(&self) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                CacheOp::Delete(key) => Some(key),
                _ => None,
            })
            .collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains(key)
    }

    fn record(&self, op: CacheOp) {
        self.ops.lock().unwrap().push(op);
    }
}

impl Cache for RecordingCache {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.record(CacheOp::Get(key.to_string()));
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        self.record(CacheOp::Set(key.to_string()));
        self.inner.set(key, value, ttl)
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.record(CacheOp::Delete(key.to_string()));
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(BlogError::cache("delete refused"));
        }
        self.inner.delete(key)
    }
}

/// Cache whose backend is down
pub struct FailingCache;

impl Cache for FailingCache {
    fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Err(BlogError::cache("connection refused"))
    }

    fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<()> {
        Err(BlogError::cache("connection refused"))
    }

    fn delete(&self, _key: &str) -> Result<()> {
        Err(BlogError::cache("connection refused"))
    }
}

/// Memory store that counts queries and can be switched off
pub struct FlakyStore {
    inner: MemoryStore,
    queries: AtomicUsize,
    down: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            queries: AtomicUsize::new(0),
            down: AtomicBool::new(false),
        }
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

impl ContentStore for FlakyStore {
    fn query(&self, query: &Query) -> Result<Vec<Article>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.down.load(Ordering::SeqCst) {
            return Err(BlogError::store("database is down"));
        }
        self.inner.query(query)
    }

    fn save(&self, article: Article) -> Result<Article> {
        if self.down.load(Ordering::SeqCst) {
            return Err(BlogError::store("database is down"));
        }
        self.inner.save(article)
    }
}
