//! Article listings
//!
//! Recent, featured and per-tag lists are served cache-first with a TTL.
//! Every list operation degrades to an empty result when the store is
//! unavailable; the failure is logged, never returned.

use crate::article::{Article, ArticleId};
use crate::cache::CacheHandle;
use crate::keys;
use crate::store::{ContentStore, DateFilter, Order, Predicate, Query};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// 1-based page number actually served
    pub number: usize,
    /// Total pages (at least 1)
    pub num_pages: usize,
    /// Total items across all pages
    pub total: usize,
}

impl<T> Paginated<T> {
    /// True if a later page exists
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    /// True if an earlier page exists
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

/// Split `items` into pages and return page `page` (1-based)
///
/// Out-of-range requests are clamped: page 0 serves the first page, a page
/// past the end serves the last. An empty input has one empty page.
///
/// # Example
///
/// ```
/// use blog_core::query::paginate;
///
/// let page = paginate((1..=25).collect::<Vec<_>>(), 3, 10);
/// assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
/// assert_eq!(page.num_pages, 3);
///
/// let page = paginate((1..=25).collect::<Vec<_>>(), 99, 10);
/// assert_eq!(page.number, 3);
/// ```
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Paginated<T> {
    let per_page = per_page.max(1);
    let total = items.len();
    let num_pages = total.div_ceil(per_page).max(1);
    let number = page.clamp(1, num_pages);
    let items = items
        .into_iter()
        .skip((number - 1) * per_page)
        .take(per_page)
        .collect();
    Paginated {
        items,
        number,
        num_pages,
        total,
    }
}

/// Neighbours of an article in the newest-first live listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Adjacent {
    /// Next older article
    pub previous: Option<Article>,
    /// Next newer article
    pub next: Option<Article>,
}

/// Cache-first article listings
#[derive(Clone)]
pub struct QueryResolver {
    store: Arc<dyn ContentStore>,
    cache: CacheHandle,
    ttl: Duration,
    page_size: usize,
}

impl QueryResolver {
    /// Create a resolver caching listings for `ttl`, paging archives by `page_size`
    pub fn new(
        store: Arc<dyn ContentStore>,
        cache: CacheHandle,
        ttl: Duration,
        page_size: usize,
    ) -> Self {
        Self {
            store,
            cache,
            ttl,
            page_size,
        }
    }

    /// Up to `limit` live articles, newest first
    pub fn get_recent(&self, limit: usize) -> Vec<Article> {
        self.cached(
            &keys::recent_posts(limit),
            Query::new(Predicate::Live).limit(limit),
        )
    }

    /// Up to `limit` live featured articles, newest first
    pub fn get_featured(&self, limit: usize) -> Vec<Article> {
        self.cached(
            &keys::featured_posts(limit),
            Query::new(Predicate::live_and(Predicate::Featured)).limit(limit),
        )
    }

    /// Live articles carrying `tag` (exact, case-sensitive), newest first
    ///
    /// With no limit every match is returned.
    pub fn get_by_tag(&self, tag: &str, limit: Option<usize>) -> Vec<Article> {
        self.cached(
            &keys::posts_by_tag(tag, limit),
            Query::new(Predicate::live_and(Predicate::Tagged(tag.to_string()))).limit_opt(limit),
        )
    }

    /// Live articles whose author slugifies to `author_slug`, newest first
    pub fn get_by_author(&self, author_slug: &str) -> Vec<Article> {
        self.fetch(&Query::new(Predicate::live_and(Predicate::AuthorSlug(
            author_slug.to_string(),
        ))))
    }

    /// One page of a year, month or day archive
    pub fn archive(&self, filter: DateFilter, page: usize) -> Paginated<Article> {
        let articles = self.fetch(&Query::new(Predicate::live_and(Predicate::PublishedIn(
            filter,
        ))));
        paginate(articles, page, self.page_size)
    }

    /// Distinct tags across live articles, sorted
    pub fn all_tags(&self) -> Vec<String> {
        self.fetch(&Query::new(Predicate::Live))
            .into_iter()
            .flat_map(|article| article.tags)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Previous (older) and next (newer) live articles around `id`
    ///
    /// Both are `None` if `id` is not live.
    pub fn adjacent(&self, id: ArticleId) -> Adjacent {
        let mut articles = self.fetch(&Query::new(Predicate::Live).order(Order::Newest));
        let Some(index) = articles.iter().position(|a| a.id == id) else {
            return Adjacent::default();
        };
        let previous = (index + 1 < articles.len()).then(|| articles.swap_remove(index + 1));
        let next = index.checked_sub(1).map(|i| articles.swap_remove(i));
        Adjacent { previous, next }
    }

    fn cached(&self, key: &str, query: Query) -> Vec<Article> {
        if query.limit == Some(0) {
            return Vec::new();
        }
        if let Some(articles) = self.cache.get_json::<Vec<Article>>(key) {
            return articles;
        }
        match self.store.query(&query) {
            Ok(mut articles) => {
                if let Some(limit) = query.limit {
                    articles.truncate(limit);
                }
                self.cache.set_json(key, &articles, self.ttl);
                debug!("Cached {} articles under {}", articles.len(), key);
                articles
            }
            Err(e) => {
                error!("Listing {} unavailable, serving empty result: {}", key, e);
                Vec::new()
            }
        }
    }

    fn fetch(&self, query: &Query) -> Vec<Article> {
        self.store.query(query).unwrap_or_else(|e| {
            error!("Store query failed, serving empty result: {}", e);
            Vec::new()
        })
    }
}
