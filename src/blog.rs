//! Content service
//!
//! [`Blog`] wires the store, the cache and the resolvers together and owns
//! the write path. Every save is validated, gets its derived fields
//! recomputed, is persisted, and then invalidates the affected listings
//! before returning, so a later read in the same process never sees the
//! pre-save listing.
//!
//! # Example
//!
//! ```
//! use blog_core::cache::MemoryCache;
//! use blog_core::store::MemoryStore;
//! use blog_core::{ArticleBuilder, Blog, BlogConfig};
//! use std::sync::Arc;
//!
//! let blog = Blog::new(
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(MemoryCache::new(1000)),
//!     BlogConfig::default(),
//! );
//!
//! let article = ArticleBuilder::new()
//!     .title("Hello")
//!     .author("Ada Lovelace")
//!     .publish_date(chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
//!     .paragraph("First post.")
//!     .published()
//!     .build();
//! let saved = blog.save(article).unwrap();
//! assert_eq!(saved.reading_time, 1);
//! assert_eq!(blog.recent()[0].id, saved.id);
//! ```

use crate::article::{Article, ArticleId, ArticleStatus, slugify};
use crate::cache::{Cache, CacheHandle};
use crate::citations::{ReferenceList, ReferenceResolver};
use crate::config::BlogConfig;
use crate::invalidation::InvalidationCoordinator;
use crate::query::QueryResolver;
use crate::related::RelationshipResolver;
use crate::store::{self, ContentStore, Order, Predicate, Query};
use crate::validation::validate_article;
use crate::{BlogError, Result};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, info};

/// One article whose stored reading time differs from the computed one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingTimeChange {
    pub id: ArticleId,
    pub title: String,
    /// Stored minutes
    pub old: u32,
    /// Recomputed minutes
    pub new: u32,
}

/// Outcome of [`Blog::recalculate_reading_times`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecalculationReport {
    /// Articles examined
    pub checked: usize,
    /// Articles whose reading time changed (or would change)
    pub changes: Vec<ReadingTimeChange>,
    /// True if nothing was written
    pub dry_run: bool,
}

/// Store, cache and resolvers behind one handle
pub struct Blog {
    store: Arc<dyn ContentStore>,
    config: BlogConfig,
    queries: QueryResolver,
    related: RelationshipResolver,
    references: ReferenceResolver,
    invalidation: InvalidationCoordinator,
}

impl Blog {
    /// Build the service over a store and a cache backend
    pub fn new(store: Arc<dyn ContentStore>, cache: Arc<dyn Cache>, config: BlogConfig) -> Self {
        let cache = CacheHandle::new(cache);
        let ttl = config.cache_ttl();
        Self {
            queries: QueryResolver::new(
                Arc::clone(&store),
                cache.clone(),
                ttl,
                config.archive_page_size,
            ),
            related: RelationshipResolver::new(Arc::clone(&store), cache.clone(), ttl),
            references: ReferenceResolver::new(cache.clone(), ttl),
            invalidation: InvalidationCoordinator::new(cache),
            store,
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &BlogConfig {
        &self.config
    }

    /// Listing queries
    pub fn queries(&self) -> &QueryResolver {
        &self.queries
    }

    /// Related-article lookups
    pub fn relationships(&self) -> &RelationshipResolver {
        &self.related
    }

    /// Cached reference lists
    pub fn references(&self) -> &ReferenceResolver {
        &self.references
    }

    /// Save-time cache invalidation
    pub fn invalidation(&self) -> &InvalidationCoordinator {
        &self.invalidation
    }

    /// Recent articles using the configured default length
    pub fn recent(&self) -> Vec<Article> {
        self.queries.get_recent(self.config.recent_limit)
    }

    /// Featured articles using the configured default length
    pub fn featured(&self) -> Vec<Article> {
        self.queries.get_featured(self.config.featured_limit)
    }

    /// Related articles using the configured default length
    pub fn related_to(&self, article: &Article) -> Vec<Article> {
        self.related.related(article, self.config.related_limit)
    }

    /// Reference list for an article's body
    pub fn references_for(&self, article: &Article) -> ReferenceList {
        self.references.references(article)
    }

    /// Fetch one article by id, regardless of status
    pub fn get(&self, id: ArticleId) -> Result<Article> {
        store::find(self.store.as_ref(), id)
    }

    /// Validate and persist an article as of today (UTC)
    pub fn save(&self, article: Article) -> Result<Article> {
        self.save_at(article, Utc::now().date_naive())
    }

    /// Validate and persist an article as of `today`
    ///
    /// A rejected article is not written and nothing is invalidated. Store
    /// failures are returned; cache failures during invalidation are logged
    /// only.
    pub fn save_at(&self, mut article: Article, today: NaiveDate) -> Result<Article> {
        validate_article(&article, today, &self.config.validation)?;
        if article.slug.is_empty() {
            article.slug = slugify(&article.title);
        }
        article.reading_time = article.compute_reading_time(self.config.words_per_minute);

        let previous = match store::find(self.store.as_ref(), article.id) {
            Ok(previous) => Some(previous),
            Err(BlogError::NotFound(_)) => None,
            Err(e) => return Err(e),
        };

        self.persist(article, previous.as_ref())
    }

    /// Move an article to the published state
    pub fn publish(&self, id: ArticleId) -> Result<Article> {
        self.transition(id, ArticleStatus::Published)
    }

    /// Take an article out of every listing
    pub fn unpublish(&self, id: ArticleId) -> Result<Article> {
        self.transition(id, ArticleStatus::Unpublished)
    }

    fn transition(&self, id: ArticleId, status: ArticleStatus) -> Result<Article> {
        let mut article = self.get(id)?;
        debug!("Article {} {:?} -> {:?}", id, article.status, status);
        article.status = status;
        self.save(article)
    }

    /// Recompute the reading time of every stored article
    ///
    /// Articles whose stored value is already correct are left alone. With
    /// `dry_run` the changes are only reported. Stored articles are not
    /// re-validated, so an article with a future date can still be fixed.
    pub fn recalculate_reading_times(&self, dry_run: bool) -> Result<RecalculationReport> {
        let articles = self
            .store
            .query(&Query::new(Predicate::Any).order(Order::Oldest))?;
        let mut report = RecalculationReport {
            checked: articles.len(),
            dry_run,
            ..Default::default()
        };

        for mut article in articles {
            let computed = article.compute_reading_time(self.config.words_per_minute);
            if computed == article.reading_time {
                continue;
            }
            report.changes.push(ReadingTimeChange {
                id: article.id,
                title: article.title.clone(),
                old: article.reading_time,
                new: computed,
            });
            if dry_run {
                continue;
            }
            let previous = article.clone();
            article.reading_time = computed;
            self.persist(article, Some(&previous))?;
        }

        info!(
            "Reading times: {} checked, {} {}",
            report.checked,
            report.changes.len(),
            if dry_run { "would change" } else { "updated" }
        );
        Ok(report)
    }

    fn persist(&self, article: Article, previous: Option<&Article>) -> Result<Article> {
        let saved = self.store.save(article)?;
        let invalidated = self.invalidation.article_saved(&saved, previous);
        info!(
            "Saved article {} ({:?}), invalidated {} cache keys",
            saved.id,
            saved.status,
            invalidated.deleted.len()
        );
        Ok(saved)
    }
}
