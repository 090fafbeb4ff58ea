//! Content store interface
//!
//! Persistence is an external concern. The core only needs ordered,
//! filtered reads and whole-article writes. [`MemoryStore`] is an
//! in-process implementation suitable for tests and small sites.

use crate::article::{Article, ArticleId};
use crate::{BlogError, Result};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;
use std::sync::Mutex;
use tracing::debug;

/// Filter over articles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Matches everything
    Any,
    /// Published articles
    Live,
    /// `featured == true`
    Featured,
    /// Carries this exact tag
    Tagged(String),
    /// Carries at least one of these tags
    AnyTag(BTreeSet<String>),
    /// Slugified author equals this slug
    AuthorSlug(String),
    /// Publish date falls within the filter
    PublishedIn(DateFilter),
    /// Has this id
    Id(ArticleId),
    /// Does not have this id
    Exclude(ArticleId),
    /// Every inner predicate matches
    All(Vec<Predicate>),
}

impl Predicate {
    /// Evaluate against an article
    pub fn matches(&self, article: &Article) -> bool {
        match self {
            Self::Any => true,
            Self::Live => article.is_live(),
            Self::Featured => article.featured,
            Self::Tagged(tag) => article.has_tag(tag),
            Self::AnyTag(tags) => !article.tags.is_disjoint(tags),
            Self::AuthorSlug(slug) => article.author_slug() == *slug,
            Self::PublishedIn(filter) => filter.matches(article.publish_date),
            Self::Id(id) => article.id == *id,
            Self::Exclude(id) => article.id != *id,
            Self::All(predicates) => predicates.iter().all(|p| p.matches(article)),
        }
    }

    /// Live and also matching `other`
    pub fn live_and(other: Predicate) -> Self {
        Self::All(vec![Self::Live, other])
    }
}

/// Year, year-month, or exact-day date filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFilter {
    pub year: i32,
    /// Month 1-12, any month when `None`
    pub month: Option<u32>,
    /// Day of month, any day when `None`; ignored without a month
    pub day: Option<u32>,
}

impl DateFilter {
    /// Every date in `year`
    pub fn year(year: i32) -> Self {
        Self {
            year,
            month: None,
            day: None,
        }
    }

    /// Every date in one month
    pub fn month(year: i32, month: u32) -> Self {
        Self {
            year,
            month: Some(month),
            day: None,
        }
    }

    /// One exact date
    pub fn day(year: i32, month: u32, day: u32) -> Self {
        Self {
            year,
            month: Some(month),
            day: Some(day),
        }
    }

    /// True if `date` falls inside the filter
    pub fn matches(&self, date: NaiveDate) -> bool {
        date.year() == self.year
            && self.month.is_none_or(|m| date.month() == m)
            && self.day.is_none_or(|d| date.day() == d)
    }
}

/// Result ordering by publish date
///
/// Ties keep creation order in both directions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Order {
    /// Newest publish date first
    #[default]
    Newest,
    /// Oldest publish date first
    Oldest,
}

/// A store query: filter, order, optional limit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub predicate: Predicate,
    pub order: Order,
    pub limit: Option<usize>,
}

impl Query {
    /// Newest-first query with no limit
    pub fn new(predicate: Predicate) -> Self {
        Self {
            predicate,
            order: Order::Newest,
            limit: None,
        }
    }

    /// Single-article lookup
    pub fn by_id(id: ArticleId) -> Self {
        Self::new(Predicate::Id(id)).limit(1)
    }

    /// Set the ordering
    #[must_use]
    pub fn order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    /// Return at most `limit` articles
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set or clear the limit
    #[must_use]
    pub fn limit_opt(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }
}

/// Article persistence
///
/// Implementations serialize their own writes; a completed `save` must be
/// visible to every later `query`. Backend failures are reported as
/// [`BlogError::StoreUnavailable`].
pub trait ContentStore: Send + Sync {
    /// Articles matching the query, ordered, at most `limit` of them
    fn query(&self, query: &Query) -> Result<Vec<Article>>;

    /// Insert or replace an article by id
    fn save(&self, article: Article) -> Result<Article>;
}

/// Sort in place by publish date, keeping the existing order for ties
pub fn sort_by_date(articles: &mut [Article], order: Order) {
    match order {
        Order::Newest => articles.sort_by(|a, b| b.publish_date.cmp(&a.publish_date)),
        Order::Oldest => articles.sort_by(|a, b| a.publish_date.cmp(&b.publish_date)),
    }
}

/// In-process store keeping articles in creation order
///
/// Updating an article replaces it in place, so it keeps its original
/// creation position for tie-breaking.
#[derive(Debug, Default)]
pub struct MemoryStore {
    articles: Mutex<Vec<Article>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored articles
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Article>> {
        self.articles.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ContentStore for MemoryStore {
    fn query(&self, query: &Query) -> Result<Vec<Article>> {
        let mut matched: Vec<Article> = self
            .lock()
            .iter()
            .filter(|article| query.predicate.matches(article))
            .cloned()
            .collect();
        sort_by_date(&mut matched, query.order);
        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }
        Ok(matched)
    }

    fn save(&self, article: Article) -> Result<Article> {
        let mut articles = self.lock();
        match articles.iter_mut().find(|existing| existing.id == article.id) {
            Some(existing) => {
                debug!("Updating article {}", article.id);
                *existing = article.clone();
            }
            None => {
                debug!("Inserting article {}", article.id);
                articles.push(article.clone());
            }
        }
        Ok(article)
    }
}

/// Look up a single article by id
pub fn find(store: &dyn ContentStore, id: ArticleId) -> Result<Article> {
    store
        .query(&Query::by_id(id))?
        .into_iter()
        .next()
        .ok_or(BlogError::NotFound(id))
}
