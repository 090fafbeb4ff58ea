//! Related articles by shared tags
//!
//! Ranking: number of tags shared with the source article (descending),
//! then publish date (descending), then creation order. Articles sharing no
//! tag are never related.
//!
//! The cached list for an article is dropped when that article is saved.
//! Tag edits on *other* articles do not touch it; that staleness is bounded
//! by the TTL only.

use crate::article::Article;
use crate::cache::CacheHandle;
use crate::keys;
use crate::store::{ContentStore, Predicate, Query};
use std::cmp::Reverse;
use std::sync::Arc;
use std::time::Duration;
use tracing::error;

/// Cache-first related articles ranked by shared tags
#[derive(Clone)]
pub struct RelationshipResolver {
    store: Arc<dyn ContentStore>,
    cache: CacheHandle,
    ttl: Duration,
}

impl RelationshipResolver {
    /// Create a resolver caching lists for `ttl`
    pub fn new(store: Arc<dyn ContentStore>, cache: CacheHandle, ttl: Duration) -> Self {
        Self { store, cache, ttl }
    }

    /// Up to `limit` live articles other than `article`, best match first
    pub fn related(&self, article: &Article, limit: usize) -> Vec<Article> {
        if limit == 0 || article.tags.is_empty() {
            return Vec::new();
        }
        let key = keys::related(article.id, limit);
        if let Some(related) = self.cache.get_json::<Vec<Article>>(&key) {
            return related;
        }

        let query = Query::new(Predicate::All(vec![
            Predicate::Live,
            Predicate::Exclude(article.id),
            Predicate::AnyTag(article.tags.clone()),
        ]));
        let candidates = match self.store.query(&query) {
            Ok(candidates) => candidates,
            Err(e) => {
                error!(
                    "Related articles for {} unavailable, serving empty result: {}",
                    article.id, e
                );
                return Vec::new();
            }
        };

        let related = rank(article, candidates, limit);
        self.cache.set_json(&key, &related, self.ttl);
        related
    }
}

/// Order candidates by overlap with `source`, keeping at most `limit`
///
/// Candidates are expected newest-first; the sort is stable, so equal
/// overlap and equal date keep that order.
pub fn rank(source: &Article, candidates: Vec<Article>, limit: usize) -> Vec<Article> {
    let mut scored: Vec<(usize, Article)> = candidates
        .into_iter()
        .filter(|candidate| candidate.id != source.id)
        .map(|candidate| (source.shared_tags(&candidate), candidate))
        .filter(|(shared, _)| *shared > 0)
        .collect();
    scored.sort_by_key(|(shared, candidate)| (Reverse(*shared), Reverse(candidate.publish_date)));
    scored.truncate(limit);
    scored.into_iter().map(|(_, candidate)| candidate).collect()
}
