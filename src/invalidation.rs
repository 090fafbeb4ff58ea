//! Cache invalidation on article writes
//!
//! After every save the coordinator deletes the cached listings the article
//! can appear in:
//!
//! - every cached `recent_posts_*` and `featured_posts_*` variant
//! - every cached `related_{id}_*` variant for the saved article
//! - every cached `posts_by_tag_{t}_*` variant, for each tag the article
//!   carries now or carried before the save
//!
//! Deletion is best-effort. A backend failure is logged and the remaining
//! keys are still attempted; the save itself never fails because of it.
//! Listings the coordinator misses stay stale for at most one TTL.

use crate::article::Article;
use crate::cache::CacheHandle;
use crate::keys;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Outcome of one invalidation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidationReport {
    /// Keys deleted
    pub deleted: Vec<String>,
    /// Keys whose delete failed
    pub failed: Vec<String>,
}

impl InvalidationReport {
    /// True if every delete succeeded
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Deletes the cached listings an article write makes stale
#[derive(Debug, Clone)]
pub struct InvalidationCoordinator {
    cache: CacheHandle,
}

impl InvalidationCoordinator {
    /// Create a coordinator over the shared cache handle
    pub fn new(cache: CacheHandle) -> Self {
        Self { cache }
    }

    /// Cached keys affected by saving `article`
    ///
    /// `previous` is the stored version before the save, if any; tags it
    /// carried are included so removing a tag also refreshes that listing.
    pub fn affected_keys(&self, article: &Article, previous: Option<&Article>) -> Vec<String> {
        let tags: BTreeSet<&str> = article
            .tags
            .iter()
            .chain(previous.into_iter().flat_map(|p| p.tags.iter()))
            .map(String::as_str)
            .collect();

        let mut prefixes = vec![
            keys::RECENT_POSTS.to_string(),
            keys::FEATURED_POSTS.to_string(),
            keys::related_prefix(article.id),
        ];
        prefixes.extend(tags.into_iter().map(keys::posts_by_tag_prefix));

        let mut affected = Vec::new();
        for prefix in &prefixes {
            affected.extend(
                self.cache
                    .tracked_keys(|key| keys::is_variant(key, prefix)),
            );
        }
        affected
    }

    /// Delete every key affected by saving `article`
    pub fn article_saved(&self, article: &Article, previous: Option<&Article>) -> InvalidationReport {
        let mut report = InvalidationReport::default();
        for key in self.affected_keys(article, previous) {
            match self.cache.delete(&key) {
                Ok(()) => report.deleted.push(key),
                Err(e) => {
                    warn!("Failed to invalidate {}: {}", key, e);
                    report.failed.push(key);
                }
            }
        }
        debug!(
            "Invalidated {} keys for article {} ({} failed)",
            report.deleted.len(),
            article.id,
            report.failed.len()
        );
        report
    }
}
