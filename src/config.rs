//! Content layer configuration

use crate::validation::ValidationConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default cache TTL, also the staleness bound for cached listings
pub const DEFAULT_CACHE_TTL_SECS: u64 = 900;

/// Tunables for listings, caching and validation
///
/// Every field has a default, so a partial document deserializes.
///
/// # Example
///
/// ```
/// use blog_core::BlogConfig;
/// use std::time::Duration;
///
/// let config = BlogConfig::default();
/// assert_eq!(config.cache_ttl(), Duration::from_secs(900));
///
/// let config: BlogConfig = serde_json::from_str(r#"{"recent_limit": 10}"#).unwrap();
/// assert_eq!(config.recent_limit, 10);
/// assert_eq!(config.featured_limit, 3);
/// ```
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    /// TTL for every cached listing, in seconds
    pub cache_ttl_secs: u64,

    /// Default size of the recent-articles list
    pub recent_limit: usize,

    /// Default size of the featured-articles list
    pub featured_limit: usize,

    /// Default size of the related-articles list
    pub related_limit: usize,

    /// Reading speed used for reading-time estimates
    pub words_per_minute: u32,

    /// Articles per archive page
    pub archive_page_size: usize,

    /// Save-time validation rules
    pub validation: ValidationConfig,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            recent_limit: 5,
            featured_limit: 3,
            related_limit: 3,
            words_per_minute: 200,
            archive_page_size: 10,
            validation: ValidationConfig::strict(),
        }
    }
}

impl BlogConfig {
    /// Cache TTL as a Duration
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Override the cache TTL
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl_secs = ttl.as_secs();
        self
    }

    /// Override the validation rules
    pub fn with_validation(mut self, validation: ValidationConfig) -> Self {
        self.validation = validation;
        self
    }
}
