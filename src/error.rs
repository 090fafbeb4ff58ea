//! Error types

use crate::article::ArticleId;
use chrono::NaiveDate;
use thiserror::Error;

/// Content layer errors
#[derive(Error, Debug)]
pub enum BlogError {
    /// Article rejected at save time
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Content store could not answer a query or accept a write
    #[error("Content store unavailable: {0}")]
    StoreUnavailable(String),

    /// Cache backend failed
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    /// No article with this id exists in the store
    #[error("No such article: {0}")]
    NotFound(ArticleId),

    /// Cache payload could not be encoded or decoded
    #[error("Codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Reasons an article save is rejected
///
/// Never silently corrected; the caller of `save` gets the reason back.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Publish date is after the current date
    #[error("Publish date {date} is in the future (today is {today})")]
    FuturePublishDate {
        /// Requested publish date
        date: NaiveDate,
        /// Date the save was attempted on
        today: NaiveDate,
    },

    /// Author is empty or whitespace
    #[error("Author name is required")]
    EmptyAuthor,

    /// Author name exceeds the configured bound
    #[error("Author name is {len} characters, maximum is {max}")]
    AuthorTooLong {
        /// Actual length in characters
        len: usize,
        /// Configured maximum
        max: usize,
    },

    /// Excerpt exceeds the configured bound
    #[error("Excerpt is {len} characters, maximum is {max}")]
    ExcerptTooLong {
        /// Actual length in characters
        len: usize,
        /// Configured maximum
        max: usize,
    },

    /// A body block failed its own validation
    #[error("Block {index} ({kind}): {reason}")]
    InvalidBlock {
        /// Position of the block in the body
        index: usize,
        /// Block kind name
        kind: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Result type alias using BlogError
pub type Result<T> = std::result::Result<T, BlogError>;

impl BlogError {
    /// Create a store-unavailable error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::StoreUnavailable(msg.into())
    }

    /// Create a cache-unavailable error
    pub fn cache(msg: impl Into<String>) -> Self {
        Self::CacheUnavailable(msg.into())
    }
}
