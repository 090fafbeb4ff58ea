//! Article validation
//!
//! Rules applied when an article is saved. Violations are returned to the
//! caller, never corrected in place.

use crate::article::Article;
use crate::error::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Configuration options for validation behavior
///
/// # Examples
///
/// ```
/// use blog_core::validation::ValidationConfig;
///
/// // Strict validation (default)
/// let strict = ValidationConfig::strict();
/// assert!(!strict.allow_future_dates);
///
/// // Lenient validation (scheduled posts allowed)
/// let lenient = ValidationConfig::lenient();
/// assert!(lenient.allow_future_dates);
///
/// // Custom configuration
/// let custom = ValidationConfig {
///     max_excerpt_chars: 160,
///     ..ValidationConfig::strict()
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// If false, reject publish dates after the save date
    pub allow_future_dates: bool,

    /// Maximum excerpt length in characters
    pub max_excerpt_chars: usize,

    /// Maximum author name length in characters
    pub max_author_chars: usize,
}

impl ValidationConfig {
    /// Future dates rejected, 250-character excerpt, 100-character author
    pub fn strict() -> Self {
        Self {
            allow_future_dates: false,
            max_excerpt_chars: 250,
            max_author_chars: 100,
        }
    }

    /// Same bounds as `strict()` but future dates allowed
    pub fn lenient() -> Self {
        Self {
            allow_future_dates: true,
            ..Self::strict()
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self::strict()
    }
}

/// Validates that a publish date is not after `today`
///
/// # Examples
///
/// ```
/// use blog_core::validation::{validate_publish_date, ValidationConfig};
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2025, 10, 19).unwrap();
/// let tomorrow = today.succ_opt().unwrap();
/// let config = ValidationConfig::strict();
///
/// assert!(validate_publish_date(today, today, &config).is_ok());
/// assert!(validate_publish_date(tomorrow, today, &config).is_err());
/// assert!(validate_publish_date(tomorrow, today, &ValidationConfig::lenient()).is_ok());
/// ```
pub fn validate_publish_date(
    date: NaiveDate,
    today: NaiveDate,
    config: &ValidationConfig,
) -> Result<(), ValidationError> {
    if !config.allow_future_dates && date > today {
        return Err(ValidationError::FuturePublishDate { date, today });
    }
    Ok(())
}

/// Validates that the author is present and within bounds
pub fn validate_author(author: &str, config: &ValidationConfig) -> Result<(), ValidationError> {
    if author.trim().is_empty() {
        return Err(ValidationError::EmptyAuthor);
    }
    let len = author.chars().count();
    if len > config.max_author_chars {
        return Err(ValidationError::AuthorTooLong {
            len,
            max: config.max_author_chars,
        });
    }
    Ok(())
}

/// Validates the excerpt length, counted in characters (not bytes)
///
/// # Examples
///
/// ```
/// use blog_core::validation::{validate_excerpt, ValidationConfig};
///
/// let config = ValidationConfig::strict();
/// assert!(validate_excerpt(&"x".repeat(250), &config).is_ok());
/// assert!(validate_excerpt(&"x".repeat(251), &config).is_err());
/// assert!(validate_excerpt(&"é".repeat(250), &config).is_ok());
/// ```
pub fn validate_excerpt(excerpt: &str, config: &ValidationConfig) -> Result<(), ValidationError> {
    let len = excerpt.chars().count();
    if len > config.max_excerpt_chars {
        return Err(ValidationError::ExcerptTooLong {
            len,
            max: config.max_excerpt_chars,
        });
    }
    Ok(())
}

/// Validates a whole article as of `today`
///
/// Checks run in field order (publish date, author, excerpt, body blocks)
/// and the first failure is returned.
pub fn validate_article(
    article: &Article,
    today: NaiveDate,
    config: &ValidationConfig,
) -> Result<(), ValidationError> {
    validate_publish_date(article.publish_date, today, config)?;
    validate_author(&article.author, config)?;
    validate_excerpt(&article.excerpt, config)?;
    article.body.validate()
}
