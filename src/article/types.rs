//! Core article data structures

use crate::body::Body;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// Opaque article identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(Uuid);

impl ArticleId {
    /// Generate a fresh random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ArticleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Publication state
///
/// An edit to a published article keeps it `Published`; there is no
/// separate "updated" state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    /// Not visible in any listing
    #[default]
    Draft,
    /// Visible in listings
    Published,
    /// Withdrawn; not visible in any listing
    Unpublished,
}

/// A content item with tags, body and metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    /// URL slug, derived from the title when left empty
    pub slug: String,
    pub author: String,
    /// Must not be after the save date
    pub publish_date: NaiveDate,
    /// Listing excerpt, bounded at save time
    pub excerpt: String,
    /// Order is irrelevant; matched exactly and case-sensitively
    pub tags: BTreeSet<String>,
    pub body: Body,
    pub featured: bool,
    pub status: ArticleStatus,
    /// Minutes, recomputed from the word count on every save
    pub reading_time: u32,
}

impl Article {
    /// True if the article appears in listings
    pub fn is_live(&self) -> bool {
        self.status == ArticleStatus::Published
    }

    /// Exact, case-sensitive tag membership
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Number of tags this article shares with `other`
    pub fn shared_tags(&self, other: &Article) -> usize {
        self.tags.intersection(&other.tags).count()
    }

    /// Words in the excerpt and all reader-visible body text
    pub fn word_count(&self) -> usize {
        self.excerpt.split_whitespace().count() + self.body.word_count()
    }

    /// Reading time in whole minutes, never less than one
    pub fn compute_reading_time(&self, words_per_minute: u32) -> u32 {
        let words = u32::try_from(self.word_count()).unwrap_or(u32::MAX);
        (words / words_per_minute.max(1)).max(1)
    }

    /// Date-based path: `YYYY/MM/DD/slug/`
    pub fn date_path(&self) -> String {
        format!(
            "{:04}/{:02}/{:02}/{}/",
            self.publish_date.year(),
            self.publish_date.month(),
            self.publish_date.day(),
            self.slug
        )
    }

    /// Author name as a URL slug
    pub fn author_slug(&self) -> String {
        slugify(&self.author)
    }
}

/// Lowercase slug: alphanumerics kept, every other run becomes a single `-`
pub fn slugify(s: &str) -> String {
    let mut slug = String::with_capacity(s.len());
    let mut pending_dash = false;
    for ch in s.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
