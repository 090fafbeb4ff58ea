//! Article builder
//!
//! Validation is not performed here; it happens when the article is saved,
//! against the date of the save.

use std::collections::BTreeSet;

use chrono::{NaiveDate, Utc};

use super::types::{Article, ArticleId, ArticleStatus, slugify};
use crate::body::{Block, Body};

#[must_use]
#[derive(Debug, Clone, Default)]
pub struct ArticleBuilder {
    id: Option<ArticleId>,
    title: String,
    slug: Option<String>,
    author: String,
    publish_date: Option<NaiveDate>,
    excerpt: String,
    tags: BTreeSet<String>,
    body: Body,
    featured: bool,
    status: ArticleStatus,
}

impl ArticleBuilder {
    /// Create a new ArticleBuilder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific id (a fresh one is generated otherwise)
    pub fn id(mut self, id: ArticleId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the slug (derived from the title if not provided)
    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Set the author
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Set the publish date (today, UTC, if not provided)
    pub fn publish_date(mut self, date: NaiveDate) -> Self {
        self.publish_date = Some(date);
        self
    }

    /// Set the excerpt
    pub fn excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = excerpt.into();
        self
    }

    /// Replace the tag set
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Add a single tag
    pub fn add_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Replace the body
    pub fn body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    /// Append a block to the body
    pub fn block(mut self, block: Block) -> Self {
        self.body.push(block);
        self
    }

    /// Append a plain-text paragraph to the body
    pub fn paragraph(self, text: &str) -> Self {
        self.block(Block::paragraph(text))
    }

    /// Mark as featured
    pub fn featured(mut self, featured: bool) -> Self {
        self.featured = featured;
        self
    }

    /// Set the publication state
    pub fn status(mut self, status: ArticleStatus) -> Self {
        self.status = status;
        self
    }

    /// Shorthand for `status(ArticleStatus::Published)`
    pub fn published(self) -> Self {
        self.status(ArticleStatus::Published)
    }

    /// Build the article
    pub fn build(self) -> Article {
        let slug = match self.slug {
            Some(slug) if !slug.is_empty() => slug,
            _ => slugify(&self.title),
        };
        Article {
            id: self.id.unwrap_or_default(),
            title: self.title,
            slug,
            author: self.author,
            publish_date: self
                .publish_date
                .unwrap_or_else(|| Utc::now().date_naive()),
            excerpt: self.excerpt,
            tags: self.tags,
            body: self.body,
            featured: self.featured,
            status: self.status,
            reading_time: 0,
        }
    }
}
