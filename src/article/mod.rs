//! Article data model
//!
//! This module is organized into:
//! - `types`: core data structures (Article, ArticleId, ArticleStatus)
//! - `builder`: ArticleBuilder for constructing articles

mod builder;
mod types;

pub use self::builder::ArticleBuilder;
pub use self::types::{Article, ArticleId, ArticleStatus, slugify};
