#![doc = include_str!("../README.md")]

/// Articles, identity and the article builder
pub mod article;
/// Typed article body: blocks and inline rich text
pub mod body;
/// Cache capability, in-memory backend and the tracking handle
pub mod cache;
/// Citation extraction and reference lists
pub mod citations;
mod blog;
mod config;
mod error;
/// Cache invalidation on article writes
pub mod invalidation;
/// Cache key layout
pub mod keys;
/// Recent, featured, tag and archive listings
pub mod query;
/// Related articles by shared tags
pub mod related;
/// Content store interface and in-memory store
pub mod store;
/// Save-time article validation
pub mod validation;

pub use article::{Article, ArticleBuilder, ArticleId, ArticleStatus, slugify};
pub use blog::{Blog, ReadingTimeChange, RecalculationReport};
pub use body::{Block, Body, BodyVersion, CitationMarker, Inline, RichText};
pub use cache::{Cache, CacheHandle, MemoryCache};
pub use citations::{
    Anchors, Citation, CitationNumber, CitationParseError, ReferenceEntry, ReferenceList,
    ReferenceResolver, extract,
};
pub use config::{BlogConfig, DEFAULT_CACHE_TTL_SECS};
pub use error::{BlogError, Result, ValidationError};
pub use invalidation::{InvalidationCoordinator, InvalidationReport};
pub use query::{Adjacent, Paginated, QueryResolver, paginate};
pub use related::RelationshipResolver;
pub use store::{ContentStore, DateFilter, MemoryStore, Order, Predicate, Query};
pub use validation::ValidationConfig;
