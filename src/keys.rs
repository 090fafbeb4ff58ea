//! Cache key layout
//!
//! | Family        | Key                              |
//! |---------------|----------------------------------|
//! | recent        | `recent_posts_{limit}`           |
//! | featured      | `featured_posts_{limit}`         |
//! | by tag        | `posts_by_tag_{tag}_{limit\|all}` |
//! | related       | `related_{id}_{limit}`           |
//! | references    | `references_{id}_{len:x}-{crc:08x}` |

use crate::article::ArticleId;
use crate::body::BodyVersion;

/// Prefix of recent-article listings
pub const RECENT_POSTS: &str = "recent_posts_";
/// Prefix of featured-article listings
pub const FEATURED_POSTS: &str = "featured_posts_";
/// Prefix of per-tag listings
pub const POSTS_BY_TAG: &str = "posts_by_tag_";
/// Prefix of related-article lists
pub const RELATED: &str = "related_";
/// Prefix of cached reference lists
pub const REFERENCES: &str = "references_";

const ALL: &str = "all";

/// Key of the `limit` most recent live articles
pub fn recent_posts(limit: usize) -> String {
    format!("{RECENT_POSTS}{limit}")
}

/// Key of the `limit` most recent featured articles
pub fn featured_posts(limit: usize) -> String {
    format!("{FEATURED_POSTS}{limit}")
}

/// Key of a tag listing; `None` means unlimited and maps to `all`
pub fn posts_by_tag(tag: &str, limit: Option<usize>) -> String {
    match limit {
        Some(limit) => format!("{}{limit}", posts_by_tag_prefix(tag)),
        None => format!("{}{ALL}", posts_by_tag_prefix(tag)),
    }
}

/// Prefix shared by every limit variant of one tag
pub fn posts_by_tag_prefix(tag: &str) -> String {
    format!("{POSTS_BY_TAG}{tag}_")
}

/// Key of the related list for one article and limit
pub fn related(id: ArticleId, limit: usize) -> String {
    format!("{}{limit}", related_prefix(id))
}

/// Prefix shared by every limit variant of one article's related list
pub fn related_prefix(id: ArticleId) -> String {
    format!("{RELATED}{id}_")
}

/// Reference list for one body version; never invalidated by family
pub fn references(id: ArticleId, version: BodyVersion) -> String {
    format!("{REFERENCES}{id}_{version}")
}

/// True if `key` is `prefix` followed by a limit (digits or `all`)
///
/// Guards against one tag's prefix matching a longer tag: the keys for tag
/// `a_b` start with `posts_by_tag_a_` but are not variants of tag `a`.
pub fn is_variant(key: &str, prefix: &str) -> bool {
    key.strip_prefix(prefix).is_some_and(|rest| {
        rest == ALL || (!rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
    })
}
