//! Inline citation extraction
//!
//! Builds the reference list rendered at the end of an article from the
//! citation markers in its body.
//!
//! # Algorithm
//!
//! 1. Walk rich-text blocks in document order, collecting citation markers.
//! 2. Skip malformed markers (blank number or blank text) with a warning.
//! 3. Deduplicate by number: the first occurrence wins, later ones are
//!    dropped whatever their text or URL.
//! 4. Sort: numeric-looking numbers ascending by value, then every other
//!    label lexically.
//! 5. Attach anchor ids `ref-{number}` (list entry) and `cite-{number}`
//!    (inline marker) for two-way links.
//!
//! Extraction is a pure function of the body, so repeated runs produce
//! identical output.
//!
//! # Example
//!
//! ```
//! use blog_core::body::{Block, Body, CitationMarker, Inline, RichText, TextBlock};
//! use blog_core::citations::extract;
//!
//! let body = Body::new(vec![Block::Text(TextBlock {
//!     text: RichText::new(vec![
//!         Inline::text("Claim"),
//!         Inline::citation(CitationMarker::new("2", "Second source")),
//!         Inline::citation(CitationMarker::new("1", "First source")),
//!     ]),
//! })]);
//!
//! let refs = extract(&body);
//! let numbers: Vec<&str> = refs.entries.iter().map(|e| e.citation.number.as_str()).collect();
//! assert_eq!(numbers, ["1", "2"]);
//! assert_eq!(refs.entries[0].anchors.reference_id, "ref-1");
//! assert_eq!(refs.entries[0].anchors.citation_id, "cite-1");
//! ```

use crate::article::Article;
use crate::body::{Body, CitationMarker, Inline};
use crate::cache::CacheHandle;
use crate::keys;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Citation key: a number or free-form label
///
/// Stored trimmed. Deserializes from either a JSON string or integer, so
/// `1` and `"1"` are the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CitationNumber(String);

impl CitationNumber {
    /// The key as written (trimmed)
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the key is non-empty ASCII digits
    pub fn is_numeric(&self) -> bool {
        !self.0.is_empty() && self.0.bytes().all(|b| b.is_ascii_digit())
    }

    /// Digits without leading zeros (`"0"` for all-zero input)
    fn significant_digits(&self) -> &str {
        let trimmed = self.0.trim_start_matches('0');
        if trimmed.is_empty() { "0" } else { trimmed }
    }
}

impl Ord for CitationNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_numeric(), other.is_numeric()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.0.cmp(&other.0),
            // Compare digit strings by magnitude without parsing, so keys
            // longer than u64 still order correctly. Equal values ("1",
            // "01") fall back to the written form.
            (true, true) => {
                let (a, b) = (self.significant_digits(), other.significant_digits());
                a.len()
                    .cmp(&b.len())
                    .then_with(|| a.cmp(b))
                    .then_with(|| self.0.cmp(&other.0))
            }
        }
    }
}

impl PartialOrd for CitationNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CitationNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CitationNumber {
    fn from(s: &str) -> Self {
        Self(s.trim().to_string())
    }
}

impl From<String> for CitationNumber {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<u64> for CitationNumber {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl<'de> Deserialize<'de> for CitationNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(u64),
            Str(String),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(n) => n.into(),
            Raw::Str(s) => s.into(),
        })
    }
}

/// One entry of a reference list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub number: CitationNumber,
    /// Never blank
    pub text: String,
    pub url: Option<String>,
}

/// Element ids linking an inline marker and its reference-list entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchors {
    /// Id of the reference-list entry, `ref-{number}`
    pub reference_id: String,
    /// Id of the inline marker, `cite-{number}`
    pub citation_id: String,
}

impl Anchors {
    /// Anchors for a citation number
    pub fn for_number(number: &CitationNumber) -> Self {
        Self {
            reference_id: format!("ref-{number}"),
            citation_id: format!("cite-{number}"),
        }
    }
}

/// A citation with its anchors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub citation: Citation,
    pub anchors: Anchors,
}

/// Why a citation marker was skipped
///
/// `position` is the zero-based index of the marker among all citation
/// markers in the body, in document order.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CitationParseError {
    /// Marker has no usable number
    #[error("citation marker #{position} has no number")]
    MissingNumber {
        /// Marker index in document order
        position: usize,
    },

    /// Marker has no usable text
    #[error("citation marker #{position} ({number}) has no text")]
    MissingText {
        /// Marker index in document order
        position: usize,
        /// Number carried by the marker
        number: CitationNumber,
    },
}

/// Ordered, deduplicated references for one body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceList {
    /// Sorted entries with pairwise distinct numbers
    pub entries: Vec<ReferenceEntry>,
    /// Markers that could not be used, in document order
    pub skipped: Vec<CitationParseError>,
}

impl ReferenceList {
    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Citations without anchors, in list order
    pub fn citations(&self) -> impl Iterator<Item = &Citation> {
        self.entries.iter().map(|entry| &entry.citation)
    }

    /// Look up an entry by number
    pub fn get(&self, number: &str) -> Option<&ReferenceEntry> {
        self.entries
            .iter()
            .find(|entry| entry.citation.number.as_str() == number)
    }
}

fn parse_marker(marker: &CitationMarker, position: usize) -> Result<Citation, CitationParseError> {
    let number = match &marker.number {
        Some(number) if !number.as_str().is_empty() => number.clone(),
        _ => return Err(CitationParseError::MissingNumber { position }),
    };
    let text = match marker.text.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => return Err(CitationParseError::MissingText { position, number }),
    };
    let url = marker
        .url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string);
    Ok(Citation { number, text, url })
}

/// Extract the reference list from a body
///
/// A malformed marker never aborts extraction; it is recorded in
/// [`ReferenceList::skipped`] and does not claim its number, so a later
/// well-formed marker with the same number is kept.
pub fn extract(body: &Body) -> ReferenceList {
    let mut seen = HashSet::new();
    let mut citations = Vec::new();
    let mut skipped = Vec::new();
    let mut position = 0;

    body.walk_inlines(&mut |node| {
        let Inline::Citation(marker) = node else {
            return;
        };
        match parse_marker(marker, position) {
            Ok(citation) => {
                if seen.insert(citation.number.clone()) {
                    citations.push(citation);
                } else {
                    debug!(
                        "Dropping duplicate citation {} at marker #{}",
                        citation.number, position
                    );
                }
            }
            Err(e) => {
                warn!("Skipping malformed citation: {}", e);
                skipped.push(e);
            }
        }
        position += 1;
    });

    citations.sort_by(|a, b| a.number.cmp(&b.number));

    ReferenceList {
        entries: citations
            .into_iter()
            .map(|citation| ReferenceEntry {
                anchors: Anchors::for_number(&citation.number),
                citation,
            })
            .collect(),
        skipped,
    }
}

/// Cache-first reference lists keyed by article id and body version
///
/// Because the body version is part of the key, an edited body never reads
/// a stale list and no invalidation is needed.
#[derive(Debug, Clone)]
pub struct ReferenceResolver {
    cache: CacheHandle,
    ttl: Duration,
}

impl ReferenceResolver {
    /// Create a resolver caching lists for `ttl`
    pub fn new(cache: CacheHandle, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Reference list for an article's current body
    pub fn references(&self, article: &Article) -> ReferenceList {
        let version = match article.body.version() {
            Ok(version) => version,
            Err(e) => {
                warn!(
                    "Cannot fingerprint body of article {}, extracting uncached: {}",
                    article.id, e
                );
                return extract(&article.body);
            }
        };
        let key = keys::references(article.id, version);
        if let Some(refs) = self.cache.get_json(&key) {
            return refs;
        }
        let refs = extract(&article.body);
        self.cache.set_json_untracked(&key, &refs, self.ttl);
        refs
    }
}
