//! Structured article body
//!
//! The body is an ordered sequence of typed blocks. Rich-text blocks hold an
//! inline node tree rather than markup, so anything that reads the body
//! (word counting, citation extraction) pattern-matches over variants
//! instead of scanning strings.
//!
//! This module is organized into:
//! - `blocks`: the closed set of block kinds and their payloads
//! - `rich_text`: inline nodes, including citation markers

mod blocks;
mod rich_text;

pub use self::blocks::{
    AuthorBioBlock, Block, ButtonBlock, CallToActionBlock, HeadingBlock, HeadingLevel, HeroBlock,
    ImageBlock, QuoteBlock, RecentPostsBlock, SpacerBlock, SpacerHeight, TextBlock,
};
pub use self::rich_text::{CitationMarker, Inline, RichText};

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Content fingerprint of a body
///
/// Length and CRC32 of the canonical JSON encoding. Two edits collide only
/// if both match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyVersion {
    /// Encoded length in bytes
    pub len: usize,
    /// CRC32 of the encoding
    pub crc: u32,
}

impl fmt::Display for BodyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}-{:08x}", self.len, self.crc)
    }
}

/// Ordered block sequence forming an article body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Body(Vec<Block>);

impl Body {
    /// Create a body from blocks
    pub fn new(blocks: Vec<Block>) -> Self {
        Self(blocks)
    }

    /// Blocks in document order
    pub fn blocks(&self) -> &[Block] {
        &self.0
    }

    /// Append a block
    pub fn push(&mut self, block: Block) {
        self.0.push(block);
    }

    /// Number of blocks
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the body has no blocks
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Visit every inline node of every rich-text block in document order
    pub fn walk_inlines<'a>(&'a self, visit: &mut impl FnMut(&'a Inline)) {
        for block in &self.0 {
            if let Some(text) = block.rich_text() {
                text.walk(visit);
            }
        }
    }

    /// Count whitespace-separated words across all reader-visible text
    pub fn word_count(&self) -> usize {
        let mut words = 0;
        for block in &self.0 {
            block.for_each_text(&mut |s| words += s.split_whitespace().count());
        }
        words
    }

    /// Fingerprint of the body content
    ///
    /// Two bodies with equal content have equal versions across processes.
    pub fn version(&self) -> crate::Result<BodyVersion> {
        let bytes = serde_json::to_vec(self)?;
        Ok(BodyVersion {
            len: bytes.len(),
            crc: crc32fast::hash(&bytes),
        })
    }

    /// Validate every block, reporting the first failure
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (index, block) in self.0.iter().enumerate() {
            block
                .validate()
                .map_err(|reason| ValidationError::InvalidBlock {
                    index,
                    kind: block.kind(),
                    reason,
                })?;
        }
        Ok(())
    }
}

impl From<Vec<Block>> for Body {
    fn from(blocks: Vec<Block>) -> Self {
        Self(blocks)
    }
}
