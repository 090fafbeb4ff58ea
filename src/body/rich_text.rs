//! Inline rich-text tree

use crate::citations::CitationNumber;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A run of inline rich-text nodes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichText(pub Vec<Inline>);

/// One inline node
///
/// Container variants nest arbitrarily; traversal is pre-order so citation
/// markers are visited in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inline {
    /// Plain text
    Text {
        /// Text content
        text: String,
    },
    /// Bold run
    Strong {
        /// Nested nodes
        children: Vec<Inline>,
    },
    /// Italic run
    Emphasis {
        /// Nested nodes
        children: Vec<Inline>,
    },
    /// Hyperlink
    Link {
        /// Link target
        href: String,
        /// Link label
        children: Vec<Inline>,
    },
    /// Click-to-reveal text
    Spoiler {
        /// Hidden nodes
        children: Vec<Inline>,
    },
    /// Inline citation marker
    Citation(CitationMarker),
}

/// Citation marker as authored in the body
///
/// Fields are optional at this level because editors can save incomplete
/// markers; the extractor decides what is usable. A field of the wrong JSON
/// type (a negative or fractional number, a non-string text) reads as absent
/// rather than failing the whole body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationMarker {
    /// Reference number or label
    #[serde(default, deserialize_with = "lenient_number")]
    pub number: Option<CitationNumber>,
    /// Reference text (required for a usable citation)
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: Option<String>,
    /// Optional link to the source
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
}

fn lenient_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<CitationNumber>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s.into()),
        Value::Number(n) => n.as_u64().map(CitationNumber::from),
        _ => None,
    })
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

impl CitationMarker {
    /// Create a complete marker
    pub fn new(number: impl Into<CitationNumber>, text: impl Into<String>) -> Self {
        Self {
            number: Some(number.into()),
            text: Some(text.into()),
            url: None,
        }
    }

    /// Attach a source URL
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

impl Inline {
    /// Plain text node
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Citation marker node
    pub fn citation(marker: CitationMarker) -> Self {
        Self::Citation(marker)
    }

    fn children(&self) -> &[Inline] {
        match self {
            Self::Strong { children }
            | Self::Emphasis { children }
            | Self::Link { children, .. }
            | Self::Spoiler { children } => children,
            Self::Text { .. } | Self::Citation(_) => &[],
        }
    }
}

impl RichText {
    /// Build from a list of nodes
    pub fn new(nodes: Vec<Inline>) -> Self {
        Self(nodes)
    }

    /// Single plain-text run
    pub fn plain(text: impl Into<String>) -> Self {
        Self(vec![Inline::text(text)])
    }

    /// Visit every node in document order (pre-order, depth first)
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Inline)) {
        fn walk_nodes<'a>(nodes: &'a [Inline], visit: &mut impl FnMut(&'a Inline)) {
            for node in nodes {
                visit(node);
                walk_nodes(node.children(), visit);
            }
        }
        walk_nodes(&self.0, visit);
    }

    /// Visible text, concatenated with single spaces between runs
    ///
    /// Citation markers are footnotes and do not contribute.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.walk(&mut |node| {
            if let Inline::Text { text } = node {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(text);
            }
        });
        out
    }

    /// True when there is no visible text
    pub fn is_blank(&self) -> bool {
        self.plain_text().trim().is_empty()
    }
}
