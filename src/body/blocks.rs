//! Body block kinds
//!
//! One variant per block kind, each with its own typed payload. Presentation
//! choices (colors, sizes, layout) belong to the renderer and are not modeled.

use super::rich_text::RichText;
use serde::{Deserialize, Serialize};

/// A single body block
///
/// Serialized as `{"type": "<kind>", "value": {...}}`, the shape stored by
/// the page editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Block {
    /// Section heading
    Heading(HeadingBlock),
    /// Rich-text paragraph(s)
    Text(TextBlock),
    /// Image reference with caption
    Image(ImageBlock),
    /// Block quote with attribution
    Quote(QuoteBlock),
    /// Standalone link button
    Button(ButtonBlock),
    /// Vertical whitespace
    Spacer(SpacerBlock),
    /// Page-top hero section
    Hero(HeroBlock),
    /// Call-to-action panel
    #[serde(rename = "cta")]
    CallToAction(CallToActionBlock),
    /// Author biography
    AuthorBio(AuthorBioBlock),
    /// Recent-posts widget
    RecentPosts(RecentPostsBlock),
}

/// Heading level, `h1` through `h6`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
    H1,
    #[default]
    H2,
    H3,
    H4,
    H5,
    H6,
}

/// Section heading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingBlock {
    pub text: String,
    #[serde(default)]
    pub level: HeadingLevel,
}

/// Paragraph of rich text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    pub text: RichText,
}

/// Image with optional caption
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBlock {
    /// Opaque reference resolved by the image store
    pub image: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub alt_text: Option<String>,
}

/// Pull quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteBlock {
    pub quote: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub author_title: Option<String>,
}

/// Link styled as a button
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonBlock {
    pub text: String,
    pub url: String,
    #[serde(default)]
    pub open_in_new_tab: bool,
}

/// Spacer height
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpacerHeight {
    Small,
    #[default]
    Medium,
    Large,
    Xlarge,
}

/// Vertical whitespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpacerBlock {
    #[serde(default)]
    pub height: SpacerHeight,
}

/// Page-top banner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroBlock {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub cta_text: Option<String>,
    #[serde(default)]
    pub cta_link: Option<String>,
}

/// Title, description and a single button
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallToActionBlock {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub button_text: String,
    pub button_link: String,
}

/// Author name and rich-text bio
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorBioBlock {
    pub author_name: String,
    pub bio: RichText,
    #[serde(default)]
    pub website_url: Option<String>,
}

/// Placeholder rendered as the latest articles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentPostsBlock {
    pub title: String,
    /// Between 1 and 20
    pub number_of_posts: u8,
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn blank_opt(s: &Option<String>) -> bool {
    s.as_deref().is_none_or(blank)
}

fn visit_opt(s: &Option<String>, visit: &mut impl FnMut(&str)) {
    if let Some(s) = s {
        visit(s);
    }
}

impl Block {
    /// Plain-text paragraph block
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Text(TextBlock {
            text: RichText::plain(text),
        })
    }

    /// Kind name as it appears in the serialized `type` tag
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Heading(_) => "heading",
            Self::Text(_) => "text",
            Self::Image(_) => "image",
            Self::Quote(_) => "quote",
            Self::Button(_) => "button",
            Self::Spacer(_) => "spacer",
            Self::Hero(_) => "hero",
            Self::CallToAction(_) => "cta",
            Self::AuthorBio(_) => "author_bio",
            Self::RecentPosts(_) => "recent_posts",
        }
    }

    /// Rich text carried by this block, if any
    pub fn rich_text(&self) -> Option<&RichText> {
        match self {
            Self::Text(block) => Some(&block.text),
            Self::AuthorBio(block) => Some(&block.bio),
            _ => None,
        }
    }

    /// Visit every reader-visible string in the block
    pub fn for_each_text(&self, visit: &mut impl FnMut(&str)) {
        match self {
            Self::Heading(b) => visit(&b.text),
            Self::Text(b) => visit(&b.text.plain_text()),
            Self::Image(b) => visit_opt(&b.caption, visit),
            Self::Quote(b) => {
                visit(&b.quote);
                visit_opt(&b.author, visit);
                visit_opt(&b.author_title, visit);
            }
            Self::Button(b) => visit(&b.text),
            Self::Spacer(_) => {}
            Self::Hero(b) => {
                visit(&b.title);
                visit_opt(&b.subtitle, visit);
                visit_opt(&b.cta_text, visit);
            }
            Self::CallToAction(b) => {
                visit(&b.title);
                visit_opt(&b.description, visit);
                visit(&b.button_text);
            }
            Self::AuthorBio(b) => {
                visit(&b.author_name);
                visit(&b.bio.plain_text());
            }
            Self::RecentPosts(b) => visit(&b.title),
        }
    }

    /// Check block-local rules; returns the reason on failure
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Heading(b) if blank(&b.text) => Err("heading text cannot be empty".into()),
            Self::Button(b) if blank(&b.text) => {
                Err("button text is required for screen reader users".into())
            }
            Self::Button(b) if blank(&b.url) => Err("button URL is required".into()),
            Self::CallToAction(b) if blank(&b.button_text) => {
                Err("button text is required for screen reader users".into())
            }
            Self::Hero(b) => match (blank_opt(&b.cta_text), blank_opt(&b.cta_link)) {
                (true, false) => Err("CTA text is required when a CTA link is provided".into()),
                (false, true) => Err("CTA link is required when CTA text is provided".into()),
                _ => Ok(()),
            },
            Self::RecentPosts(b) if !(1..=20).contains(&b.number_of_posts) => Err(format!(
                "number of posts must be between 1 and 20, got {}",
                b.number_of_posts
            )),
            _ => Ok(()),
        }
    }
}
