//! Notion block model and its JSON wire shape.
//!
//! [`Block`] and [`RichSpan`] describe *what* a line of Markdown means;
//! [`Block::to_json`] and [`RichSpan::to_json`] map that onto the exact
//! payload shape the `PATCH /v1/blocks/{id}/children` endpoint expects.
//! Nothing here validates content; the API does that.

use serde_json::{json, Value};

/// Heading depth supported by Notion (`heading_1` … `heading_3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Map a count of `#` characters to a level, if Notion has one.
    pub fn from_depth(depth: usize) -> Option<Self> {
        match depth {
            1 => Some(Self::H1),
            2 => Some(Self::H2),
            3 => Some(Self::H3),
            _ => None,
        }
    }

    pub fn depth(self) -> usize {
        match self {
            Self::H1 => 1,
            Self::H2 => 2,
            Self::H3 => 3,
        }
    }

    /// Block type tag, e.g. `heading_2`.
    pub fn block_type(self) -> &'static str {
        match self {
            Self::H1 => "heading_1",
            Self::H2 => "heading_2",
            Self::H3 => "heading_3",
        }
    }
}

/// One styled fragment of a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RichSpan {
    PlainText(String),
    BoldText(String),
    InlineEquation(String),
}

impl RichSpan {
    /// The span's content without any styling or equation markers.
    pub fn content(&self) -> &str {
        match self {
            RichSpan::PlainText(s) | RichSpan::BoldText(s) | RichSpan::InlineEquation(s) => s,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            RichSpan::PlainText(s) => text_item(s),
            RichSpan::BoldText(s) => json!({
                "type": "text",
                "text": { "content": s },
                "annotations": { "bold": true }
            }),
            RichSpan::InlineEquation(e) => json!({
                "type": "equation",
                "equation": { "expression": e }
            }),
        }
    }
}

/// One unit of document content, submitted as soon as it is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: HeadingLevel, text: String },
    Paragraph(Vec<RichSpan>),
    /// An externally hosted image. The caption travels as a separate
    /// paragraph block; see [`Block::into_submissions`].
    Image { url: String, caption: Option<String> },
    Equation(String),
}

impl Block {
    /// A paragraph holding `text` verbatim, without inline-span parsing.
    pub fn text(text: impl Into<String>) -> Self {
        Block::Paragraph(vec![RichSpan::PlainText(text.into())])
    }

    pub fn heading(level: HeadingLevel, text: impl Into<String>) -> Self {
        Block::Heading {
            level,
            text: text.into(),
        }
    }

    pub fn image(url: impl Into<String>, caption: Option<String>) -> Self {
        Block::Image {
            url: url.into(),
            caption: caption.filter(|c| !c.is_empty()),
        }
    }

    pub fn equation(expression: impl Into<String>) -> Self {
        Block::Equation(expression.into())
    }

    /// Short tag used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Heading { level, .. } => level.block_type(),
            Block::Paragraph(_) => "paragraph",
            Block::Image { .. } => "image",
            Block::Equation(_) => "equation",
        }
    }

    /// Split into the blocks actually sent to Notion, in order.
    ///
    /// Everything maps to itself except a captioned image, which becomes the
    /// bare image followed by a plain paragraph holding the caption.
    pub fn into_submissions(self) -> Vec<Block> {
        match self {
            Block::Image {
                url,
                caption: Some(caption),
            } => vec![
                Block::Image { url, caption: None },
                Block::text(caption),
            ],
            other => vec![other],
        }
    }

    /// The Notion wire shape of this block.
    pub fn to_json(&self) -> Value {
        match self {
            Block::Heading { level, text } => {
                let ty = level.block_type();
                json!({
                    "object": "block",
                    "type": ty,
                    ty: { "rich_text": [text_item(text)] }
                })
            }
            Block::Paragraph(spans) => json!({
                "object": "block",
                "type": "paragraph",
                "paragraph": {
                    "rich_text": spans.iter().map(RichSpan::to_json).collect::<Vec<_>>()
                }
            }),
            Block::Image { url, .. } => json!({
                "object": "block",
                "type": "image",
                "image": {
                    "type": "external",
                    "external": { "url": url }
                }
            }),
            Block::Equation(expression) => json!({
                "object": "block",
                "type": "equation",
                "equation": { "expression": expression }
            }),
        }
    }
}

/// Request body for appending one block as the page's newest child.
pub fn children_payload(block: &Block) -> Value {
    json!({ "children": [block.to_json()] })
}

fn text_item(content: &str) -> Value {
    json!({ "type": "text", "text": { "content": content } })
}
