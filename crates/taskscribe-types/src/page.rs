//! Workspace page types: retrieved records, their properties, and the content
//! blocks written into newly created pages.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A page retrieved from the workspace (a database record or a standalone page).
///
/// Only the fields the pipeline reads are modelled; everything else in the
/// API response is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
}

/// A single page property, discriminated by its `type` field.
///
/// Only the two text-bearing kinds are modelled; all others collapse into
/// [`PropertyValue::Other`].
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    RichText {
        #[serde(default)]
        rich_text: Vec<RichTextRun>,
    },
    Title {
        #[serde(default)]
        title: Vec<RichTextRun>,
    },
    #[serde(other)]
    Other,
}

/// One formatted text fragment; only its plain-text rendering matters here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RichTextRun {
    #[serde(default)]
    pub plain_text: String,
}

/// Heading depth for [`ContentBlock::Heading`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingLevel {
    H2,
    H3,
}

impl HeadingLevel {
    /// The workspace block type name for this level (`heading_2` or `heading_3`).
    pub fn block_type(self) -> &'static str {
        match self {
            HeadingLevel::H2 => "heading_2",
            HeadingLevel::H3 => "heading_3",
        }
    }
}

/// One renderable unit in a created page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentBlock {
    Heading { level: HeadingLevel, text: String },
    Paragraph { text: String },
    ToDo { text: String, checked: bool },
}

impl ContentBlock {
    pub fn heading(level: HeadingLevel, text: impl Into<String>) -> Self {
        ContentBlock::Heading {
            level,
            text: text.into(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        ContentBlock::Paragraph { text: text.into() }
    }

    /// An unchecked to-do item.
    pub fn todo(text: impl Into<String>) -> Self {
        ContentBlock::ToDo {
            text: text.into(),
            checked: false,
        }
    }

    /// The block's text content regardless of variant.
    pub fn text(&self) -> &str {
        match self {
            ContentBlock::Heading { text, .. }
            | ContentBlock::Paragraph { text }
            | ContentBlock::ToDo { text, .. } => text,
        }
    }
}

/// A page to be created under a parent page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPage {
    pub parent_page_id: String,
    pub title: String,
    pub children: Vec<ContentBlock>,
}

/// The workspace's acknowledgement of a created page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedPage {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Errors from workspace API operations.
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("authentication failed")]
    Unauthorized,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("API error (HTTP {status}, {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("deserialization error: {0}")]
    Deserialization(String),
}
