//! Document-level types: extracted documents and their sections.

use serde::{Deserialize, Serialize};

use super::{Outline, TextBlock};

/// Result of running the structure pipeline on one document.
///
/// Holds the block sequence alongside the outline, because the section
/// segmenter needs both and the outline alone cannot recover body text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// Caller-assigned document identifier
    pub id: String,

    /// Number of pages in the source PDF
    pub page_count: u32,

    /// Title and headings
    pub outline: Outline,

    /// Text blocks in reading order
    pub blocks: Vec<TextBlock>,
}

impl ExtractedDocument {
    /// Split the document into one section per heading.
    pub fn sections(&self) -> Vec<Section> {
        crate::structure::segment_sections(&self.id, &self.blocks, &self.outline)
    }

    /// Plain text of the whole document, one block per line.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Text bounded by one heading and the next heading of any level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Owning document
    pub document_id: String,

    /// Heading text that opens the section
    pub title: String,

    /// Page of the opening heading
    pub page: u32,

    /// Body text, possibly empty
    pub body_text: String,
}

impl Section {
    /// Create a new section.
    pub fn new(
        document_id: impl Into<String>,
        title: impl Into<String>,
        page: u32,
        body_text: impl Into<String>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            title: title.into(),
            page,
            body_text: body_text.into(),
        }
    }

    /// Check if the section has no body text.
    pub fn is_empty(&self) -> bool {
        self.body_text.trim().is_empty()
    }
}
