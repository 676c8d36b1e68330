//! Text block type produced by the layout extractor.

use serde::{Deserialize, Serialize};

/// One logical line of text with its layout metadata.
///
/// Blocks are produced once per document and never mutated afterwards.
/// `y_position` grows downwards from the top edge of the page, so reading
/// order is `(page, y_position, x_position)` ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Page number (1-indexed)
    pub page: u32,

    /// Text content of the line
    pub text: String,

    /// Dominant font size in points
    pub font_size: f32,

    /// Whether the line is predominantly set in a bold face
    pub bold: bool,

    /// Baseline distance from the top of the page, in points
    pub y_position: f32,

    /// Left edge, in points
    pub x_position: f32,
}

impl TextBlock {
    /// Create a new text block.
    pub fn new(
        page: u32,
        text: impl Into<String>,
        font_size: f32,
        bold: bool,
        x_position: f32,
        y_position: f32,
    ) -> Self {
        Self {
            page,
            text: text.into(),
            font_size,
            bold,
            y_position,
            x_position,
        }
    }

    /// Number of characters, used to weight font statistics.
    pub fn char_count(&self) -> usize {
        self.text.chars().filter(|c| !c.is_whitespace()).count()
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Check if every letter in the text is uppercase.
    pub fn is_uppercase(&self) -> bool {
        let mut letters = self.text.chars().filter(|c| c.is_alphabetic()).peekable();
        letters.peek().is_some() && letters.all(|c| c.is_uppercase())
    }

    /// Check if the block carries no visible text.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}
