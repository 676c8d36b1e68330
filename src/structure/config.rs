//! Heading classifier configuration.

/// Tunable thresholds for heading classification.
///
/// Distances are in points; ratios are relative to the quantity named.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingConfig {
    /// Sizes closer than this belong to one tier
    pub size_tolerance: f32,

    /// Lines longer than this are never headings
    pub max_heading_chars: usize,

    /// Word limit for style-only and numbering-only headings
    pub max_heading_words: usize,

    /// Lines with fewer letters or digits are never headings
    pub min_heading_alnum: usize,

    /// Whitespace around a style heading must exceed median gap times this
    pub isolation_ratio: f32,

    /// Wrapped heading lines merge when the baseline distance is at most size times this
    pub merge_gap_ratio: f32,

    /// Each step of indentation demotes a style heading one level
    pub indent_step: f32,

    /// Remove "1.2 "-style numbering from heading text
    pub strip_numbering: bool,
}

impl HeadingConfig {
    /// Create a configuration with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the size tolerance.
    pub fn with_size_tolerance(mut self, tolerance: f32) -> Self {
        self.size_tolerance = tolerance;
        self
    }

    /// Set the maximum heading length in characters.
    pub fn with_max_chars(mut self, chars: usize) -> Self {
        self.max_heading_chars = chars;
        self
    }

    /// Set the maximum heading length in words.
    pub fn with_max_words(mut self, words: usize) -> Self {
        self.max_heading_words = words;
        self
    }

    /// Enable or disable numbering removal.
    pub fn with_strip_numbering(mut self, strip: bool) -> Self {
        self.strip_numbering = strip;
        self
    }
}

impl Default for HeadingConfig {
    fn default() -> Self {
        Self {
            size_tolerance: 0.5,
            max_heading_chars: 150,
            max_heading_words: 12,
            min_heading_alnum: 2,
            isolation_ratio: 1.15,
            merge_gap_ratio: 1.6,
            indent_step: 15.0,
            strip_numbering: false,
        }
    }
}
