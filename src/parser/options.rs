//! Extraction options and configuration.

use crate::structure::HeadingConfig;

/// Options for extracting document structure.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Heading classifier thresholds
    pub heading: HeadingConfig,

    /// Reject documents with more pages than this (None = unlimited)
    pub max_pages: Option<u32>,

    /// Whether to extract independent documents in parallel
    pub parallel: bool,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the heading classifier configuration.
    pub fn with_heading_config(mut self, config: HeadingConfig) -> Self {
        self.heading = config;
        self
    }

    /// Set a page-count ceiling.
    pub fn with_max_pages(mut self, pages: u32) -> Self {
        self.max_pages = Some(pages);
        self
    }

    /// Strip "1.2 "-style numbering from heading text.
    pub fn strip_numbering(mut self) -> Self {
        self.heading.strip_numbering = true;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            heading: HeadingConfig::default(),
            max_pages: None,
            parallel: true,
        }
    }
}
