//! # docintel
//!
//! Document structure extraction and persona-driven section ranking for PDF.
//!
//! Two engines are exposed:
//!
//! - **Structure extraction** turns PDF bytes into a title plus an H1/H2/H3
//!   outline, inferred from font sizes, emphasis and heading numbering.
//! - **Relevance ranking** scores the sections of one or more documents
//!   against a persona ("who is reading") and a job to be done, and condenses
//!   the best sections into short excerpts.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::collections::HashMap;
//! use docintel::{extract_document, rank_sections, ExtractOptions, PersonaQuery};
//!
//! fn main() -> docintel::Result<()> {
//!     let data = std::fs::read("report.pdf")?;
//!     let doc = extract_document("report.pdf", &data, &ExtractOptions::default())?;
//!     println!("{}", doc.outline.title);
//!
//!     let mut sections = HashMap::new();
//!     sections.insert(doc.id.clone(), doc.sections());
//!
//!     let query = PersonaQuery::new("Investment Analyst", "find revenue projections", [doc.id]);
//!     let result = rank_sections(&query, &sections)?;
//!     for ranked in &result.ranked {
//!         println!("{} {}", ranked.importance_rank, ranked.section_title);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! All operations are synchronous pure functions; independent documents may
//! be extracted in parallel with [`extract_many`].

pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod relevance;
pub mod render;
pub mod structure;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, is_pdf_bytes, PdfFormat};
pub use error::{Error, Result};
pub use model::{
    AnalysisReport, ExtractedDocument, Heading, HeadingLevel, Outline, PersonaQuery,
    RankedSection, RankingResult, RefinedExcerpt, Section, TextBlock,
};
pub use parser::ExtractOptions;
pub use relevance::{rank_sections, rank_sections_with_options, RankOptions};
pub use render::JsonFormat;
pub use structure::{segment_sections, HeadingClassifier, HeadingConfig};

use std::path::Path;

use rayon::prelude::*;

use parser::{LayoutExtractor, LopdfBackend};

/// Load a document, enforcing the page ceiling, and extract its blocks.
fn load_blocks(data: &[u8], options: &ExtractOptions) -> Result<(u32, Vec<TextBlock>)> {
    let format = detect_format_from_bytes(data)?;
    let backend = LopdfBackend::load_bytes(data)?;
    let page_count = backend.page_count();

    if let Some(limit) = options.max_pages {
        if page_count > limit {
            return Err(Error::PageLimitExceeded {
                pages: page_count,
                limit,
            });
        }
    }

    log::debug!("Loaded {} with {} pages", format, page_count);
    let blocks = LayoutExtractor::new(&backend).extract()?;
    Ok((page_count, blocks))
}

/// Extract the ordered text blocks of a PDF.
///
/// # Example
///
/// ```no_run
/// let data = std::fs::read("document.pdf").unwrap();
/// for block in docintel::extract_layout(&data).unwrap() {
///     println!("p{} {:>5.1}pt {}", block.page, block.font_size, block.text);
/// }
/// ```
pub fn extract_layout(data: &[u8]) -> Result<Vec<TextBlock>> {
    load_blocks(data, &ExtractOptions::default()).map(|(_, blocks)| blocks)
}

/// Extract the title and heading outline of a PDF.
///
/// Fails only when the bytes cannot be read as PDF; unusual layouts yield a
/// best-effort outline, possibly without headings.
///
/// # Example
///
/// ```no_run
/// let data = std::fs::read("document.pdf").unwrap();
/// let outline = docintel::extract_structure(&data).unwrap();
/// for heading in &outline.headings {
///     println!("{} {} (p. {})", heading.level, heading.text, heading.page);
/// }
/// ```
pub fn extract_structure(data: &[u8]) -> Result<Outline> {
    extract_structure_with_options(data, &ExtractOptions::default())
}

/// Extract the outline of a PDF with custom options.
pub fn extract_structure_with_options(data: &[u8], options: &ExtractOptions) -> Result<Outline> {
    let (_, blocks) = load_blocks(data, options)?;
    Ok(HeadingClassifier::new(options.heading.clone()).classify(&blocks))
}

/// Read a PDF file and extract its outline.
pub fn extract_structure_file<P: AsRef<Path>>(path: P) -> Result<Outline> {
    let data = std::fs::read(path)?;
    extract_structure(&data)
}

/// Extract the outline together with the blocks needed for segmentation.
pub fn extract_document(
    id: impl Into<String>,
    data: &[u8],
    options: &ExtractOptions,
) -> Result<ExtractedDocument> {
    let (page_count, blocks) = load_blocks(data, options)?;
    let outline = HeadingClassifier::new(options.heading.clone()).classify(&blocks);
    Ok(ExtractedDocument {
        id: id.into(),
        page_count,
        outline,
        blocks,
    })
}

/// Extract several independent documents, in parallel unless disabled.
///
/// Results keep the input order; one document failing does not affect the
/// others.
pub fn extract_many<S, D>(
    documents: &[(S, D)],
    options: &ExtractOptions,
) -> Vec<(String, Result<ExtractedDocument>)>
where
    S: AsRef<str> + Sync,
    D: AsRef<[u8]> + Sync,
{
    let extract_one = |(id, data): &(S, D)| {
        let id = id.as_ref().to_string();
        let result = extract_document(id.clone(), data.as_ref(), options);
        if let Err(e) = &result {
            log::warn!("Failed to extract {}: {}", id, e);
        }
        (id, result)
    };

    if options.parallel {
        documents.par_iter().map(extract_one).collect()
    } else {
        documents.iter().map(extract_one).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_are_a_parse_error() {
        let err = extract_structure(b"definitely not a pdf").unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_extract_many_keeps_order_and_isolates_failures() {
        let docs = vec![("a", b"junk".to_vec()), ("b", b"more junk".to_vec())];
        let results = extract_many(&docs, &ExtractOptions::default());
        let ids: Vec<_> = results.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(results.iter().all(|(_, r)| r.is_err()));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = extract_structure_file("/nonexistent/path/to.pdf").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
