//! Data model shared by the structure and relevance engines.
//!
//! Everything here is plain data: produced by one stage, read by the next,
//! and serializable so the calling layer can persist it.

mod block;
mod document;
mod outline;
mod persona;

pub use block::TextBlock;
pub use document::{ExtractedDocument, Section};
pub use outline::{Heading, HeadingLevel, Outline};
pub use persona::{AnalysisReport, PersonaQuery, RankedSection, RankingResult, RefinedExcerpt};
