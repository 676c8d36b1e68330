//! Persona query and ranking result types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A role description plus the task the reader wants done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaQuery {
    /// Who is reading (e.g., "Investment Analyst")
    pub persona: String,

    /// What they need (e.g., "find revenue projections")
    pub job_to_be_done: String,

    /// Documents to search; order breaks ranking ties
    pub document_ids: Vec<String>,
}

impl PersonaQuery {
    /// Create a new query.
    pub fn new(
        persona: impl Into<String>,
        job_to_be_done: impl Into<String>,
        document_ids: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            persona: persona.into(),
            job_to_be_done: job_to_be_done.into(),
            document_ids: document_ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Text the query vector is built from.
    pub fn query_text(&self) -> String {
        format!("{} {}", self.persona.trim(), self.job_to_be_done.trim())
    }
}

/// A section with its position in the relevance ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSection {
    /// Owning document
    #[serde(rename = "document")]
    pub document_id: String,

    /// Heading text of the section
    pub section_title: String,

    /// Page of the section heading
    #[serde(rename = "page_number")]
    pub page: u32,

    /// 1-based rank, unique within one result
    pub importance_rank: u32,

    /// Cosine similarity to the query, in [0, 1]
    pub similarity_score: f32,
}

/// Condensed, query-focused excerpt of a top-ranked section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinedExcerpt {
    /// Owning document
    #[serde(rename = "document")]
    pub document_id: String,

    /// Page of the section heading
    #[serde(rename = "page_number")]
    pub page: u32,

    /// Selected sentences in original order
    pub refined_text: String,
}

/// Output of one ranking call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingResult {
    /// Every input section, best first
    pub ranked: Vec<RankedSection>,

    /// Excerpts for the top-K sections, in rank order
    pub refined: Vec<RefinedExcerpt>,
}

/// Persisted record of a persona analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub persona: String,
    pub job_to_be_done: String,

    /// Human-readable names of the analysed documents
    pub input_documents: Vec<String>,

    pub processing_timestamp: DateTime<Utc>,

    pub extracted_sections: Vec<RankedSection>,

    pub sub_section_analysis: Vec<RefinedExcerpt>,
}

impl AnalysisReport {
    /// Build a report stamped with the current time.
    pub fn new(query: &PersonaQuery, input_documents: Vec<String>, result: RankingResult) -> Self {
        Self {
            persona: query.persona.clone(),
            job_to_be_done: query.job_to_be_done.clone(),
            input_documents,
            processing_timestamp: Utc::now(),
            extracted_sections: result.ranked,
            sub_section_analysis: result.refined,
        }
    }
}
