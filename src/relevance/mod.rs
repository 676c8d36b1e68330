//! Persona Relevance Engine.
//!
//! Ranks every section of the selected documents against a persona query and
//! condenses the top sections into query-focused excerpts. The fitted
//! [`RelevanceModel`] lives for one call only.

mod model;
mod ranker;
mod refiner;
mod vectorizer;

use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::model::{PersonaQuery, RankingResult, Section};

pub use model::RelevanceModel;
pub use ranker::{indexed_text, rank, Candidate};
pub use refiner::{refine, split_sentences};
pub use vectorizer::{cosine_similarity, tokenize, SparseVector, TfIdfVectorizer, STOP_WORDS};

/// Options for ranking sections.
#[derive(Debug, Clone, PartialEq)]
pub struct RankOptions {
    /// Number of top sections to refine
    pub top_k: usize,

    /// Character budget for each refined excerpt
    pub excerpt_chars: usize,

    /// Vocabulary cap (None = unlimited)
    pub max_features: Option<usize>,

    /// Remove English stop words
    pub stop_words: bool,

    /// Index section titles together with body text
    pub index_titles: bool,
}

impl RankOptions {
    /// Create new rank options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of refined excerpts.
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }

    /// Set the excerpt length budget.
    pub fn with_excerpt_chars(mut self, chars: usize) -> Self {
        self.excerpt_chars = chars;
        self
    }

    /// Set the vocabulary cap.
    pub fn with_max_features(mut self, max: Option<usize>) -> Self {
        self.max_features = max;
        self
    }

    /// Enable or disable stop-word removal.
    pub fn with_stop_words(mut self, enabled: bool) -> Self {
        self.stop_words = enabled;
        self
    }

    /// Index section titles with the body text.
    pub fn with_titles(mut self) -> Self {
        self.index_titles = true;
        self
    }
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            top_k: 5,
            excerpt_chars: 500,
            max_features: Some(1000),
            stop_words: true,
            index_titles: false,
        }
    }
}

/// Rank sections with default options.
pub fn rank_sections(
    query: &PersonaQuery,
    sections_by_document: &HashMap<String, Vec<Section>>,
) -> Result<RankingResult> {
    rank_sections_with_options(query, sections_by_document, &RankOptions::default())
}

/// Rank every section of the queried documents and refine the top `top_k`.
pub fn rank_sections_with_options(
    query: &PersonaQuery,
    sections_by_document: &HashMap<String, Vec<Section>>,
    options: &RankOptions,
) -> Result<RankingResult> {
    validate_query(query, sections_by_document)?;

    let candidates: Vec<Candidate> = query
        .document_ids
        .iter()
        .enumerate()
        .flat_map(|(order, id)| {
            sections_by_document
                .get(id)
                .into_iter()
                .flatten()
                .map(move |section| Candidate {
                    section,
                    document_order: order,
                })
        })
        .collect();

    let corpus: Vec<String> = candidates
        .iter()
        .map(|c| indexed_text(c.section, options.index_titles))
        .collect();
    let model = RelevanceModel::fit(&query.query_text(), &corpus, options);

    let ranked = rank(&model, &candidates, options.index_titles);
    let refined = ranked
        .iter()
        .take(options.top_k)
        .map(|(idx, _)| refine(&model, candidates[*idx].section, options.excerpt_chars))
        .collect();

    log::debug!(
        "Ranked {} sections from {} documents",
        ranked.len(),
        query.document_ids.len()
    );

    Ok(RankingResult {
        ranked: ranked.into_iter().map(|(_, r)| r).collect(),
        refined,
    })
}

fn validate_query(
    query: &PersonaQuery,
    sections_by_document: &HashMap<String, Vec<Section>>,
) -> Result<()> {
    if query.document_ids.is_empty() {
        return Err(Error::InvalidQuery("no documents selected".to_string()));
    }
    if query.persona.trim().is_empty() && query.job_to_be_done.trim().is_empty() {
        return Err(Error::InvalidQuery(
            "persona and job to be done are both empty".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for id in &query.document_ids {
        if !seen.insert(id.as_str()) {
            return Err(Error::InvalidQuery(format!("document {} listed twice", id)));
        }
        let sections = sections_by_document
            .get(id)
            .ok_or_else(|| Error::InvalidQuery(format!("unknown document {}", id)))?;
        if let Some(stray) = sections.iter().find(|s| &s.document_id != id) {
            return Err(Error::InvalidQuery(format!(
                "section {:?} belongs to {}, listed under {}",
                stray.title, stray.document_id, id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> HashMap<String, Vec<Section>> {
        let mut map = HashMap::new();
        map.insert(
            "d1".to_string(),
            vec![
                Section::new("d1", "History", 1, "company history founded 1990"),
                Section::new("d1", "Revenue", 2, "revenue projections grew 20%"),
            ],
        );
        map
    }

    #[test]
    fn test_revenue_section_ranks_first() {
        let query = PersonaQuery::new("Investment Analyst", "find revenue projections", ["d1"]);
        let result = rank_sections(&query, &pool()).unwrap();

        assert_eq!(result.ranked.len(), 2);
        assert_eq!(result.ranked[0].section_title, "Revenue");
        assert_eq!(result.ranked[0].importance_rank, 1);
        assert!(result.ranked[0].similarity_score > result.ranked[1].similarity_score);
        assert_eq!(result.refined.len(), 2);
        assert_eq!(result.refined[0].refined_text, "revenue projections grew 20%");
    }

    #[test]
    fn test_top_k_limits_refined() {
        let query = PersonaQuery::new("Analyst", "revenue", ["d1"]);
        let options = RankOptions::new().with_top_k(1);
        let result = rank_sections_with_options(&query, &pool(), &options).unwrap();
        assert_eq!(result.ranked.len(), 2);
        assert_eq!(result.refined.len(), 1);
    }

    #[test]
    fn test_invalid_queries() {
        let pool = pool();
        let cases = [
            PersonaQuery::new("Analyst", "revenue", Vec::<String>::new()),
            PersonaQuery::new("Analyst", "revenue", ["d2"]),
            PersonaQuery::new("Analyst", "revenue", ["d1", "d1"]),
            PersonaQuery::new(" ", "", ["d1"]),
        ];
        for query in &cases {
            let err = rank_sections(query, &pool).unwrap_err();
            assert!(err.is_invalid_query(), "{:?}", query);
        }
    }

    #[test]
    fn test_mislabelled_section_is_rejected() {
        let mut pool = pool();
        pool.get_mut("d1")
            .unwrap()
            .push(Section::new("d9", "Stray", 3, "text"));
        let query = PersonaQuery::new("Analyst", "revenue", ["d1"]);
        assert!(rank_sections(&query, &pool).unwrap_err().is_invalid_query());
    }

    #[test]
    fn test_documents_outside_query_are_ignored() {
        let mut pool = pool();
        pool.insert(
            "d2".to_string(),
            vec![Section::new("d2", "Revenue", 1, "revenue revenue revenue")],
        );
        let query = PersonaQuery::new("Analyst", "revenue", ["d1"]);
        let result = rank_sections(&query, &pool).unwrap();
        assert!(result.ranked.iter().all(|r| r.document_id == "d1"));
    }

    #[test]
    fn test_empty_pool_ranks_nothing() {
        let mut pool = HashMap::new();
        pool.insert("d1".to_string(), Vec::new());
        let query = PersonaQuery::new("Analyst", "revenue", ["d1"]);
        let result = rank_sections(&query, &pool).unwrap();
        assert!(result.ranked.is_empty());
        assert!(result.refined.is_empty());
    }
}
