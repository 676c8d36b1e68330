//! Query-scoped relevance model shared by the ranker and the refiner.

use super::vectorizer::{cosine_similarity, SparseVector, TfIdfVectorizer};
use super::RankOptions;

/// Vocabulary fitted on one section pool plus the query vector.
///
/// Built once per ranking call and passed to the refiner; never shared
/// between queries.
#[derive(Debug, Clone)]
pub struct RelevanceModel {
    vectorizer: TfIdfVectorizer,
    query: SparseVector,
}

impl RelevanceModel {
    /// Fit on the section corpus and vectorize the query.
    pub fn fit<S: AsRef<str>>(query_text: &str, corpus: &[S], options: &RankOptions) -> Self {
        let vectorizer = TfIdfVectorizer::fit(corpus, options.max_features, options.stop_words);
        let query = vectorizer.transform(query_text);
        log::debug!(
            "Relevance model: {} documents, {} terms, {} query terms matched",
            corpus.len(),
            vectorizer.vocabulary_len(),
            query.len()
        );
        Self { vectorizer, query }
    }

    /// The query vector.
    pub fn query(&self) -> &SparseVector {
        &self.query
    }

    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }

    /// Similarity of `text` to the query, in [0, 1].
    pub fn score(&self, text: &str) -> f32 {
        if self.query.is_zero() {
            return 0.0;
        }
        cosine_similarity(&self.query, &self.vectorizer.transform(text))
    }
}
