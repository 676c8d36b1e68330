//! Relevance Ranker.

use std::cmp::Ordering;

use crate::model::{RankedSection, Section};

use super::model::RelevanceModel;

/// A section from the candidate pool, tagged with its document's position in
/// the query.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub section: &'a Section,
    pub document_order: usize,
}

/// Text indexed for a section.
pub fn indexed_text(section: &Section, index_titles: bool) -> String {
    if index_titles {
        format!("{} {}", section.title, section.body_text)
    } else {
        section.body_text.clone()
    }
}

/// Rank every candidate, best first.
///
/// Returns each section's pool index with its ranked entry. Equal scores
/// keep (document order, page, pool order).
pub fn rank(
    model: &RelevanceModel,
    candidates: &[Candidate<'_>],
    index_titles: bool,
) -> Vec<(usize, RankedSection)> {
    let scores: Vec<f32> = candidates
        .iter()
        .map(|c| model.score(&indexed_text(c.section, index_titles)))
        .collect();

    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(Ordering::Equal)
            .then(candidates[a].document_order.cmp(&candidates[b].document_order))
            .then(candidates[a].section.page.cmp(&candidates[b].section.page))
            .then(a.cmp(&b))
    });

    order
        .into_iter()
        .enumerate()
        .map(|(position, idx)| {
            let section = candidates[idx].section;
            (
                idx,
                RankedSection {
                    document_id: section.document_id.clone(),
                    section_title: section.title.clone(),
                    page: section.page,
                    importance_rank: position as u32 + 1,
                    similarity_score: scores[idx],
                },
            )
        })
        .collect()
}
