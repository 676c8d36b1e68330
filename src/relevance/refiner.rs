//! Sub-section Refiner: extractive excerpts of top-ranked sections.

use std::cmp::Ordering;

use crate::model::{RefinedExcerpt, Section};

use super::model::RelevanceModel;

/// Words whose trailing period does not end a sentence.
const ABBREVIATIONS: &[&str] = &[
    "e.g.", "i.e.", "etc.", "dr.", "mr.", "mrs.", "ms.", "fig.", "al.", "vs.", "no.", "inc.",
    "st.",
];

/// Split text into sentences.
///
/// A sentence ends at `.`, `!` or `?` (plus closing quotes or brackets)
/// followed by whitespace, except after known abbreviations and initials.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let chars: Vec<(usize, char)> = text.char_indices().collect();

    let mut i = 0;
    while i < chars.len() {
        let (pos, c) = chars[i];
        if matches!(c, '.' | '!' | '?') {
            let mut end = i + 1;
            while end < chars.len() && matches!(chars[end].1, '"' | '\'' | ')' | ']' | '”' | '’') {
                end += 1;
            }
            let at_boundary = chars.get(end).is_some_and(|(_, next)| next.is_whitespace());
            if at_boundary && !(c == '.' && is_abbreviation(&text[start..pos + 1])) {
                let byte_end = chars[end].0;
                let sentence = text[start..byte_end].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                start = byte_end;
                i = end;
                continue;
            }
        }
        i += 1;
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest);
    }
    sentences
}

/// Whether the text before a period ends with an abbreviation or initial.
fn is_abbreviation(prefix: &str) -> bool {
    let last_word = prefix.split_whitespace().last().unwrap_or("");
    let lower = last_word.to_lowercase();
    if ABBREVIATIONS.contains(&lower.as_str()) {
        return true;
    }
    // Single-letter initial such as "J."
    let mut letters = last_word.trim_end_matches('.').chars();
    matches!((letters.next(), letters.next()), (Some(c), None) if c.is_uppercase())
}

/// Cut `text` on a word boundary so that it fits `budget` characters with an ellipsis.
///
/// A zero budget yields an empty string.
fn truncate_words(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }
    if budget == 0 {
        return String::new();
    }
    let limit = budget.saturating_sub(1);
    let mut out = String::new();
    for word in text.split_whitespace() {
        let extra = if out.is_empty() { 0 } else { 1 };
        if out.chars().count() + extra + word.chars().count() > limit {
            break;
        }
        if extra == 1 {
            out.push(' ');
        }
        out.push_str(word);
    }
    if out.is_empty() {
        out = text.chars().take(limit).collect();
    }
    out.push('…');
    out
}

/// Condense a section to its most query-relevant sentences.
///
/// Sentences are chosen by score (earlier first on ties) while they fit in
/// `budget` characters, then emitted in their original order. The best
/// sentence is always kept. An empty section yields its title.
pub fn refine(model: &RelevanceModel, section: &Section, budget: usize) -> RefinedExcerpt {
    let sentences = split_sentences(&section.body_text);
    let refined_text = if sentences.is_empty() {
        section.title.clone()
    } else {
        select_sentences(model, &sentences, budget)
    };

    RefinedExcerpt {
        document_id: section.document_id.clone(),
        page: section.page,
        refined_text,
    }
}

fn select_sentences(model: &RelevanceModel, sentences: &[&str], budget: usize) -> String {
    let scores: Vec<f32> = sentences.iter().map(|s| model.score(s)).collect();
    let mut by_score: Vec<usize> = (0..sentences.len()).collect();
    by_score.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });

    let best = by_score[0];
    let best_len = sentences[best].chars().count();
    if best_len > budget {
        return truncate_words(sentences[best], budget);
    }

    let mut chosen = vec![best];
    let mut used = best_len;
    for &idx in &by_score[1..] {
        if scores[idx] <= 0.0 {
            break;
        }
        let len = sentences[idx].chars().count() + 1;
        if used + len <= budget {
            chosen.push(idx);
            used += len;
        }
    }

    chosen.sort_unstable();
    chosen
        .iter()
        .map(|&idx| sentences[idx])
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relevance::RankOptions;

    #[test]
    fn test_split_sentences() {
        let text = "Revenue grew 20%. Costs fell, e.g. travel. Was it enough? \"Yes.\" See Dr. Smith and J. Doe";
        assert_eq!(
            split_sentences(text),
            vec![
                "Revenue grew 20%.",
                "Costs fell, e.g. travel.",
                "Was it enough?",
                "\"Yes.\"",
                "See Dr. Smith and J. Doe",
            ]
        );
        assert!(split_sentences("   ").is_empty());
        assert_eq!(split_sentences("Version 2.5 shipped."), vec!["Version 2.5 shipped."]);
    }

    #[test]
    fn test_refine_keeps_relevant_sentences_in_order() {
        let body = "Revenue projections rose. The office moved downtown. Revenue will grow next year.";
        let section = Section::new("d1", "Outlook", 2, body);
        let model = RelevanceModel::fit("revenue projections", &[body], &RankOptions::default());

        let excerpt = refine(&model, &section, 500);
        assert_eq!(excerpt.refined_text, "Revenue projections rose. Revenue will grow next year.");
        assert_eq!(excerpt.page, 2);
        assert_eq!(excerpt.document_id, "d1");
    }

    #[test]
    fn test_refine_respects_budget() {
        let body = "Revenue projections rose sharply. Revenue stayed flat in Europe.";
        let section = Section::new("d1", "Outlook", 1, body);
        let model = RelevanceModel::fit("revenue projections", &[body], &RankOptions::default());

        let excerpt = refine(&model, &section, 40);
        assert_eq!(excerpt.refined_text, "Revenue projections rose sharply.");

        let tiny = refine(&model, &section, 20);
        assert!(tiny.refined_text.ends_with('…'));
        assert!(tiny.refined_text.chars().count() <= 20);
    }

    #[test]
    fn test_empty_section_falls_back_to_title() {
        let section = Section::new("d1", "Appendix", 9, "");
        let model = RelevanceModel::fit("anything", &[""], &RankOptions::default());
        assert_eq!(refine(&model, &section, 500).refined_text, "Appendix");
    }

    #[test]
    fn test_truncate_words() {
        assert_eq!(truncate_words("short", 10), "short");
        assert_eq!(truncate_words("alpha beta gamma", 12), "alpha beta…");
        assert_eq!(truncate_words("supercalifragilistic", 6), "super…");
        assert_eq!(truncate_words("anything", 0), "");
        assert_eq!(truncate_words("", 0), "");
    }
}
