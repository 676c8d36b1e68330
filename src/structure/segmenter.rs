//! Section Segmenter.
//!
//! Locates each outline heading in the block sequence and collects the text
//! between it and the next located heading.

use crate::model::{Heading, Outline, Section, TextBlock};

use super::rules::NumberingMatcher;

/// Blocks `[start, end)` holding one heading's text.
type Span = (usize, usize);

/// Split a document into one section per heading.
///
/// A heading that cannot be found in `blocks` still yields a section, with an
/// empty body. Sections never overlap.
pub fn segment_sections(document_id: &str, blocks: &[TextBlock], outline: &Outline) -> Vec<Section> {
    let numbering = NumberingMatcher::new();
    let mut cursor = 0;
    let mut located: Vec<Option<Span>> = Vec::with_capacity(outline.headings.len());

    for heading in &outline.headings {
        match locate(blocks, cursor, heading, &numbering) {
            Some(span) => {
                cursor = span.1;
                located.push(Some(span));
            }
            None => {
                log::warn!(
                    "Heading {:?} on page {} not found in {}",
                    heading.text,
                    heading.page,
                    document_id
                );
                located.push(None);
            }
        }
    }

    outline
        .headings
        .iter()
        .enumerate()
        .map(|(i, heading)| {
            let body = match located[i] {
                Some((_, body_start)) => {
                    let body_end = located[i + 1..]
                        .iter()
                        .flatten()
                        .map(|(start, _)| *start)
                        .next()
                        .unwrap_or(blocks.len());
                    join_lines(&blocks[body_start..body_end])
                }
                None => String::new(),
            };
            Section::new(document_id, heading.text.clone(), heading.page, body)
        })
        .collect()
}

/// Find the blocks a heading was built from, at or after `from`.
fn locate(blocks: &[TextBlock], from: usize, heading: &Heading, numbering: &NumberingMatcher) -> Option<Span> {
    let target = heading.text.trim();

    for start in from..blocks.len() {
        let page = blocks[start].page;
        if page < heading.page {
            continue;
        }
        if page > heading.page {
            return None;
        }

        let mut acc = blocks[start].text.trim().to_string();
        let mut end = start + 1;
        loop {
            let forms = [acc.as_str(), numbering.strip(&acc)];
            if forms.iter().any(|f| *f == target) {
                return Some((start, end));
            }
            let is_prefix = forms.iter().any(|f| target.starts_with(f));
            match blocks.get(end) {
                Some(next) if is_prefix && next.page == page => {
                    acc.push(' ');
                    acc.push_str(next.text.trim());
                    end += 1;
                }
                _ => break,
            }
        }
    }
    None
}

/// Join lines with spaces, rejoining words hyphenated across a line break.
fn join_lines(blocks: &[TextBlock]) -> String {
    let mut out = String::new();
    for block in blocks {
        let text = block.text.trim();
        if text.is_empty() {
            continue;
        }
        let hyphenated = out.ends_with('-')
            && out
                .chars()
                .rev()
                .nth(1)
                .is_some_and(char::is_alphabetic)
            && text.chars().next().is_some_and(char::is_lowercase);
        if hyphenated {
            out.pop();
        } else if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(text);
    }
    out
}
