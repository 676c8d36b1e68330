//! Heading Classifier.
//!
//! Turns a block sequence into an [`Outline`]: picks the title, folds the
//! rule chain over every remaining block, then merges wrapped headings.

use std::collections::HashSet;

use crate::model::{Heading, HeadingLevel, Outline, TextBlock};

use super::config::HeadingConfig;
use super::font_profile::FontProfile;
use super::rules::{classify_block, BlockFeatures, NumberingMatcher, RuleContext};

/// Classifies blocks into a title and a heading list.
pub struct HeadingClassifier {
    config: HeadingConfig,
    numbering: NumberingMatcher,
}

/// Title text plus the blocks it was taken from.
#[derive(Debug, Clone, Default)]
struct TitleCandidate {
    text: String,
    blocks: Vec<usize>,
    size: Option<f32>,
}

impl TitleCandidate {
    fn is_repeated_by(&self, block: &TextBlock) -> bool {
        !self.text.is_empty() && block.text.trim() == self.text
    }
}

/// A heading that may still absorb its wrapped continuation.
#[derive(Debug, Clone)]
struct Candidate {
    level: HeadingLevel,
    text: String,
    page: u32,
    font_size: f32,
    bold: bool,
    last_index: usize,
    last_y: f32,
}

impl Default for HeadingClassifier {
    fn default() -> Self {
        Self::new(HeadingConfig::default())
    }
}

impl HeadingClassifier {
    /// Create a classifier with the given thresholds.
    pub fn new(config: HeadingConfig) -> Self {
        Self {
            config,
            numbering: NumberingMatcher::new(),
        }
    }

    /// Access the configuration.
    pub fn config(&self) -> &HeadingConfig {
        &self.config
    }

    /// Classify a block sequence in reading order.
    pub fn classify(&self, blocks: &[TextBlock]) -> Outline {
        if blocks.is_empty() {
            return Outline::default();
        }

        let mut profile = FontProfile::from_blocks(blocks, self.config.size_tolerance);
        let title = self.find_title(blocks, &profile);

        // Title blocks plus later lines repeating the title text.
        let excluded: HashSet<usize> = match title.size {
            Some(_) => (0..blocks.len())
                .filter(|i| title.blocks.contains(i) || title.is_repeated_by(&blocks[*i]))
                .collect(),
            None => HashSet::new(),
        };

        // A size used only by the title is not a heading tier.
        if let Some(size) = title.size {
            let used_elsewhere = blocks.iter().enumerate().any(|(i, b)| {
                !excluded.contains(&i) && (b.font_size - size).abs() <= self.config.size_tolerance
            });
            if !used_elsewhere {
                profile.remove_tier(size);
            }
        }

        let features = self.block_features(blocks);
        let typical_gap = median_gap(blocks);
        let ctx = RuleContext {
            profile: &profile,
            config: &self.config,
            median_gap: typical_gap,
            min_x: blocks
                .iter()
                .map(|b| b.x_position)
                .fold(f32::INFINITY, f32::min),
            has_caps_headings: features
                .iter()
                .any(|f| f.uppercase && f.stands_alone(typical_gap, &self.config)),
        };

        let classified: Vec<(usize, HeadingLevel)> = features
            .iter()
            .enumerate()
            .filter(|(i, f)| !excluded.contains(i) && self.is_candidate_text(f.block))
            .filter_map(|(i, f)| classify_block(f, &ctx).map(|level| (i, level)))
            .collect();

        let mut merged = self.merge_wrapped(blocks, &classified);
        if title.size.is_some() {
            merged.retain(|c| c.text != title.text);
        }
        let headings = self.finish(merged);

        log::debug!(
            "Classified {} blocks: title {:?}, {} headings",
            blocks.len(),
            title.text,
            headings.len()
        );

        Outline::new(title.text, headings)
    }

    fn is_candidate_text(&self, block: &TextBlock) -> bool {
        let alnum = block.text.chars().filter(|c| c.is_alphanumeric()).count();
        alnum >= self.config.min_heading_alnum
            && block.text.chars().count() <= self.config.max_heading_chars
    }

    fn block_features<'a>(&self, blocks: &'a [TextBlock]) -> Vec<BlockFeatures<'a>> {
        blocks
            .iter()
            .enumerate()
            .map(|(i, block)| {
                let gap_above = match i.checked_sub(1).map(|p| &blocks[p]) {
                    Some(prev) if prev.page == block.page => block.y_position - prev.y_position,
                    _ => f32::INFINITY,
                };
                let gap_below = match blocks.get(i + 1) {
                    Some(next) if next.page == block.page => next.y_position - block.y_position,
                    _ => f32::INFINITY,
                };
                BlockFeatures {
                    block,
                    gap_above,
                    gap_below,
                    numbering: self.numbering.depth(&block.text),
                    uppercase: block.is_uppercase(),
                }
            })
            .collect()
    }

    /// Largest-size run on page 1, else the first line.
    fn find_title(&self, blocks: &[TextBlock], profile: &FontProfile) -> TitleCandidate {
        let page_blocks: Vec<usize> = (0..blocks.len())
            .take_while(|&i| blocks[i].page == 1)
            .collect();

        let largest = page_blocks
            .iter()
            .map(|&i| blocks[i].font_size)
            .fold(0.0f32, f32::max);
        let tol = self.config.size_tolerance;

        if profile.exceeds_body(largest) {
            let start = page_blocks.iter().copied().find(|&i| {
                (blocks[i].font_size - largest).abs() <= tol
                    && self.numbering.depth(&blocks[i].text).is_none()
                    && self.is_candidate_text(&blocks[i])
            });

            if let Some(start) = start {
                let mut run = vec![start];
                for &i in page_blocks.iter().skip_while(|&&i| i <= start) {
                    let prev = &blocks[i - 1];
                    let block = &blocks[i];
                    let adjacent = block.y_position - prev.y_position
                        <= largest * self.config.merge_gap_ratio;
                    if (block.font_size - largest).abs() > tol
                        || !adjacent
                        || self.numbering.depth(&block.text).is_some()
                    {
                        break;
                    }
                    run.push(i);
                }

                let text = run
                    .iter()
                    .map(|&i| blocks[i].text.trim())
                    .collect::<Vec<_>>()
                    .join(" ");
                return TitleCandidate {
                    text,
                    blocks: run,
                    size: Some(largest),
                };
            }
        }

        let text = blocks
            .iter()
            .map(|b| b.text.trim())
            .find(|t| !t.is_empty())
            .unwrap_or_default()
            .to_string();
        TitleCandidate {
            text,
            blocks: Vec::new(),
            size: None,
        }
    }

    /// Fold adjacent same-style heading lines into one heading.
    fn merge_wrapped(
        &self,
        blocks: &[TextBlock],
        classified: &[(usize, HeadingLevel)],
    ) -> Vec<Candidate> {
        classified
            .iter()
            .fold(Vec::new(), |mut acc: Vec<Candidate>, &(idx, level)| {
                let block = &blocks[idx];
                let continues = acc.last().is_some_and(|last| {
                    last.level == level
                        && last.page == block.page
                        && last.last_index + 1 == idx
                        && last.bold == block.bold
                        && (last.font_size - block.font_size).abs() <= 0.1
                        && block.y_position - last.last_y
                            <= block.font_size * self.config.merge_gap_ratio
                        && self.numbering.depth(&block.text).is_none()
                });

                match acc.last_mut() {
                    Some(last) if continues => {
                        last.text.push(' ');
                        last.text.push_str(block.text.trim());
                        last.last_index = idx;
                        last.last_y = block.y_position;
                    }
                    _ => acc.push(Candidate {
                        level,
                        text: block.text.trim().to_string(),
                        page: block.page,
                        font_size: block.font_size,
                        bold: block.bold,
                        last_index: idx,
                        last_y: block.y_position,
                    }),
                }
                acc
            })
    }

    /// Apply numbering removal, drop duplicates, keep page order.
    fn finish(&self, candidates: Vec<Candidate>) -> Vec<Heading> {
        let mut seen = HashSet::new();
        let mut headings: Vec<Heading> = candidates
            .into_iter()
            .map(|c| {
                let text = if self.config.strip_numbering {
                    self.numbering.strip(&c.text).to_string()
                } else {
                    c.text
                };
                Heading::new(c.level, text, c.page)
            })
            .filter(|h| seen.insert((h.text.clone(), h.page)))
            .collect();
        headings.sort_by_key(|h| h.page);
        headings
    }
}

/// Median distance between consecutive lines on the same page.
fn median_gap(blocks: &[TextBlock]) -> f32 {
    let mut gaps: Vec<f32> = blocks
        .windows(2)
        .filter(|w| w[0].page == w[1].page)
        .map(|w| w[1].y_position - w[0].y_position)
        .filter(|g| *g > 0.0)
        .collect();
    if gaps.is_empty() {
        return 0.0;
    }
    gaps.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = gaps.len() / 2;
    if gaps.len() % 2 == 0 {
        (gaps[mid - 1] + gaps[mid]) / 2.0
    } else {
        gaps[mid]
    }
}

/// Classify blocks with the default configuration.
pub fn classify(blocks: &[TextBlock]) -> Outline {
    HeadingClassifier::default().classify(blocks)
}
