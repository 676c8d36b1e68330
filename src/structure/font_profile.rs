//! Font Profile Builder.
//!
//! Derives the body-text size and the ordered heading-size tiers from a
//! block sequence. Sizes are bucketed to 0.1 pt.

use std::collections::HashMap;

use crate::model::{HeadingLevel, TextBlock};

/// Body size assumed for documents without text.
const DEFAULT_BODY_SIZE: f32 = 12.0;

/// Font statistics for heading detection.
#[derive(Debug, Clone, Default)]
pub struct FontProfile {
    /// Body text font size (highest character count)
    pub body_size: f32,
    /// Distinct sizes larger than body, largest first
    pub heading_sizes: Vec<f32>,
    /// Characters observed per size bucket
    pub size_histogram: HashMap<i32, usize>,
    tolerance: f32,
}

fn size_key(size: f32) -> i32 {
    (size * 10.0).round() as i32
}

impl FontProfile {
    /// Build a profile from a block sequence.
    pub fn from_blocks(blocks: &[TextBlock], tolerance: f32) -> Self {
        let mut profile = Self {
            tolerance,
            ..Self::default()
        };
        for block in blocks {
            profile.add_block(block);
        }
        profile.analyze();
        profile
    }

    /// Add a block's characters to the histogram.
    pub fn add_block(&mut self, block: &TextBlock) {
        if block.font_size > 0.0 {
            *self.size_histogram.entry(size_key(block.font_size)).or_insert(0) += block.char_count();
        }
    }

    /// Calculate body size and heading sizes.
    pub fn analyze(&mut self) {
        // Most characters wins; ties go to the smaller size.
        let body = self
            .size_histogram
            .iter()
            .filter(|(_, chars)| **chars > 0)
            .max_by(|(ka, ca), (kb, cb)| ca.cmp(cb).then(kb.cmp(ka)))
            .map(|(k, _)| *k as f32 / 10.0);

        self.body_size = match body {
            Some(size) => size,
            None => {
                self.heading_sizes.clear();
                self.body_size = DEFAULT_BODY_SIZE;
                return;
            }
        };

        let mut larger: Vec<f32> = self
            .size_histogram
            .iter()
            .filter(|(_, chars)| **chars > 0)
            .map(|(k, _)| *k as f32 / 10.0)
            .filter(|size| *size > self.body_size + self.tolerance)
            .collect();
        larger.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

        // Collapse sizes within tolerance into the larger one
        let mut tiers: Vec<f32> = Vec::with_capacity(larger.len());
        for size in larger {
            match tiers.last() {
                Some(last) if last - size <= self.tolerance => {}
                _ => tiers.push(size),
            }
        }
        self.heading_sizes = tiers;

        log::debug!(
            "Font profile: body {:.1}pt, heading tiers {:?}",
            self.body_size,
            self.heading_sizes
        );
    }

    /// True when no size exceeds the body size.
    pub fn is_flat(&self) -> bool {
        self.heading_sizes.is_empty()
    }

    /// Check whether `size` is noticeably larger than body text.
    pub fn exceeds_body(&self, size: f32) -> bool {
        size > self.body_size + self.tolerance
    }

    /// Heading level for a font size, by rank among the top three tiers.
    pub fn tier_of(&self, size: f32) -> Option<HeadingLevel> {
        if !self.exceeds_body(size) {
            return None;
        }
        self.heading_sizes
            .iter()
            .take(3)
            .position(|tier| (tier - size).abs() <= self.tolerance)
            .map(|idx| HeadingLevel::from_depth(idx + 1))
    }

    /// Drop the tier matching `size`, promoting smaller tiers.
    pub fn remove_tier(&mut self, size: f32) {
        let tolerance = self.tolerance;
        self.heading_sizes
            .retain(|tier| (tier - size).abs() > tolerance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(text: &str, size: f32) -> TextBlock {
        TextBlock::new(1, text, size, false, 72.0, 100.0)
    }

    #[test]
    fn test_body_size_by_character_count() {
        // Many short large lines must not outvote one long body line.
        let blocks = vec![
            block("A", 20.0),
            block("B", 20.0),
            block("C", 20.0),
            block("A long paragraph of ordinary body text", 11.0),
        ];
        let profile = FontProfile::from_blocks(&blocks, 0.5);
        assert_eq!(profile.body_size, 11.0);
        assert_eq!(profile.heading_sizes, vec![20.0]);
    }

    #[test]
    fn test_heading_sizes_descending_and_collapsed() {
        let blocks = vec![
            block("body body body body body body", 12.0),
            block("Sub", 14.0),
            block("Title", 24.0),
            block("Section", 18.0),
            block("Section two", 18.2),
            block("Almost body", 12.3),
        ];
        let profile = FontProfile::from_blocks(&blocks, 0.5);
        assert_eq!(profile.heading_sizes, vec![24.0, 18.2, 14.0]);
        assert_eq!(profile.tier_of(24.0), Some(HeadingLevel::H1));
        assert_eq!(profile.tier_of(18.0), Some(HeadingLevel::H2));
        assert_eq!(profile.tier_of(14.0), Some(HeadingLevel::H3));
        assert_eq!(profile.tier_of(12.3), None);
    }

    #[test]
    fn test_fourth_tier_is_not_a_heading() {
        let blocks = vec![
            block("body body body body body body body body", 10.0),
            block("a", 30.0),
            block("b", 24.0),
            block("c", 18.0),
            block("d", 14.0),
        ];
        let profile = FontProfile::from_blocks(&blocks, 0.5);
        assert_eq!(profile.tier_of(18.0), Some(HeadingLevel::H3));
        assert_eq!(profile.tier_of(14.0), None);
    }

    #[test]
    fn test_flat_and_empty_documents() {
        let flat = FontProfile::from_blocks(&[block("only body", 12.0)], 0.5);
        assert!(flat.is_flat());

        let empty = FontProfile::from_blocks(&[], 0.5);
        assert!(empty.is_flat());
        assert_eq!(empty.body_size, 12.0);
    }

    #[test]
    fn test_body_tie_prefers_smaller_size() {
        let blocks = vec![block("abcd", 14.0), block("wxyz", 10.0)];
        let profile = FontProfile::from_blocks(&blocks, 0.5);
        assert_eq!(profile.body_size, 10.0);
    }

    #[test]
    fn test_remove_tier_promotes_next() {
        let blocks = vec![
            block("body body body body", 12.0),
            block("Title", 24.0),
            block("Section", 16.0),
        ];
        let mut profile = FontProfile::from_blocks(&blocks, 0.5);
        profile.remove_tier(24.0);
        assert_eq!(profile.tier_of(16.0), Some(HeadingLevel::H1));
        assert_eq!(profile.tier_of(24.0), None);
    }
}
