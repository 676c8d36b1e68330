//! Heading classification rules.
//!
//! Classification is an ordered table of rules folded over each block: every
//! rule sees the level proposed so far and may keep, replace or set it.

use regex::Regex;

use crate::model::{HeadingLevel, TextBlock};

use super::config::HeadingConfig;
use super::font_profile::FontProfile;

/// A numbered-heading pattern and the depth it implies.
struct NumberingPattern {
    regex: Regex,
    depth: usize,
}

/// Recognizes explicit heading numbering ("2.1 Methods", "IV. Results").
pub struct NumberingMatcher {
    patterns: Vec<NumberingPattern>,
    prefix: Regex,
}

impl Default for NumberingMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl NumberingMatcher {
    /// Create a matcher with the standard patterns.
    pub fn new() -> Self {
        let table: [(&str, usize); 7] = [
            (r"^\d+\.\d+\.\d+(\.\d+)*\.?\s+\S", 3),
            (r"^\d+\.\d+\.?\s+\S", 2),
            (r"^\d+[.)]\s+\S", 1),
            (r"^[IVXLC]+\.\s+\S", 1),
            (r"^[A-Z][.)]\s+\S", 2),
            (r"^[a-z][.)]\s+\S", 3),
            (r"(?i)^(chapter|part|appendix|section)\s+[0-9A-Z]+\b", 1),
        ];
        Self {
            patterns: table
                .iter()
                .map(|(pattern, depth)| NumberingPattern {
                    regex: Regex::new(pattern).unwrap(),
                    depth: *depth,
                })
                .collect(),
            prefix: Regex::new(r"^(\d+(\.\d+)*[.)]?|[IVXLC]+\.|[A-Za-z][.)])\s+").unwrap(),
        }
    }

    /// Numbering depth of `text`, if it starts with a heading number.
    pub fn depth(&self, text: &str) -> Option<usize> {
        let text = text.trim_start();
        self.patterns
            .iter()
            .find(|p| p.regex.is_match(text))
            .map(|p| p.depth)
    }

    /// Remove a leading heading number, keeping the text if nothing remains.
    pub fn strip<'t>(&self, text: &'t str) -> &'t str {
        let trimmed = text.trim_start();
        match self.prefix.find(trimmed) {
            Some(m) if m.end() < trimmed.len() => trimmed[m.end()..].trim(),
            _ => text.trim(),
        }
    }
}

/// Per-block signals the rules read.
#[derive(Debug, Clone)]
pub struct BlockFeatures<'a> {
    pub block: &'a TextBlock,
    /// Distance to the previous line on the same page (infinite at page top)
    pub gap_above: f32,
    /// Distance to the next line on the same page (infinite at page bottom)
    pub gap_below: f32,
    /// Depth implied by explicit numbering
    pub numbering: Option<usize>,
    pub uppercase: bool,
}

impl BlockFeatures<'_> {
    /// Short, emphasized line.
    pub fn is_heading_like(&self, config: &HeadingConfig) -> bool {
        self.block.word_count() <= config.max_heading_words && (self.block.bold || self.uppercase)
    }

    /// Whitespace above and below exceeds the typical line gap.
    pub fn is_isolated(&self, median_gap: f32, config: &HeadingConfig) -> bool {
        let threshold = median_gap * config.isolation_ratio;
        self.gap_above > threshold && self.gap_below > threshold
    }

    /// Candidate for the style fallback: short, emphasized and set apart.
    pub fn stands_alone(&self, median_gap: f32, config: &HeadingConfig) -> bool {
        self.is_heading_like(config) && self.is_isolated(median_gap, config)
    }
}

/// Document-wide signals shared by all rules.
#[derive(Debug, Clone)]
pub struct RuleContext<'a> {
    pub profile: &'a FontProfile,
    pub config: &'a HeadingConfig,
    /// Median distance between consecutive lines on a page
    pub median_gap: f32,
    /// Leftmost text position in the document
    pub min_x: f32,
    /// Whether some style-fallback candidate is set in capitals
    pub has_caps_headings: bool,
}

/// One entry of the rule chain.
pub struct Rule {
    pub name: &'static str,
    pub apply: fn(&BlockFeatures, &RuleContext, Option<HeadingLevel>) -> Option<HeadingLevel>,
}

/// The rule chain, applied in order.
pub const RULES: &[Rule] = &[
    Rule {
        name: "size_tier",
        apply: size_tier,
    },
    Rule {
        name: "style_fallback",
        apply: style_fallback,
    },
    Rule {
        name: "numbering_override",
        apply: numbering_override,
    },
];

/// Fold the rule chain over one block.
pub fn classify_block(features: &BlockFeatures, ctx: &RuleContext) -> Option<HeadingLevel> {
    RULES
        .iter()
        .fold(None, |level, rule| (rule.apply)(features, ctx, level))
}

/// Font size matches one of the top three heading tiers.
pub fn size_tier(
    features: &BlockFeatures,
    ctx: &RuleContext,
    current: Option<HeadingLevel>,
) -> Option<HeadingLevel> {
    ctx.profile.tier_of(features.block.font_size).or(current)
}

/// Flat documents: short emphasized lines set off by whitespace.
pub fn style_fallback(
    features: &BlockFeatures,
    ctx: &RuleContext,
    current: Option<HeadingLevel>,
) -> Option<HeadingLevel> {
    if current.is_some()
        || !ctx.profile.is_flat()
        || !features.stands_alone(ctx.median_gap, ctx.config)
    {
        return current;
    }

    let mut level = HeadingLevel::H1;
    if ctx.config.indent_step > 0.0 {
        let steps = ((features.block.x_position - ctx.min_x) / ctx.config.indent_step).floor();
        for _ in 0..(steps.max(0.0) as usize).min(2) {
            level = level.demote();
        }
    }
    // Bold mixed-case lines rank below capitals when both styles occur.
    if ctx.has_caps_headings && !features.uppercase {
        level = level.demote();
    }
    Some(level)
}

/// Explicit numbering decides the depth of a heading.
pub fn numbering_override(
    features: &BlockFeatures,
    ctx: &RuleContext,
    current: Option<HeadingLevel>,
) -> Option<HeadingLevel> {
    let depth = match features.numbering {
        Some(depth) => depth,
        None => return current,
    };
    if current.is_some() || features.is_heading_like(ctx.config) {
        Some(HeadingLevel::from_depth(depth))
    } else {
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(block: &TextBlock, numbering: Option<usize>) -> BlockFeatures<'_> {
        BlockFeatures {
            block,
            gap_above: f32::INFINITY,
            gap_below: f32::INFINITY,
            numbering,
            uppercase: block.is_uppercase(),
        }
    }

    fn body_blocks() -> Vec<TextBlock> {
        vec![TextBlock::new(
            1,
            "plenty of body text to anchor the body size",
            12.0,
            false,
            72.0,
            100.0,
        )]
    }

    #[test]
    fn test_numbering_depths() {
        let m = NumberingMatcher::new();
        assert_eq!(m.depth("1. Introduction"), Some(1));
        assert_eq!(m.depth("2) Scope"), Some(1));
        assert_eq!(m.depth("2.1 Methods"), Some(2));
        assert_eq!(m.depth("2.1. Methods"), Some(2));
        assert_eq!(m.depth("3.2.1 Sampling"), Some(3));
        assert_eq!(m.depth("3.2.1.4 Deep"), Some(3));
        assert_eq!(m.depth("IV. Results"), Some(1));
        assert_eq!(m.depth("B. Appendix material"), Some(2));
        assert_eq!(m.depth("c) detail"), Some(3));
        assert_eq!(m.depth("Chapter 3 Growth"), Some(1));
        assert_eq!(m.depth("APPENDIX A"), Some(1));
        assert_eq!(m.depth("2024 was a good year"), None);
        assert_eq!(m.depth("3.5 million users"), Some(2));
        assert_eq!(m.depth("Introduction"), None);
    }

    #[test]
    fn test_strip_numbering() {
        let m = NumberingMatcher::new();
        assert_eq!(m.strip("1. Introduction"), "Introduction");
        assert_eq!(m.strip("2.1.3 Sampling plan"), "Sampling plan");
        assert_eq!(m.strip("IV. Results"), "Results");
        assert_eq!(m.strip("Overview"), "Overview");
        assert_eq!(m.strip("1."), "1.");
    }

    #[test]
    fn test_numbering_overrides_size_tier() {
        let mut blocks = body_blocks();
        blocks.push(TextBlock::new(1, "Heading", 18.0, true, 72.0, 50.0));
        let profile = FontProfile::from_blocks(&blocks, 0.5);
        let config = HeadingConfig::default();
        let ctx = RuleContext {
            profile: &profile,
            config: &config,
            median_gap: 14.0,
            min_x: 72.0,
            has_caps_headings: false,
        };

        let numbered = TextBlock::new(1, "2.1 Market Size", 18.0, false, 72.0, 200.0);
        assert_eq!(
            classify_block(&features(&numbered, Some(2)), &ctx),
            Some(HeadingLevel::H2)
        );

        let plain = TextBlock::new(1, "Market Size", 18.0, false, 72.0, 200.0);
        assert_eq!(classify_block(&features(&plain, None), &ctx), Some(HeadingLevel::H1));
    }

    #[test]
    fn test_numbered_body_line_is_not_promoted() {
        let blocks = body_blocks();
        let profile = FontProfile::from_blocks(&blocks, 0.5);
        let config = HeadingConfig::default();
        let ctx = RuleContext {
            profile: &profile,
            config: &config,
            median_gap: 14.0,
            min_x: 72.0,
            has_caps_headings: false,
        };

        let item = TextBlock::new(1, "1. buy more of the product", 12.0, false, 72.0, 300.0);
        assert_eq!(classify_block(&features(&item, Some(1)), &ctx), None);

        let bold = TextBlock::new(1, "1. Overview", 12.0, true, 72.0, 300.0);
        assert_eq!(
            numbering_override(&features(&bold, Some(1)), &ctx, None),
            Some(HeadingLevel::H1)
        );
    }

    #[test]
    fn test_style_fallback_requires_isolation() {
        let blocks = body_blocks();
        let profile = FontProfile::from_blocks(&blocks, 0.5);
        let config = HeadingConfig::default();
        let ctx = RuleContext {
            profile: &profile,
            config: &config,
            median_gap: 14.0,
            min_x: 72.0,
            has_caps_headings: false,
        };

        let heading = TextBlock::new(1, "Summary", 12.0, true, 72.0, 300.0);
        let mut f = features(&heading, None);
        f.gap_above = 30.0;
        f.gap_below = 20.0;
        assert_eq!(style_fallback(&f, &ctx, None), Some(HeadingLevel::H1));

        f.gap_below = 14.0;
        assert_eq!(style_fallback(&f, &ctx, None), None);
    }

    #[test]
    fn test_style_fallback_indent_and_secondary_bold() {
        let blocks = body_blocks();
        let profile = FontProfile::from_blocks(&blocks, 0.5);
        let config = HeadingConfig::default();
        let ctx = RuleContext {
            profile: &profile,
            config: &config,
            median_gap: 14.0,
            min_x: 72.0,
            has_caps_headings: true,
        };

        let caps = TextBlock::new(1, "FINDINGS", 12.0, false, 72.0, 300.0);
        assert_eq!(style_fallback(&features(&caps, None), &ctx, None), Some(HeadingLevel::H1));

        let bold = TextBlock::new(1, "Key findings", 12.0, true, 72.0, 300.0);
        assert_eq!(style_fallback(&features(&bold, None), &ctx, None), Some(HeadingLevel::H2));

        let indented = TextBlock::new(1, "Key findings", 12.0, true, 90.0, 300.0);
        assert_eq!(
            style_fallback(&features(&indented, None), &ctx, None),
            Some(HeadingLevel::H3)
        );
    }

    #[test]
    fn test_stands_alone() {
        let config = HeadingConfig::default();
        let caps = TextBlock::new(1, "FY2024 USA", 12.0, false, 72.0, 300.0);
        let mut f = features(&caps, None);
        f.gap_above = 14.0;
        f.gap_below = 14.0;
        assert!(f.is_heading_like(&config));
        assert!(!f.stands_alone(14.0, &config));

        f.gap_above = 40.0;
        f.gap_below = 30.0;
        assert!(f.stands_alone(14.0, &config));
    }

    #[test]
    fn test_rule_table_order() {
        let names: Vec<_> = RULES.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["size_tier", "style_fallback", "numbering_override"]);
    }
}
