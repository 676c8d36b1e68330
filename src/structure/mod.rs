//! Structure extraction: font profile, heading classification and section
//! segmentation over a [`TextBlock`](crate::model::TextBlock) sequence.

mod classifier;
mod config;
mod font_profile;
mod rules;
mod segmenter;

pub use classifier::{classify, HeadingClassifier};
pub use config::HeadingConfig;
pub use font_profile::FontProfile;
pub use rules::{classify_block, BlockFeatures, NumberingMatcher, Rule, RuleContext, RULES};
pub use segmenter::segment_sections;
