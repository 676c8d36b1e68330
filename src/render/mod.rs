//! Rendering of extraction and ranking results to output formats.

mod json;
mod markdown;

pub use json::{to_json, JsonFormat};
pub use markdown::outline_to_markdown;
