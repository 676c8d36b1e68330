//! Markdown rendering of outlines.

use crate::model::Outline;

/// Render an outline as a title line followed by a nested heading list.
///
/// ```text
/// # Annual Report
///
/// - Introduction (p. 1)
///   - Background (p. 2)
/// ```
pub fn outline_to_markdown(outline: &Outline) -> String {
    let mut output = String::new();

    if !outline.title.is_empty() {
        output.push_str("# ");
        output.push_str(&escape_markdown(&outline.title));
        output.push_str("\n\n");
    }

    for heading in &outline.headings {
        let indent = "  ".repeat(heading.level.depth() - 1);
        output.push_str(&format!(
            "{}- {} (p. {})\n",
            indent,
            escape_markdown(&heading.text),
            heading.page
        ));
    }

    output
}

/// Escape special Markdown characters.
/// Only characters that could be misinterpreted as inline syntax are escaped.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}
