//! Layout extraction for PDF documents.
//!
//! Interprets page content streams into positioned text spans, then groups
//! spans sharing a baseline into lines. Each line becomes one [`TextBlock`].
//! No heuristic decisions are made here beyond line grouping.

use std::collections::HashMap;

use unicode_normalization::UnicodeNormalization;

use crate::error::Result;
use crate::model::TextBlock;

use super::backend::{ContentOp, PageId, PdfBackend, PdfValue};

/// TJ adjustments beyond this many thousandths of an em read as a word space.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Average glyph advance, in ems, used to estimate span widths.
const AVG_GLYPH_WIDTH_EM: f32 = 0.5;

/// Font size assumed before the first `Tf`.
const DEFAULT_FONT_SIZE: f32 = 12.0;

/// A text span with position and style information, in PDF user space.
#[derive(Debug, Clone)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline, bottom-up)
    pub y: f32,
    /// Estimated width of the text
    pub width: f32,
    /// Effective font size in points
    pub font_size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Whether the font appears to be bold
    pub is_bold: bool,
}

impl TextSpan {
    /// Create a new text span, inferring boldness from the font name.
    pub fn new(text: String, x: f32, y: f32, font_size: f32, font_name: String) -> Self {
        let is_bold = is_bold_font_name(&font_name);
        Self {
            text,
            x,
            y,
            width: 0.0,
            font_size,
            font_name,
            is_bold,
        }
    }
}

fn is_bold_font_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    ["bold", "black", "heavy", "demi"]
        .iter()
        .any(|marker| lower.contains(marker))
}

/// A text line composed of spans on the same baseline.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// The spans in this line, sorted by X position
    pub spans: Vec<TextSpan>,
    /// Y position (baseline, bottom-up)
    pub y: f32,
    /// Leftmost X position
    pub x: f32,
    /// Dominant font size in this line
    pub font_size: f32,
}

impl TextLine {
    /// Create a new text line from spans.
    pub fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        if spans.is_empty() {
            return Self {
                spans,
                y: 0.0,
                x: 0.0,
                font_size: 0.0,
            };
        }

        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

        // Dominant font size, weighted by text length
        let total_chars: usize = spans.iter().map(|s| s.text.chars().count()).sum();
        let weighted_size: f32 = spans
            .iter()
            .map(|s| s.font_size * s.text.chars().count() as f32)
            .sum();
        let font_size = if total_chars > 0 {
            weighted_size / total_chars as f32
        } else {
            spans[0].font_size
        };

        let y = spans[0].y;
        let x = spans[0].x;

        Self {
            spans,
            y,
            x,
            font_size,
        }
    }

    /// Combined text of all spans, with spaces inserted at horizontal gaps.
    ///
    /// No space is inserted between adjacent CJK characters.
    pub fn text(&self) -> String {
        let mut result = String::new();

        for (i, span) in self.spans.iter().enumerate() {
            if i == 0 {
                result.push_str(&span.text);
                continue;
            }

            let prev_span = &self.spans[i - 1];
            let gap = span.x - (prev_span.x + prev_span.width);
            let space_threshold = span.font_size * AVG_GLYPH_WIDTH_EM * 0.2;

            let prev_last_char = prev_span.text.chars().last();
            let curr_first_char = span.text.chars().next();
            let both_cjk = prev_last_char.map(is_spaceless_script_char).unwrap_or(false)
                && curr_first_char.map(is_spaceless_script_char).unwrap_or(false);

            let has_space = result.ends_with(char::is_whitespace)
                || span.text.starts_with(char::is_whitespace);

            if gap > space_threshold && !both_cjk && !has_space {
                result.push(' ');
            }

            result.push_str(&span.text);
        }

        result
    }

    /// Check if the line is predominantly bold.
    pub fn is_bold(&self) -> bool {
        let bold_chars: usize = self
            .spans
            .iter()
            .filter(|s| s.is_bold)
            .map(|s| s.text.chars().count())
            .sum();
        let total_chars: usize = self.spans.iter().map(|s| s.text.chars().count()).sum();
        total_chars > 0 && bold_chars as f32 / total_chars as f32 > 0.5
    }

    /// Convert to a block on `page`, flipping Y to a top-down coordinate.
    ///
    /// Returns `None` when the line carries no visible text.
    pub fn into_block(self, page: u32, page_height: f32) -> Option<TextBlock> {
        let text = normalize_text(&self.text());
        if text.is_empty() {
            return None;
        }
        let bold = self.is_bold();
        Some(TextBlock::new(
            page,
            text,
            self.font_size,
            bold,
            self.x,
            page_height - self.y,
        ))
    }
}

/// Extracts ordered text blocks from every page of a document.
pub struct LayoutExtractor<'a, B: PdfBackend> {
    backend: &'a B,
}

impl<'a, B: PdfBackend> LayoutExtractor<'a, B> {
    /// Create a new layout extractor.
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Extract all blocks in reading order.
    ///
    /// Fails as a whole if any page's content cannot be decoded.
    pub fn extract(&self) -> Result<Vec<TextBlock>> {
        let mut blocks = Vec::new();
        for (page_num, page_id) in self.backend.pages() {
            let page_blocks = self.extract_page(page_num, page_id)?;
            log::debug!("Page {}: {} lines", page_num, page_blocks.len());
            blocks.extend(page_blocks);
        }
        Ok(blocks)
    }

    /// Extract the blocks of a single page.
    pub fn extract_page(&self, page_num: u32, page_id: PageId) -> Result<Vec<TextBlock>> {
        let (_, page_height) = self.backend.page_size(page_id);
        let spans = self.extract_page_spans(page_id)?;
        Ok(group_spans_into_lines(spans)
            .into_iter()
            .filter_map(|line| line.into_block(page_num, page_height))
            .collect())
    }

    /// Extract positioned text spans from a page.
    pub fn extract_page_spans(&self, page_id: PageId) -> Result<Vec<TextSpan>> {
        let content = self.backend.page_content(page_id)?;
        if content.iter().all(u8::is_ascii_whitespace) {
            log::warn!("Page {:?} has no content, skipping", page_id);
            return Ok(Vec::new());
        }

        let fonts: HashMap<Vec<u8>, FontInfo> = match self.backend.page_fonts(page_id) {
            Ok(fonts) => fonts
                .into_iter()
                .map(|f| {
                    let bold = f.force_bold || is_bold_font_name(&f.base_font);
                    (
                        f.name,
                        FontInfo {
                            name: f.base_font,
                            bold,
                        },
                    )
                })
                .collect(),
            Err(e) => {
                log::debug!("No font resources for page {:?}: {}", page_id, e);
                HashMap::new()
            }
        };

        let ops = self.backend.decode_content(&content)?;
        let mut interpreter = ContentInterpreter::new(self.backend, page_id, &fonts);
        for op in &ops {
            interpreter.apply(op);
        }
        Ok(interpreter.spans)
    }
}

/// Font information resolved for the current page.
#[derive(Debug, Clone)]
struct FontInfo {
    name: String,
    bold: bool,
}

/// Affine matrix `[a b c d e f]`, PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn from_op(op: &ContentOp) -> Option<Self> {
        Some(Self {
            a: op.number(0)?,
            b: op.number(1)?,
            c: op.number(2)?,
            d: op.number(3)?,
            e: op.number(4)?,
            f: op.number(5)?,
        })
    }

    fn translation(tx: f32, ty: f32) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    /// `self × other`
    fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Walks content stream operators, tracking graphics and text state.
struct ContentInterpreter<'a, B: PdfBackend> {
    backend: &'a B,
    page_id: PageId,
    fonts: &'a HashMap<Vec<u8>, FontInfo>,
    ctm: Matrix,
    ctm_stack: Vec<Matrix>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    leading: f32,
    font_key: Vec<u8>,
    font_size: f32,
    in_text_object: bool,
    spans: Vec<TextSpan>,
}

impl<'a, B: PdfBackend> ContentInterpreter<'a, B> {
    fn new(backend: &'a B, page_id: PageId, fonts: &'a HashMap<Vec<u8>, FontInfo>) -> Self {
        Self {
            backend,
            page_id,
            fonts,
            ctm: Matrix::IDENTITY,
            ctm_stack: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            leading: 0.0,
            font_key: Vec::new(),
            font_size: DEFAULT_FONT_SIZE,
            in_text_object: false,
            spans: Vec::new(),
        }
    }

    fn apply(&mut self, op: &ContentOp) {
        match op.operator.as_str() {
            "q" => self.ctm_stack.push(self.ctm),
            "Q" => {
                if let Some(ctm) = self.ctm_stack.pop() {
                    self.ctm = ctm;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_op(op) {
                    self.ctm = m.multiply(&self.ctm);
                }
            }
            "BT" => {
                self.in_text_object = true;
                self.text_matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
            }
            "ET" => self.in_text_object = false,
            "Tf" => {
                if let Some(PdfValue::Name(name)) = op.operands.first() {
                    self.font_key = name.clone();
                }
                if let Some(size) = op.number(1) {
                    self.font_size = size;
                }
            }
            "TL" => {
                if let Some(leading) = op.number(0) {
                    self.leading = leading;
                }
            }
            "Td" => {
                if let (Some(tx), Some(ty)) = (op.number(0), op.number(1)) {
                    self.move_line(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (op.number(0), op.number(1)) {
                    self.leading = -ty;
                    self.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = Matrix::from_op(op) {
                    self.text_matrix = m;
                    self.line_matrix = m;
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    self.show_strings(std::slice::from_ref(&PdfValue::Str(bytes.clone())));
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(items)) = op.operands.first() {
                    self.show_strings(items);
                }
            }
            "'" => {
                self.next_line();
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    self.show_strings(std::slice::from_ref(&PdfValue::Str(bytes.clone())));
                }
            }
            "\"" => {
                self.next_line();
                if let Some(PdfValue::Str(bytes)) = op.operands.get(2) {
                    self.show_strings(std::slice::from_ref(&PdfValue::Str(bytes.clone())));
                }
            }
            _ => {}
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translation(tx, ty).multiply(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = if self.leading != 0.0 {
            self.leading
        } else {
            self.font_size * 1.2
        };
        self.move_line(0.0, -leading);
    }

    /// Show a TJ-style sequence of strings and kerning adjustments as one span.
    fn show_strings(&mut self, items: &[PdfValue]) {
        if !self.in_text_object {
            return;
        }

        let start = self.text_matrix.multiply(&self.ctm);
        let mut text = String::new();
        let mut advance = 0.0f32;

        for item in items {
            match item {
                PdfValue::Str(bytes) => {
                    let decoded = self
                        .backend
                        .decode_text(self.page_id, &self.font_key, bytes);
                    advance += decoded.chars().count() as f32 * AVG_GLYPH_WIDTH_EM * self.font_size;
                    text.push_str(&decoded);
                }
                PdfValue::Integer(_) | PdfValue::Real(_) => {
                    let adjustment = -item.as_number().unwrap_or(0.0);
                    advance += adjustment / 1000.0 * self.font_size;
                    let needs_space = adjustment > TJ_SPACE_THRESHOLD
                        && !text.is_empty()
                        && !text.ends_with(char::is_whitespace)
                        && !text.chars().last().map(is_spaceless_script_char).unwrap_or(false);
                    if needs_space {
                        text.push(' ');
                    }
                }
                _ => {}
            }
        }

        self.text_matrix = Matrix::translation(advance, 0.0).multiply(&self.text_matrix);

        // Negative sizes mirror the glyphs; zero-size text is invisible.
        let effective_size = self.font_size.abs() * start.vertical_scale();
        if text.trim().is_empty() || effective_size <= 0.0 {
            return;
        }

        let (font_name, font_bold) = match self.fonts.get(&self.font_key) {
            Some(info) => (info.name.clone(), info.bold),
            None => (String::from_utf8_lossy(&self.font_key).to_string(), false),
        };

        let mut span = TextSpan::new(text, start.e, start.f, effective_size, font_name);
        span.is_bold |= font_bold;
        span.width = advance * start.horizontal_scale();
        self.spans.push(span);
    }
}

/// Group spans into lines by baseline, top of the page first.
pub fn group_spans_into_lines(mut spans: Vec<TextSpan>) -> Vec<TextLine> {
    if spans.is_empty() {
        return vec![];
    }

    // Y descending (PDF Y is bottom-up), then X
    spans.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines: Vec<TextLine> = Vec::new();
    let mut current_line_spans: Vec<TextSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let y_tolerance = span.font_size * 0.3;

        match current_y {
            Some(y) if (span.y - y).abs() <= y_tolerance => current_line_spans.push(span),
            _ => {
                if !current_line_spans.is_empty() {
                    lines.push(TextLine::from_spans(std::mem::take(
                        &mut current_line_spans,
                    )));
                }
                current_y = Some(span.y);
                current_line_spans.push(span);
            }
        }
    }

    if !current_line_spans.is_empty() {
        lines.push(TextLine::from_spans(current_line_spans));
    }

    lines
}

/// NFC-normalize, expand ligatures and collapse runs of whitespace.
pub fn normalize_text(text: &str) -> String {
    let expanded: String = text
        .nfc()
        .flat_map(|c| {
            let replacement: &[char] = match c {
                '\u{FB00}' => &['f', 'f'],
                '\u{FB01}' => &['f', 'i'],
                '\u{FB02}' => &['f', 'l'],
                '\u{FB03}' => &['f', 'f', 'i'],
                '\u{FB04}' => &['f', 'f', 'l'],
                '\u{FB05}' | '\u{FB06}' => &['s', 't'],
                '\u{00A0}' => &[' '],
                _ => return vec![c],
            };
            replacement.to_vec()
        })
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect();

    expanded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}
