//! In-memory PDF builder shared by the integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::dictionary;
use lopdf::{Document, Object, Stream};

const PAGE_HEIGHT: f32 = 792.0;

/// One line of text; `top` is measured down from the top of the page.
pub struct Line {
    pub text: String,
    pub size: f32,
    pub bold: bool,
    pub x: f32,
    pub top: f32,
}

/// Builds simple single-column PDFs, one `BT`/`ET` block per line.
#[derive(Default)]
pub struct PdfBuilder {
    pages: Vec<Option<Vec<Line>>>,
    compress: bool,
}

impl PdfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new page.
    pub fn page(mut self) -> Self {
        self.pages.push(Some(Vec::new()));
        self
    }

    /// Add a page without a content stream.
    pub fn blank_page(mut self) -> Self {
        self.pages.push(None);
        self
    }

    pub fn text(self, text: &str, size: f32, top: f32) -> Self {
        self.line(text, size, false, 72.0, top)
    }

    pub fn bold(self, text: &str, size: f32, top: f32) -> Self {
        self.line(text, size, true, 72.0, top)
    }

    pub fn line(mut self, text: &str, size: f32, bold: bool, x: f32, top: f32) -> Self {
        if self.pages.is_empty() {
            self.pages.push(Some(Vec::new()));
        }
        if let Some(Some(lines)) = self.pages.last_mut() {
            lines.push(Line {
                text: text.to_string(),
                size,
                bold,
                x,
                top,
            });
        }
        self
    }

    /// Add body lines of ordinary text starting at `top`, 14pt apart.
    pub fn paragraph(mut self, sentences: &[&str], top: f32) -> Self {
        for (i, sentence) in sentences.iter().enumerate() {
            self = self.text(sentence, 12.0, top + i as f32 * 14.0);
        }
        self
    }

    /// Flate-compress content streams.
    pub fn compressed(mut self) -> Self {
        self.compress = true;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular_id,
                "F2" => bold_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for page in &self.pages {
            let mut page_dict = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
            };

            if let Some(lines) = page {
                let mut operations = Vec::new();
                for line in lines {
                    let font = if line.bold { "F2" } else { "F1" };
                    operations.extend(vec![
                        Operation::new("BT", vec![]),
                        Operation::new("Tf", vec![font.into(), line.size.into()]),
                        Operation::new("Td", vec![line.x.into(), (PAGE_HEIGHT - line.top).into()]),
                        Operation::new("Tj", vec![Object::string_literal(line.text.clone())]),
                        Operation::new("ET", vec![]),
                    ]);
                }
                let content = Content { operations };
                let content_id =
                    doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
                page_dict.set("Contents", content_id);
            }

            kids.push(doc.add_object(page_dict).into());
        }

        let count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        if self.compress {
            doc.compress();
        }

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }
}

/// Filler sentences for body text.
pub const BODY: &[&str] = &[
    "The quarter closed with steady demand across all regions.",
    "Operating costs remained within the planned envelope.",
    "Headcount grew modestly in the engineering group.",
];
