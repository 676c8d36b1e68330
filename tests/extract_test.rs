//! Integration tests for structure extraction.

mod common;

use common::{PdfBuilder, BODY};
use docintel::{
    extract_document, extract_layout, extract_many, extract_structure,
    extract_structure_file, extract_structure_with_options, Error, ExtractOptions, Heading,
    HeadingLevel, Outline,
};

fn report_pdf() -> Vec<u8> {
    PdfBuilder::new()
        .page()
        .bold("Annual Market Report", 24.0, 72.0)
        .bold("1. Introduction", 18.0, 130.0)
        .paragraph(BODY, 160.0)
        .bold("1.1 Scope", 14.0, 220.0)
        .paragraph(BODY, 250.0)
        .page()
        .bold("2. Revenue", 18.0, 72.0)
        .paragraph(&["Revenue projections grew 20% year over year."], 100.0)
        .paragraph(BODY, 114.0)
        .build()
}

#[test]
fn test_numbered_heading_example() {
    let pdf = PdfBuilder::new()
        .page()
        .text("1. Introduction", 18.0, 72.0)
        .paragraph(BODY, 110.0)
        .build();

    let outline = extract_structure(&pdf).unwrap();
    assert_eq!(
        outline.headings,
        vec![Heading::new(HeadingLevel::H1, "1. Introduction", 1)]
    );
}

#[test]
fn test_report_outline() {
    let outline = extract_structure(&report_pdf()).unwrap();

    assert_eq!(outline.title, "Annual Market Report");
    assert_eq!(
        outline.headings,
        vec![
            Heading::new(HeadingLevel::H1, "1. Introduction", 1),
            Heading::new(HeadingLevel::H2, "1.1 Scope", 1),
            Heading::new(HeadingLevel::H1, "2. Revenue", 2),
        ]
    );
}

#[test]
fn test_extraction_is_idempotent() {
    let pdf = report_pdf();
    let first = extract_structure(&pdf).unwrap();
    let second = extract_structure(&pdf).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_heading_pages_never_regress() {
    let outline = extract_structure(&report_pdf()).unwrap();
    assert!(outline
        .headings
        .windows(2)
        .all(|w| w[0].page <= w[1].page));
    assert!(outline.headings.iter().all(|h| (1..=2).contains(&h.page)));
}

#[test]
fn test_document_without_text() {
    let pdf = PdfBuilder::new().blank_page().blank_page().build();
    let outline = extract_structure(&pdf).unwrap();
    assert_eq!(outline, Outline::new("", vec![]));

    let json = serde_json::to_value(&outline).unwrap();
    assert_eq!(json["title"], "");
    assert_eq!(json["outline"], serde_json::json!([]));
}

#[test]
fn test_compressed_streams() {
    let pdf = PdfBuilder::new()
        .page()
        .text("1. Introduction", 18.0, 72.0)
        .paragraph(BODY, 110.0)
        .compressed()
        .build();
    let outline = extract_structure(&pdf).unwrap();
    assert_eq!(outline.headings.len(), 1);
}

#[test]
fn test_layout_blocks_in_reading_order() {
    let blocks = extract_layout(&report_pdf()).unwrap();

    assert_eq!(blocks[0].text, "Annual Market Report");
    assert!(blocks[0].bold);
    assert!((blocks[0].font_size - 24.0).abs() < 0.01);
    assert!((blocks[0].y_position - 72.0).abs() < 0.01);
    assert!(blocks
        .windows(2)
        .all(|w| (w[0].page, w[0].y_position) <= (w[1].page, w[1].y_position)));
}

#[test]
fn test_flat_document_uses_style() {
    let pdf = PdfBuilder::new()
        .page()
        .paragraph(BODY, 72.0)
        .bold("KEY FINDINGS", 12.0, 140.0)
        .paragraph(BODY, 170.0)
        .build();
    let outline = extract_structure(&pdf).unwrap();
    assert_eq!(
        outline.headings,
        vec![Heading::new(HeadingLevel::H1, "KEY FINDINGS", 1)]
    );
    assert_eq!(outline.title, BODY[0]);
}

#[test]
fn test_page_limit() {
    let options = ExtractOptions::new().with_max_pages(1);
    let err = extract_structure_with_options(&report_pdf(), &options).unwrap_err();
    assert!(matches!(err, Error::PageLimitExceeded { pages: 2, limit: 1 }));
    assert!(err.is_parse_error());
}

#[test]
fn test_strip_numbering_option() {
    let options = ExtractOptions::new().strip_numbering();
    let outline = extract_structure_with_options(&report_pdf(), &options).unwrap();
    let texts: Vec<_> = outline.headings.iter().map(|h| h.text.as_str()).collect();
    assert_eq!(texts, vec!["Introduction", "Scope", "Revenue"]);
}

#[test]
fn test_document_sections() {
    let doc = extract_document("report.pdf", &report_pdf(), &ExtractOptions::default()).unwrap();
    assert_eq!(doc.page_count, 2);

    let sections = doc.sections();
    assert_eq!(sections.len(), 3);
    assert_eq!(sections[0].title, "1. Introduction");
    assert_eq!(sections[0].body_text, BODY.join(" "));
    assert_eq!(sections[2].page, 2);
    assert!(sections[2]
        .body_text
        .starts_with("Revenue projections grew 20% year over year."));
    assert!(sections.iter().all(|s| s.document_id == "report.pdf"));
}

#[test]
fn test_extract_many() {
    let docs = vec![
        ("good.pdf".to_string(), report_pdf()),
        ("bad.pdf".to_string(), b"%PDF-1.4 broken".to_vec()),
    ];
    for options in [ExtractOptions::default(), ExtractOptions::new().sequential()] {
        let results = extract_many(&docs, &options);
        assert_eq!(results[0].0, "good.pdf");
        assert!(results[0].1.is_ok());
        assert_eq!(results[1].0, "bad.pdf");
        assert!(results[1].1.as_ref().unwrap_err().is_parse_error());
    }
}

#[test]
fn test_extract_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.pdf");
    std::fs::write(&path, report_pdf()).unwrap();

    let outline = extract_structure_file(&path).unwrap();
    assert_eq!(outline.title, "Annual Market Report");
}

#[test]
fn test_non_pdf_rejected() {
    let err = extract_structure(b"<html><body>hello</body></html>").unwrap_err();
    assert!(matches!(err, Error::UnknownFormat));
}
