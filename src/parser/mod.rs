//! PDF parsing module: the Layout Extractor.

mod backend;
mod layout;
mod options;

pub use backend::{
    decode_text_simple, BackendFontInfo, ContentOp, LopdfBackend, PageId, PdfBackend, PdfValue,
};
pub use layout::{group_spans_into_lines, normalize_text, LayoutExtractor, TextLine, TextSpan};
pub use options::ExtractOptions;
