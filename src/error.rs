//! Error types for docintel.

use std::io;
use thiserror::Error;

/// Result type alias for docintel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting structure or ranking sections.
///
/// Heuristic outcomes such as "no headings found" or "no query term matched"
/// are not errors; they surface as empty collections or zero scores.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading a document from disk.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The bytes are not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF header carries a malformed version.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// The PDF document is encrypted and cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// The PDF structure or a content stream could not be parsed.
    #[error("PDF parsing error: {0}")]
    Parse(String),

    /// The document exceeds the configured page ceiling.
    #[error("Document has {pages} pages, limit is {limit}")]
    PageLimitExceeded { pages: u32, limit: u32 },

    /// The persona query is empty or inconsistent with the supplied sections.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Error while serializing output.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Whether this error rejects the input document itself.
    ///
    /// These are deterministic for a given input; retrying is pointless.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Error::UnknownFormat
                | Error::UnsupportedVersion(_)
                | Error::Encrypted
                | Error::Parse(_)
                | Error::PageLimitExceeded { .. }
        )
    }

    /// Whether this error rejects a persona query.
    pub fn is_invalid_query(&self) -> bool {
        matches!(self, Error::InvalidQuery(_))
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::Parse(err.to_string()),
        }
    }
}
