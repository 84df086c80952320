//! Error types for pdfoutline.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdfoutline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while inferring an outline.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading PDFs or writing outline files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Error extracting text content.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// The document produced nothing to outline.
    #[error("Nothing to outline: {0}")]
    EmptyContent(EmptyContent),

    /// Error serializing an outline or fragment list.
    #[error("Rendering error: {0}")]
    Render(String),

    /// The batch input directory does not exist.
    #[error("Input directory not found: {}", .0.display())]
    InputDirNotFound(PathBuf),
}

impl Error {
    /// Whether this error means "skip the document" rather than a failure.
    pub fn is_skip(&self) -> bool {
        matches!(self, Error::EmptyContent(_))
    }

    /// Whether this error was raised while reading the PDF itself.
    pub fn is_extraction_failure(&self) -> bool {
        matches!(
            self,
            Error::UnknownFormat
                | Error::UnsupportedVersion(_)
                | Error::PdfParse(_)
                | Error::Encrypted
                | Error::TextExtract(_)
                | Error::PageOutOfRange(..)
        )
    }
}

/// The stage at which a document ran out of outline material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyContent {
    /// The extractor returned no fragments.
    NoFragments,
    /// Font ranking produced no heading levels.
    NoFontLevels,
    /// No fragment matched a heading font size.
    NoHeadings,
    /// Every heading candidate was filtered out.
    AllHeadingsFiltered,
}

impl fmt::Display for EmptyContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            EmptyContent::NoFragments => "no text fragments extracted",
            EmptyContent::NoFontLevels => "no font sizes to rank",
            EmptyContent::NoHeadings => "no fragments matched a heading level",
            EmptyContent::AllHeadingsFiltered => "all headings were filtered out",
        };
        f.write_str(msg)
    }
}

impl From<EmptyContent> for Error {
    fn from(reason: EmptyContent) -> Self {
        Error::EmptyContent(reason)
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(format!("JSON error: {}", err))
    }
}
