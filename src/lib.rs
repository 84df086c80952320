//! # pdfoutline
//!
//! Heading-outline inference for PDF documents.
//!
//! This library reads the positioned text of a PDF, ranks its font sizes,
//! and produces a document title plus an ordered H1-H3 outline using only
//! typographic and geometric signals.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfoutline::{outline_file, render, JsonFormat};
//!
//! fn main() -> pdfoutline::Result<()> {
//!     let outline = outline_file("document.pdf")?;
//!     println!("{}", render::to_json(&outline, JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Extraction**: lopdf content streams grouped into line or block fragments
//! - **Font ranking**: the three largest distinct sizes become H1, H2, H3
//! - **Title**: metadata title, else the largest centered text on page 1
//! - **Filtering**: long lines, repeated boilerplate, and footers are dropped
//! - **Batch**: whole directories processed in parallel with Rayon

pub mod batch;
pub mod error;
pub mod extract;
pub mod model;
pub mod outline;
pub mod render;

// Re-export commonly used types
pub use batch::{run_batch, BatchOptions, BatchReport, DocumentReport, DocumentStatus};
pub use error::{EmptyContent, Error, Result};
pub use extract::{ErrorMode, ExtractOptions, FragmentSource, Granularity, PdfDocument};
pub use model::{
    DocumentMetadata, FontSize, Fragment, Heading, HeadingLevel, LabeledFragment, Outline,
};
pub use outline::{infer_outline, FontLevelMap, OutlineOptions};
pub use render::JsonFormat;

use std::io::Read;
use std::path::Path;

/// Infer the outline of a PDF file with default options.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::outline_file;
///
/// let outline = outline_file("document.pdf").unwrap();
/// println!("{}: {} headings", outline.title, outline.len());
/// ```
pub fn outline_file<P: AsRef<Path>>(path: P) -> Result<Outline> {
    PdfOutline::new().outline(path)
}

/// Infer the outline of a PDF file with custom options.
pub fn outline_file_with_options<P: AsRef<Path>>(
    path: P,
    extract: &ExtractOptions,
    options: &OutlineOptions,
) -> Result<Outline> {
    let doc = PdfDocument::open(path)?;
    outline_source(&doc, extract, options)
}

/// Infer the outline of a PDF held in memory.
pub fn outline_bytes(data: &[u8]) -> Result<Outline> {
    PdfOutline::new().outline_bytes(data)
}

/// Infer the outline of any fragment source.
pub fn outline_source<S: FragmentSource + ?Sized>(
    source: &S,
    extract: &ExtractOptions,
    options: &OutlineOptions,
) -> Result<Outline> {
    let fragments = source.fragments(extract)?;
    let title = source.metadata_title();
    infer_outline(&fragments, title.as_deref(), options)
}

/// Extract the fragments of a PDF file with default options.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::extract_fragments;
///
/// for fragment in extract_fragments("document.pdf").unwrap() {
///     println!("p{} {:>6.2} {}", fragment.page, fragment.font_size, fragment.text);
/// }
/// ```
pub fn extract_fragments<P: AsRef<Path>>(path: P) -> Result<Vec<Fragment>> {
    PdfOutline::new().fragments(path)
}

/// Builder for outlining PDF documents.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::{OutlineOptions, PdfOutline};
///
/// let outline = PdfOutline::new()
///     .lines()
///     .lenient()
///     .with_outline_options(OutlineOptions::new().with_max_repeats(3))
///     .outline("document.pdf")?;
/// # Ok::<(), pdfoutline::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PdfOutline {
    extract_options: ExtractOptions,
    outline_options: OutlineOptions,
}

impl PdfOutline {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit one fragment per line instead of per block.
    pub fn lines(mut self) -> Self {
        self.extract_options = self.extract_options.lines();
        self
    }

    /// Skip pages whose content cannot be decoded.
    pub fn lenient(mut self) -> Self {
        self.extract_options = self.extract_options.lenient();
        self
    }

    /// Set extraction options.
    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract_options = options;
        self
    }

    /// Set heading-inference options.
    pub fn with_outline_options(mut self, options: OutlineOptions) -> Self {
        self.outline_options = options;
        self
    }

    /// Outline a PDF file.
    pub fn outline<P: AsRef<Path>>(&self, path: P) -> Result<Outline> {
        outline_file_with_options(path, &self.extract_options, &self.outline_options)
    }

    /// Outline a PDF held in memory.
    pub fn outline_bytes(&self, data: &[u8]) -> Result<Outline> {
        let doc = PdfDocument::from_bytes(data)?;
        outline_source(&doc, &self.extract_options, &self.outline_options)
    }

    /// Outline a PDF read to the end from `reader`.
    pub fn outline_reader<R: Read>(&self, reader: R) -> Result<Outline> {
        let doc = PdfDocument::from_reader(reader)?;
        outline_source(&doc, &self.extract_options, &self.outline_options)
    }

    /// Extract the fragments of a PDF file.
    pub fn fragments<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Fragment>> {
        PdfDocument::open(path)?.fragments(&self.extract_options)
    }
}
