//! Fragment extraction.
//!
//! The outline pipeline only needs an ordered list of [`Fragment`]s and an
//! optional metadata title. [`FragmentSource`] is that boundary;
//! [`PdfDocument`] implements it on top of lopdf, and fragment lists dumped
//! as JSON can stand in for any other backend.

mod content;
mod detect;
mod layout;
mod options;
mod pdf;

pub use content::{collect_spans, decode_text_simple, GlyphDecoder, TextSpan};
pub use detect::{header_from_path, locate_header, pdf_version, PdfHeader};
pub use layout::{normalize_text, TextBlock, TextLine};
pub use options::{ErrorMode, ExtractOptions, Granularity};
pub use pdf::{PageBox, PdfDocument};

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::model::Fragment;

/// Anything that can supply a document's fragments and metadata title.
pub trait FragmentSource {
    /// Fragments in page order, then in-page reading order.
    fn fragments(&self, options: &ExtractOptions) -> Result<Vec<Fragment>>;

    /// Document-level title, if present and not blank.
    fn metadata_title(&self) -> Option<String>;
}

/// Load a fragment list previously dumped as JSON.
pub fn read_fragments_json<P: AsRef<Path>>(path: P) -> Result<Vec<Fragment>> {
    let data = fs::read_to_string(path)?;
    fragments_from_json(&data)
}

/// Parse a JSON array of fragments.
///
/// Sizes are re-rounded and blank fragments dropped so the list honors the
/// same contract as extractor output.
pub fn fragments_from_json(data: &str) -> Result<Vec<Fragment>> {
    let raw: Vec<Fragment> = serde_json::from_str(data)?;
    Ok(raw
        .into_iter()
        .filter(|f| !f.trimmed_text().is_empty())
        .map(|f| Fragment::new(f.text, f.font_size, f.font_name, f.x0, f.y0, f.page))
        .collect())
}
