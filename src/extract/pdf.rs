//! lopdf-backed fragment extractor.

use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::{DocumentMetadata, Fragment};

use super::content::{collect_spans, decode_text_simple, GlyphDecoder, TextSpan};
use super::detect::{header_from_path, locate_header};
use super::layout::{
    blocks_to_fragments, group_lines_into_blocks, group_spans_into_lines, lines_to_fragments,
};
use super::options::{ErrorMode, ExtractOptions, Granularity};
use super::FragmentSource;

/// Default page box (US Letter) when a page has no usable MediaBox.
const DEFAULT_PAGE_BOX: PageBox = PageBox {
    left: 0.0,
    bottom: 0.0,
    right: 612.0,
    top: 792.0,
};

/// Visible page rectangle in PDF user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl PageBox {
    /// Page width in points.
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Page height in points.
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// Move a span from bottom-left to top-left page coordinates.
    fn flip(&self, mut span: TextSpan) -> TextSpan {
        span.x -= self.left;
        span.y = self.top - span.y;
        span
    }
}

/// A loaded PDF document.
pub struct PdfDocument {
    doc: LopdfDocument,
    version: String,
}

impl PdfDocument {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let header = header_from_path(path)?;

        let doc = if header.offset == 0 {
            LopdfDocument::load(path).map_err(map_load_error)?
        } else {
            log::debug!("Skipping {} bytes before the PDF header", header.offset);
            let data = fs::read(path)?;
            LopdfDocument::load_mem(&data[header.offset..]).map_err(map_load_error)?
        };
        Ok(Self::loaded(doc, header.version))
    }

    /// Load a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let header = locate_header(data)?;

        let doc = LopdfDocument::load_mem(&data[header.offset..]).map_err(map_load_error)?;
        Ok(Self::loaded(doc, header.version))
    }

    /// Load a PDF from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    fn loaded(doc: LopdfDocument, version: String) -> Self {
        if doc.is_encrypted() {
            log::warn!("Document is encrypted; text may not decode");
        }
        Self { doc, version }
    }

    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// PDF version from the file header.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Read the document info dictionary.
    pub fn metadata(&self) -> DocumentMetadata {
        let mut metadata = DocumentMetadata::with_version(self.version.clone());
        metadata.page_count = self.page_count();
        metadata.encrypted = self.doc.is_encrypted();

        if let Some(info) = self.info_dictionary() {
            metadata.title = get_string_from_dict(info, b"Title");
            metadata.author = get_string_from_dict(info, b"Author");
            metadata.subject = get_string_from_dict(info, b"Subject");
            metadata.creator = get_string_from_dict(info, b"Creator");
            metadata.producer = get_string_from_dict(info, b"Producer");
            metadata.created =
                get_string_from_dict(info, b"CreationDate").and_then(|s| parse_pdf_date(&s));
            metadata.modified =
                get_string_from_dict(info, b"ModDate").and_then(|s| parse_pdf_date(&s));
        }

        metadata
    }

    fn info_dictionary(&self) -> Option<&Dictionary> {
        match self.doc.trailer.get(b"Info").ok()? {
            Object::Reference(r) => self.doc.get_dictionary(*r).ok(),
            Object::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// Visible box of a page, following inherited MediaBox entries.
    pub fn page_box(&self, page_num: u32) -> Result<PageBox> {
        let page_id = self.page_id(page_num)?;
        Ok(self.media_box(page_id).unwrap_or(DEFAULT_PAGE_BOX))
    }

    fn page_id(&self, page_num: u32) -> Result<ObjectId> {
        let pages = self.doc.get_pages();
        pages
            .get(&page_num)
            .copied()
            .ok_or(Error::PageOutOfRange(page_num, pages.len() as u32))
    }

    fn media_box(&self, page_id: ObjectId) -> Option<PageBox> {
        let mut node = self.doc.get_dictionary(page_id).ok()?;
        // Bounded walk up the page tree.
        for _ in 0..32 {
            if let Ok(media_box) = node.get(b"MediaBox") {
                let array = match media_box {
                    Object::Reference(r) => self.doc.get_object(*r).ok()?.as_array().ok()?,
                    other => other.as_array().ok()?,
                };
                let nums: Vec<f64> = array
                    .iter()
                    .filter_map(|o| o.as_float().ok())
                    .map(f64::from)
                    .collect();
                if nums.len() < 4 {
                    return None;
                }
                return Some(PageBox {
                    left: nums[0].min(nums[2]),
                    bottom: nums[1].min(nums[3]),
                    right: nums[0].max(nums[2]),
                    top: nums[1].max(nums[3]),
                });
            }
            let parent = node.get(b"Parent").ok()?.as_reference().ok()?;
            node = self.doc.get_dictionary(parent).ok()?;
        }
        None
    }

    /// Extract the text spans of one page in top-left coordinates.
    pub fn page_spans(&self, page_num: u32) -> Result<Vec<TextSpan>> {
        let page_id = self.page_id(page_num)?;
        let page_box = self.media_box(page_id).unwrap_or(DEFAULT_PAGE_BOX);

        let fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;
        let decoder = PageFonts {
            doc: &self.doc,
            fonts,
        };

        for content_id in self.doc.get_page_contents(page_id) {
            self.doc
                .get_object(content_id)
                .and_then(Object::as_stream)
                .map_err(|e| {
                    Error::TextExtract(format!(
                        "Page {}: content {} {}: {}",
                        page_num, content_id.0, content_id.1, e
                    ))
                })?;
        }

        let content = self
            .doc
            .get_page_content(page_id)
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", page_num, e)))?;
        let content = lopdf::content::Content::decode(&content)
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", page_num, e)))?;

        Ok(collect_spans(&content.operations, &decoder)
            .into_iter()
            .map(|span| page_box.flip(span))
            .collect())
    }

    /// Extract the fragments of one page.
    pub fn page_fragments(&self, page_num: u32, granularity: Granularity) -> Result<Vec<Fragment>> {
        let lines = group_spans_into_lines(self.page_spans(page_num)?);
        Ok(match granularity {
            Granularity::Lines => lines_to_fragments(&lines, page_num),
            Granularity::Blocks => blocks_to_fragments(&group_lines_into_blocks(lines), page_num),
        })
    }
}

impl FragmentSource for PdfDocument {
    fn fragments(&self, options: &ExtractOptions) -> Result<Vec<Fragment>> {
        let mut fragments = Vec::new();

        for page_num in self.doc.get_pages().keys().copied() {
            match self.page_fragments(page_num, options.granularity) {
                Ok(page_fragments) => fragments.extend(page_fragments),
                Err(e) if options.error_mode == ErrorMode::Lenient => {
                    log::warn!("Skipping page {}: {}", page_num, e);
                }
                Err(e) => return Err(e),
            }
        }

        log::debug!(
            "Extracted {} {:?} fragments from {} pages",
            fragments.len(),
            options.granularity,
            self.page_count()
        );
        Ok(fragments)
    }

    fn metadata_title(&self) -> Option<String> {
        self.metadata().usable_title().map(str::to_string)
    }
}

fn map_load_error(e: lopdf::Error) -> Error {
    match e {
        lopdf::Error::Decryption(_) => Error::Encrypted,
        _ => Error::from(e),
    }
}

/// Font resources of one page.
struct PageFonts<'a> {
    doc: &'a LopdfDocument,
    fonts: BTreeMap<Vec<u8>, &'a Dictionary>,
}

impl GlyphDecoder for PageFonts<'_> {
    fn base_font(&self, resource: &[u8]) -> String {
        self.fonts
            .get(resource)
            .and_then(|font| font.get(b"BaseFont").ok())
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).into_owned())
            .unwrap_or_else(|| String::from_utf8_lossy(resource).into_owned())
    }

    fn decode(&self, resource: &[u8], bytes: &[u8]) -> String {
        if let Some(font) = self.fonts.get(resource) {
            if let Ok(encoding) = font.get_font_encoding(self.doc) {
                if let Ok(text) = LopdfDocument::decode_text(&encoding, bytes) {
                    return text;
                }
            }
        }
        decode_text_simple(bytes)
    }
}

/// Helper to get a string from a PDF dictionary.
fn get_string_from_dict(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(bytes, _) => Some(decode_text_simple(bytes)),
        Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    }
}

/// Parse a PDF date string (D:YYYYMMDDHHmmSSOHH'mm').
fn parse_pdf_date(s: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    let s = s.strip_prefix("D:").unwrap_or(s);

    let year: i32 = s.get(0..4)?.parse().ok()?;
    let field = |range: std::ops::Range<usize>, default: u32| {
        s.get(range).and_then(|v| v.parse().ok()).unwrap_or(default)
    };

    chrono::NaiveDate::from_ymd_opt(year, field(4..6, 1), field(6..8, 1))
        .and_then(|date| date.and_hms_opt(field(8..10, 0), field(10..12, 0), field(12..14, 0)))
        .map(|dt| chrono::DateTime::from_naive_utc_and_offset(dt, chrono::Utc))
}
