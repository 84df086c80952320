//! PDF header validation.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// Marker that opens every PDF header.
const PDF_MAGIC: &[u8] = b"%PDF-";

/// The header may follow this many bytes of leading junk.
pub const HEADER_SEARCH_WINDOW: usize = 1024;

/// Bytes needed to read a header that starts at the end of the window.
const HEADER_READ_LEN: usize = HEADER_SEARCH_WINDOW + 8;

/// Location and version of a `%PDF-x.y` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfHeader {
    /// Byte offset of `%PDF-` in the input
    pub offset: usize,
    /// Version string such as `1.7`
    pub version: String,
}

/// Find the `%PDF-x.y` header within the first [`HEADER_SEARCH_WINDOW`] bytes.
pub fn locate_header(data: &[u8]) -> Result<PdfHeader> {
    let searched = &data[..data.len().min(HEADER_READ_LEN)];
    let offset = searched
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)
        .filter(|&offset| offset < HEADER_SEARCH_WINDOW)
        .ok_or(Error::UnknownFormat)?;

    let rest = &searched[offset + PDF_MAGIC.len()..];
    let version = rest.get(..3).ok_or(Error::UnknownFormat)?;

    match version {
        [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit() => Ok(PdfHeader {
            offset,
            version: String::from_utf8_lossy(version).into_owned(),
        }),
        _ => Err(Error::UnsupportedVersion(
            String::from_utf8_lossy(version).into_owned(),
        )),
    }
}

/// Read the `%PDF-x.y` header and return the version string.
pub fn pdf_version(data: &[u8]) -> Result<String> {
    locate_header(data).map(|header| header.version)
}

/// Locate the header of a file on disk.
pub fn header_from_path<P: AsRef<Path>>(path: P) -> Result<PdfHeader> {
    let mut head = Vec::with_capacity(HEADER_READ_LEN);
    File::open(path)?
        .take(HEADER_READ_LEN as u64)
        .read_to_end(&mut head)?;
    locate_header(&head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_headers() {
        assert_eq!(pdf_version(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3").unwrap(), "1.7");
        assert_eq!(pdf_version(b"%PDF-2.0\n").unwrap(), "2.0");
    }

    #[test]
    fn test_invalid_headers() {
        assert!(matches!(pdf_version(b""), Err(Error::UnknownFormat)));
        assert!(matches!(pdf_version(b"%PDF"), Err(Error::UnknownFormat)));
        assert!(matches!(pdf_version(b"%PDF-1"), Err(Error::UnknownFormat)));
        assert!(matches!(
            pdf_version(b"<!DOCTYPE html>"),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(
            pdf_version(b"%PDF-abc"),
            Err(Error::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_header_after_leading_junk() {
        let mut data = b"\xef\xbb\xbfgarbage from a mail gateway\r\n".to_vec();
        let offset = data.len();
        data.extend_from_slice(b"%PDF-1.6\n");

        let header = locate_header(&data).unwrap();
        assert_eq!(header.offset, offset);
        assert_eq!(header.version, "1.6");
    }

    #[test]
    fn test_header_window_edge() {
        let mut data = vec![b' '; HEADER_SEARCH_WINDOW - 1];
        data.extend_from_slice(b"%PDF-1.4");
        assert_eq!(locate_header(&data).unwrap().offset, HEADER_SEARCH_WINDOW - 1);

        let mut data = vec![b' '; HEADER_SEARCH_WINDOW];
        data.extend_from_slice(b"%PDF-1.4");
        assert!(matches!(locate_header(&data), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_short_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();
        assert_eq!(header_from_path(&path).unwrap().version, "1.4");

        let path = dir.path().join("notes.pdf");
        std::fs::write(&path, b"hello").unwrap();
        assert!(header_from_path(&path).is_err());
    }

    #[test]
    fn test_header_offset_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefixed.pdf");
        std::fs::write(&path, b"junk\n%PDF-1.3\n").unwrap();
        assert_eq!(
            header_from_path(&path).unwrap(),
            PdfHeader {
                offset: 5,
                version: "1.3".to_string()
            }
        );
    }
}
