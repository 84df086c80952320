//! PDF fixtures built with lopdf.

#![allow(dead_code)]

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// One line of text placed on a page: `(text, font size, x, baseline y)`.
pub type Line = (&'static str, i64, i64, i64);

/// Build an A4 PDF with one Helvetica text line per entry.
pub fn build_pdf(pages: &[Vec<Line>], title: Option<&str>) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids = Vec::new();
    for lines in pages {
        let mut operations = Vec::new();
        for &(text, size, x, y) in lines {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), size.into()]));
            operations.push(Operation::new("Td", vec![x.into(), y.into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(text)]));
            operations.push(Operation::new("ET", vec![]));
        }

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if let Some(title) = title {
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
        });
        doc.trailer.set("Info", info_id);
    }

    doc
}

/// Point the contents of `page_num` at an object that is not a stream.
pub fn break_page_contents(doc: &mut Document, page_num: u32) {
    let page_id = doc.get_pages()[&page_num];
    let bogus_id = doc.add_object(Object::Integer(0));
    doc.get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .unwrap()
        .set("Contents", vec![Object::Reference(bogus_id)]);
}

/// A two-page report with three heading sizes and body text.
pub fn report_pages() -> Vec<Vec<Line>> {
    vec![
        vec![
            ("Annual Report", 24, 220, 780),
            ("Introduction", 18, 72, 700),
            ("This report covers the fiscal year.", 11, 72, 670),
        ],
        vec![
            ("Background", 18, 72, 780),
            ("Details", 14, 72, 740),
            ("Numbers were collected from every region.", 11, 72, 710),
        ],
    ]
}

/// Save a fixture to `path`.
pub fn write_pdf(path: &Path, pages: &[Vec<Line>], title: Option<&str>) {
    let mut doc = build_pdf(pages, title);
    doc.save(path).unwrap();
}

/// Serialize a fixture to bytes.
pub fn pdf_bytes(pages: &[Vec<Line>], title: Option<&str>) -> Vec<u8> {
    let mut doc = build_pdf(pages, title);
    let mut data = Vec::new();
    doc.save_to(&mut data).unwrap();
    data
}
