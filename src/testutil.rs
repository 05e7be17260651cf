//! Test fixtures shared across module tests.

use lopdf::content::Content;
use lopdf::{dictionary, Document, Object, Stream};

/// Build a minimal valid PDF with the given number of (blank) pages.
pub fn build_pdf(page_count: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::with_capacity(page_count);
    for _ in 0..page_count {
        let content = Content { operations: vec![] };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode empty content stream"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("serialize fixture PDF");
    buf
}
