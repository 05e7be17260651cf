//! PDF page splitting
//!
//! Turns a multi-page PDF into one standalone PDF per page using lopdf.
//! Parsing and re-serialising are CPU-bound; callers on the async runtime
//! should run [`split_pages`] inside `spawn_blocking`.

use lopdf::Document;

use crate::error::{AppError, Result};

/// Split a PDF into single-page documents, in source page order.
///
/// Fails with [`AppError::Split`] on unparseable input or a document with no
/// pages (matching the upstream service's rejection of empty documents).
pub fn split_pages(bytes: &[u8]) -> Result<Vec<Vec<u8>>> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| AppError::Split(format!("Unable to read PDF file: {e}")))?;

    let page_count = doc.get_pages().len() as u32;
    if page_count == 0 {
        return Err(AppError::Split("PDF contains no pages".to_string()));
    }

    let mut pages = Vec::with_capacity(page_count as usize);
    for page_number in 1..=page_count {
        let mut single = doc.clone();
        let discard: Vec<u32> = (1..=page_count).filter(|n| *n != page_number).collect();
        if !discard.is_empty() {
            single.delete_pages(&discard);
        }
        single.prune_objects();
        single.renumber_objects();

        let mut buf = Vec::new();
        single
            .save_to(&mut buf)
            .map_err(|e| AppError::Split(format!("Failed to write page {page_number}: {e}")))?;
        pages.push(buf);
    }

    Ok(pages)
}

/// Reduce a source file name to a safe artifact name prefix.
///
/// Keeps ASCII alphanumerics, `-` and `_`; strips a trailing `.pdf`
/// extension; anything left empty falls back to `document`.
pub fn sanitize_basename(name: &str) -> String {
    let stem = name
        .strip_suffix(".pdf")
        .or_else(|| name.strip_suffix(".PDF"))
        .unwrap_or(name);

    let cleaned: String = stem
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();

    if cleaned.is_empty() {
        "document".to_string()
    } else {
        cleaned
    }
}
