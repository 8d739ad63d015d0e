//! PDF outline support built on top of `lopdf`.
//!
//! The document is rendered to bytes first; the outline is attached
//! afterwards by parsing those bytes, inserting a flat `/Outlines` tree and
//! saving the document again.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, ObjectId};
use thiserror::Error;

/// One outline entry, pointing a title at a 1-indexed page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub title: String,
    pub page: usize,
}

/// Errors raised while rewriting a rendered PDF.
#[derive(Debug, Error)]
pub enum OutlineError {
    #[error("failed to process rendered PDF: {0}")]
    Parse(#[from] lopdf::Error),
    #[error("PDF catalog entry is missing or not a reference")]
    MissingCatalog,
    #[error("PDF catalog object is not a dictionary")]
    InvalidCatalog,
    #[error("outline entry {title:?} points at missing page {page}")]
    MissingPage { title: String, page: usize },
}

/// Number of pages in a rendered PDF.
pub fn page_count(pdf_bytes: &[u8]) -> Result<usize, OutlineError> {
    let document = Document::load_mem(pdf_bytes)?;
    Ok(document.get_pages().len())
}

/// Returns a copy of the input with a flat outline tree attached, one entry
/// per element. Each destination is `[page /Fit]`. Empty input entries leave
/// the bytes untouched.
pub fn attach_outline(
    pdf_bytes: &[u8],
    entries: &[OutlineEntry],
) -> Result<Vec<u8>, OutlineError> {
    if entries.is_empty() {
        return Ok(pdf_bytes.to_vec());
    }

    let mut document = Document::load_mem(pdf_bytes)?;
    let pages = document.get_pages();
    let resolved = resolve_entries(&mut document, entries, &pages)?;

    let outlines_id = document.new_object_id();
    link_entries(outlines_id, &mut document, &resolved);
    insert_outlines_root(outlines_id, &mut document, &resolved)?;

    let mut buffer = Vec::new();
    document.save_to(&mut buffer).map_err(lopdf::Error::from)?;
    Ok(buffer)
}

struct ResolvedEntry {
    object_id: ObjectId,
    page_ref: ObjectId,
    title: String,
}

fn resolve_entries(
    document: &mut Document,
    entries: &[OutlineEntry],
    pages: &BTreeMap<u32, ObjectId>,
) -> Result<Vec<ResolvedEntry>, OutlineError> {
    entries
        .iter()
        .map(|entry| {
            let page_ref = pages.get(&(entry.page as u32)).copied().ok_or_else(|| {
                OutlineError::MissingPage {
                    title: entry.title.clone(),
                    page: entry.page,
                }
            })?;
            Ok(ResolvedEntry {
                object_id: document.new_object_id(),
                page_ref,
                title: entry.title.clone(),
            })
        })
        .collect()
}

fn link_entries(outlines_id: ObjectId, document: &mut Document, entries: &[ResolvedEntry]) {
    for (index, entry) in entries.iter().enumerate() {
        let mut dictionary = Dictionary::new();
        dictionary.set("Title", Object::string_literal(entry.title.as_str()));
        dictionary.set(
            "Dest",
            Object::Array(vec![
                Object::Reference(entry.page_ref),
                Object::Name("Fit".into()),
            ]),
        );
        dictionary.set("Parent", Object::Reference(outlines_id));

        if index > 0 {
            dictionary.set("Prev", Object::Reference(entries[index - 1].object_id));
        }
        if index + 1 < entries.len() {
            dictionary.set("Next", Object::Reference(entries[index + 1].object_id));
        }

        document
            .objects
            .insert(entry.object_id, Object::Dictionary(dictionary));
    }
}

fn insert_outlines_root(
    outlines_id: ObjectId,
    document: &mut Document,
    entries: &[ResolvedEntry],
) -> Result<(), OutlineError> {
    let catalog_id = document
        .trailer
        .get(b"Root")
        .ok()
        .and_then(|object| object.as_reference().ok())
        .ok_or(OutlineError::MissingCatalog)?;

    let mut dictionary = Dictionary::new();
    dictionary.set("Type", Object::Name("Outlines".into()));
    dictionary.set("Count", Object::Integer(entries.len() as i64));
    if let Some(first) = entries.first() {
        dictionary.set("First", Object::Reference(first.object_id));
    }
    if let Some(last) = entries.last() {
        dictionary.set("Last", Object::Reference(last.object_id));
    }
    document
        .objects
        .insert(outlines_id, Object::Dictionary(dictionary));

    let catalog = document
        .objects
        .get_mut(&catalog_id)
        .ok_or(OutlineError::MissingCatalog)?
        .as_dict_mut()
        .map_err(|_| OutlineError::InvalidCatalog)?;
    catalog.set("Outlines", Object::Reference(outlines_id));

    Ok(())
}
