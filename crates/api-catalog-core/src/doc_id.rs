//! Stable identifiers for documentation references.
//!
//! Documentation entries have no stored id. Links to a documentation page
//! use an id derived from the entry's human-readable name, so the derivation
//! must be pure and deterministic.

use std::collections::BTreeMap;

use crate::models::DocumentationReference;

/// Normalize a documentation name into a URL-safe identifier.
///
/// Lower-cases the name, collapses every run of characters outside
/// `[a-z0-9]` into a single `-`, and trims leading and trailing hyphens.
///
/// ```
/// use api_catalog_core::doc_id::derive_doc_id;
///
/// assert_eq!(derive_doc_id("User Service!"), "user-service");
/// assert_eq!(derive_doc_id("  --Multi   Space--  "), "multi-space");
/// assert_eq!(derive_doc_id(""), "");
/// ```
pub fn derive_doc_id(name: &str) -> String {
    let mut id = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !id.is_empty() {
                id.push('-');
            }
            pending_hyphen = false;
            id.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    id
}

/// Return the first entry whose derived id equals `doc_id`.
pub fn find_doc_by_id<'a>(
    docs: &'a [DocumentationReference],
    doc_id: &str,
) -> Option<&'a DocumentationReference> {
    docs.iter().find(|doc| derive_doc_id(&doc.name) == doc_id)
}

/// Derived ids shared by two or more entries, in sorted order.
pub fn find_doc_id_collisions(docs: &[DocumentationReference]) -> Vec<String> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for doc in docs {
        *counts.entry(derive_doc_id(&doc.name)).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(id, _)| id)
        .collect()
}
