//! Read-time merge of course statuses into a document.

use crate::model::document::NormalizedDocument;
use crate::model::overlay::{StatusOverlay, StatusOverlayEntry};

/// Returns a copy of `document` where every course whose code has an
/// overlay entry carries that entry's status.
///
/// Courses without a hit keep whatever `passed` they already had; courses
/// without a code never match. An empty overlay yields an equal document.
pub fn merge_status(document: &NormalizedDocument, overlay: &StatusOverlay) -> NormalizedDocument {
    let mut merged = document.clone();
    if overlay.is_empty() {
        return merged;
    }

    for course in &mut merged.plan {
        let hit = course.code.as_deref().and_then(|code| overlay.get(code));
        if let Some(passed) = hit {
            course.passed = Some(passed);
        }
    }
    merged
}

/// Merges a raw entry set, using only the entries of `document.id`.
pub fn merge_entries(
    document: &NormalizedDocument,
    entries: &[StatusOverlayEntry],
) -> NormalizedDocument {
    merge_status(
        document,
        &StatusOverlay::from_entries(&document.id, entries),
    )
}
