//! Course status overlay model.
//!
//! # Responsibility
//! - Define overlay entries keyed by `(document_id, course_code)`.
//! - Provide the per-document lookup consumed by the merge.
//! - Provide an ordered-map index with upsert semantics.
//!
//! # Invariants
//! - At most one status exists per `(document_id, course_code)` key.
//! - A later write for the same key fully replaces the earlier one.
//! - Entries may reference course codes that no plan contains.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One persisted pass/fail status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusOverlayEntry {
    pub document_id: String,
    pub course_code: String,
    pub passed: bool,
}

/// Composite key of the overlay store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OverlayKey {
    pub document_id: String,
    pub course_code: String,
}

/// Statuses of one document, keyed by course code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusOverlay {
    statuses: BTreeMap<String, bool>,
}

/// Ordered map of every overlay entry across documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayIndex {
    entries: BTreeMap<OverlayKey, bool>,
}

impl StatusOverlayEntry {
    pub fn new(
        document_id: impl Into<String>,
        course_code: impl Into<String>,
        passed: bool,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            course_code: course_code.into(),
            passed,
        }
    }
}

impl OverlayKey {
    pub fn new(document_id: impl Into<String>, course_code: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            course_code: course_code.into(),
        }
    }
}

impl StatusOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the lookup for `document_id` from a mixed entry set.
    ///
    /// Entries for other documents are skipped; for duplicate codes the last
    /// entry wins.
    pub fn from_entries<'a, I>(document_id: &str, entries: I) -> Self
    where
        I: IntoIterator<Item = &'a StatusOverlayEntry>,
    {
        entries
            .into_iter()
            .filter(|entry| entry.document_id == document_id)
            .map(|entry| (entry.course_code.clone(), entry.passed))
            .collect()
    }

    /// Sets the status for one course code, replacing any prior value.
    pub fn insert(&mut self, course_code: impl Into<String>, passed: bool) -> Option<bool> {
        self.statuses.insert(course_code.into(), passed)
    }

    pub fn get(&self, course_code: &str) -> Option<bool> {
        self.statuses.get(course_code).copied()
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.statuses
            .iter()
            .map(|(code, passed)| (code.as_str(), *passed))
    }
}

impl FromIterator<(String, bool)> for StatusOverlay {
    fn from_iter<T: IntoIterator<Item = (String, bool)>>(iter: T) -> Self {
        Self {
            statuses: iter.into_iter().collect(),
        }
    }
}

impl OverlayIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts the status for one key and returns the replaced value.
    ///
    /// Applying the same call twice leaves the same state as applying it once.
    pub fn set_status(
        &mut self,
        document_id: &str,
        course_code: &str,
        passed: bool,
    ) -> Option<bool> {
        self.entries
            .insert(OverlayKey::new(document_id, course_code), passed)
    }

    pub fn get(&self, document_id: &str, course_code: &str) -> Option<bool> {
        self.entries
            .get(&OverlayKey::new(document_id, course_code))
            .copied()
    }

    /// Returns every status stored for one document.
    pub fn statuses_for(&self, document_id: &str) -> StatusOverlay {
        self.entries
            .iter()
            .filter(|(key, _)| key.document_id == document_id)
            .map(|(key, passed)| (key.course_code.clone(), *passed))
            .collect()
    }

    pub fn entries(&self) -> Vec<StatusOverlayEntry> {
        self.entries
            .iter()
            .map(|(key, passed)| {
                StatusOverlayEntry::new(key.document_id.as_str(), key.course_code.as_str(), *passed)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
