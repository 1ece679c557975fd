//! Ordered-map overlay store.

use crate::model::overlay::{OverlayIndex, StatusOverlay, StatusOverlayEntry};
use crate::repo::status_repo::StatusOverlayStore;
use crate::repo::RepoResult;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Process-local overlay store backed by `OverlayIndex`.
///
/// Writes to the same key are serialized by the inner lock, so the last
/// write wins and none is lost.
#[derive(Debug, Default)]
pub struct InMemoryOverlayStore {
    index: Mutex<OverlayIndex>,
}

impl InMemoryOverlayStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every stored entry in key order.
    pub fn entries(&self) -> Vec<StatusOverlayEntry> {
        self.lock().entries()
    }

    fn lock(&self) -> MutexGuard<'_, OverlayIndex> {
        // A panicking writer cannot leave the map half-updated.
        self.index.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StatusOverlayStore for InMemoryOverlayStore {
    fn set_status(&self, document_id: &str, course_code: &str, passed: bool) -> RepoResult<()> {
        self.lock().set_status(document_id, course_code, passed);
        Ok(())
    }

    fn statuses_for(&self, document_id: &str) -> RepoResult<StatusOverlay> {
        Ok(self.lock().statuses_for(document_id))
    }
}
