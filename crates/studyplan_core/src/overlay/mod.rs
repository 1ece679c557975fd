//! Overlay Merger and the in-memory status store.
//!
//! # Responsibility
//! - Combine a stored document with its status overlay into a read view.
//! - Offer an ordered-map overlay store for callers without SQLite.
//!
//! # Invariants
//! - Merging never mutates its inputs and never clears an existing status.
//! - Overlay entries that match no course are ignored, not deleted.

mod memory;
mod merge;

pub use memory::InMemoryOverlayStore;
pub use merge::{merge_entries, merge_status};
