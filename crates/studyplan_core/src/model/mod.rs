//! Domain model for extraction input, normalized documents and overlays.
//!
//! # Responsibility
//! - Define the tagged input tree accepted from the extraction service.
//! - Define the envelope-free document shape shared by storage and callers.
//! - Define the mutable course status overlay kept apart from documents.
//!
//! # Invariants
//! - Documents are identified by `DOC_ID`; courses by `COD_ASIG` within one.
//! - Course status never lives inside a stored document payload.

pub mod document;
pub mod overlay;
pub mod tagged;
