//! Normalizer: tagged extraction trees to normalized documents.
//!
//! # Responsibility
//! - Strip type envelopes at every depth (`unwrap`).
//! - Project the unwrapped fields onto the document shape (`project`).
//! - Pick the content block out of a raw extraction response (`extraction`).
//!
//! # Invariants
//! - Every function here is pure: no I/O, no shared state.
//! - An envelope without a populated slot is null, never an error.
//! - The only hard failure for a structurally valid tree is a missing
//!   document identity.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod extraction;
mod project;
mod unwrap;

pub use extraction::{first_content, normalize_content, normalize_extraction};
pub use project::{normalize_document, project_document};
pub use unwrap::{normalize_json, normalize_value};

pub type NormalizeResult<T> = Result<T, NormalizeError>;

/// Normalization failures that callers must handle before persisting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// `DOC_ID` is absent, null, non-scalar or blank after unwrapping.
    MissingIdentity,
    /// The extraction response carried no content block.
    NoContents,
}

impl Display for NormalizeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingIdentity => write!(f, "DOC_ID missing in extracted document"),
            Self::NoContents => write!(f, "extraction response returned no contents"),
        }
    }
}

impl Error for NormalizeError {}
