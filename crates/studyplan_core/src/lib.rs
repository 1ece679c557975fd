//! Core domain logic for study plan ingestion.
//!
//! Turns type-tagged extraction output into stable plan documents and
//! serves them merged with the separately stored course status overlay.

pub mod db;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod overlay;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::document::{Course, DocumentRecord, NormalizedDocument};
pub use model::overlay::{OverlayIndex, OverlayKey, StatusOverlay, StatusOverlayEntry};
pub use model::tagged::{Envelope, Slot, TaggedValue};
pub use normalize::{
    first_content, normalize_content, normalize_document, normalize_extraction, normalize_json,
    normalize_value, project_document, NormalizeError, NormalizeResult,
};
pub use overlay::{merge_entries, merge_status, InMemoryOverlayStore};
pub use repo::document_repo::{DocumentRepository, SqliteDocumentRepository};
pub use repo::status_repo::{SqliteStatusRepository, StatusOverlayStore};
pub use repo::{RepoError, RepoResult};
pub use service::study_plan_service::{ServiceError, ServiceResult, StudyPlanService};
