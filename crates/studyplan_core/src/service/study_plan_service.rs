//! Study plan use-case service.
//!
//! # Responsibility
//! - Ingest extraction responses and uploaded plans into storage.
//! - Serve documents as merged views (document + status overlay).
//! - Record course status in the overlay store only.
//!
//! # Invariants
//! - Nothing is persisted for an ingestion that lacks a document identity.
//! - Every document returned to callers has been through `merge_status`.
//! - Merged `passed` values are never written back into document payloads.
//! - Every public use-case logs `start` and then `ok`, `rejected` or `error`.

use crate::model::document::{canonical_code, DocumentRecord, NormalizedDocument};
use crate::normalize::{normalize_extraction, NormalizeError};
use crate::overlay::merge_status;
use crate::repo::document_repo::DocumentRepository;
use crate::repo::status_repo::StatusOverlayStore;
use crate::repo::RepoError;
use log::{error, info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for study plan use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Input could not be turned into a document (no contents, no id).
    Normalize(NormalizeError),
    DocumentNotFound(String),
    /// Display names must be non-blank.
    InvalidName(String),
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normalize(err) => write!(f, "{err}"),
            Self::DocumentNotFound(key) => write!(f, "document not found: {key}"),
            Self::InvalidName(value) => write!(f, "invalid document name: `{value}`"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Normalize(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Returns whether the caller's input, not storage, caused the failure.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::Repo(_))
    }
}

impl From<NormalizeError> for ServiceError {
    fn from(value: NormalizeError) -> Self {
        Self::Normalize(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(doc_id) => Self::DocumentNotFound(doc_id),
            other => Self::Repo(other),
        }
    }
}

/// Study plan facade over a document repository and an overlay store.
pub struct StudyPlanService<D, S> {
    documents: D,
    statuses: S,
}

impl<D: DocumentRepository, S: StatusOverlayStore> StudyPlanService<D, S> {
    pub fn new(documents: D, statuses: S) -> Self {
        Self {
            documents,
            statuses,
        }
    }

    /// Normalizes the first content of an extraction response and stores it.
    ///
    /// Returns the stored document merged with any status recorded earlier
    /// for the same id.
    ///
    /// # Errors
    /// - `Normalize(NoContents)` / `Normalize(MissingIdentity)`; nothing is
    ///   written in either case.
    pub fn ingest_extraction(&self, response: &Value) -> ServiceResult<DocumentRecord> {
        logged("ingest_extraction", "source=extraction", || {
            let document = normalize_extraction(response)?;
            info!(
                "event=ingest_extraction module=service status=normalized doc_id={} courses={}",
                document.id,
                document.plan.len()
            );
            self.store(&document)
        })
    }

    /// Stores an already-normalized plan, e.g. an uploaded JSON file.
    ///
    /// Any `passed` values in the upload are discarded.
    pub fn import_document(&self, document: &NormalizedDocument) -> ServiceResult<DocumentRecord> {
        logged("import_document", &format!("doc_id={}", document.id), || {
            if !document.has_identity() {
                return Err(NormalizeError::MissingIdentity.into());
            }
            self.store(document)
        })
    }

    /// Loads one document by id as a merged view.
    pub fn get_document(&self, doc_id: &str) -> ServiceResult<DocumentRecord> {
        logged("get_document", &format!("doc_id={doc_id}"), || self.load(doc_id))
    }

    /// Loads one document by display name as a merged view.
    pub fn get_document_by_name(&self, name: &str) -> ServiceResult<DocumentRecord> {
        // Display names are user text; only their length is logged.
        logged("get_document_by_name", &format!("name_len={}", name.len()), || {
            let record = self
                .documents
                .get_document_by_name(name.trim())?
                .ok_or_else(|| ServiceError::DocumentNotFound(name.to_string()))?;
            self.merged(record)
        })
    }

    /// Assigns a display name to a stored document.
    pub fn rename_document(&self, doc_id: &str, name: &str) -> ServiceResult<DocumentRecord> {
        logged("rename_document", &format!("doc_id={doc_id}"), || {
            let name = name.trim();
            if name.is_empty() {
                return Err(ServiceError::InvalidName(name.to_string()));
            }
            self.documents.set_document_name(doc_id, name)?;
            self.load(doc_id)
        })
    }

    /// Records a course status and returns the refreshed merged view.
    ///
    /// The code is stored in the same canonical form the normalizer gives
    /// `COD_ASIG`. The status is written even when the document or course
    /// does not exist (yet); it surfaces once a matching course appears.
    ///
    /// # Errors
    /// - `DocumentNotFound` when no document is stored under `doc_id`.
    pub fn set_course_status(
        &self,
        doc_id: &str,
        course_code: &str,
        passed: bool,
    ) -> ServiceResult<DocumentRecord> {
        let course_code = canonical_code(course_code);
        let subject = format!("doc_id={doc_id} course_code={course_code} passed={passed}");
        logged("set_course_status", &subject, || {
            self.statuses.set_status(doc_id, &course_code, passed)?;
            self.load(doc_id)
        })
    }

    fn store(&self, document: &NormalizedDocument) -> ServiceResult<DocumentRecord> {
        self.documents.save_document(document)?;
        self.load(&document.id)
    }

    fn load(&self, doc_id: &str) -> ServiceResult<DocumentRecord> {
        let record = self
            .documents
            .get_document(doc_id)?
            .ok_or_else(|| ServiceError::DocumentNotFound(doc_id.to_string()))?;
        self.merged(record)
    }

    fn merged(&self, record: DocumentRecord) -> ServiceResult<DocumentRecord> {
        let overlay = self.statuses.statuses_for(&record.document.id)?;
        Ok(DocumentRecord::new(
            merge_status(&record.document, &overlay),
            record.name,
        ))
    }
}

/// Runs one use-case between `start` and `ok`/`rejected`/`error` events.
///
/// Caller mistakes (bad input, unknown ids) are `rejected` at warn level;
/// storage failures are `error`.
fn logged<T>(
    event: &'static str,
    subject: &str,
    run: impl FnOnce() -> ServiceResult<T>,
) -> ServiceResult<T> {
    let started_at = Instant::now();
    info!("event={event} module=service status=start {subject}");

    let result = run();
    let duration_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => {
            info!("event={event} module=service status=ok {subject} duration_ms={duration_ms}")
        }
        Err(err) if err.is_rejection() => warn!(
            "event={event} module=service status=rejected {subject} duration_ms={duration_ms} reason={err}"
        ),
        Err(err) => error!(
            "event={event} module=service status=error {subject} duration_ms={duration_ms} error={err}"
        ),
    }
    result
}
