//! Document repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist normalized documents keyed by `DOC_ID`.
//! - Maintain the optional display name outside the payload.
//!
//! # Invariants
//! - `save_document` strips every course status before writing.
//! - Re-saving a document replaces its payload but keeps its display name.
//! - `doc_id`, `faculty` and `program` columns are authoritative on read.

use super::{RepoError, RepoResult};
use crate::model::document::{DocumentRecord, NormalizedDocument};
use rusqlite::{params, Connection, Row};

const DOCUMENT_SELECT_SQL: &str = "SELECT
    doc_id,
    name,
    faculty,
    program,
    payload_json
FROM documents";

/// Repository interface for study plan documents.
pub trait DocumentRepository {
    /// Inserts or replaces the document stored under `document.id`.
    fn save_document(&self, document: &NormalizedDocument) -> RepoResult<()>;
    fn get_document(&self, doc_id: &str) -> RepoResult<Option<DocumentRecord>>;
    /// Returns the most recently updated document with this display name.
    fn get_document_by_name(&self, name: &str) -> RepoResult<Option<DocumentRecord>>;
    /// Sets the display name; `NotFound` when no document has this id.
    fn set_document_name(&self, doc_id: &str, name: &str) -> RepoResult<()>;
}

/// SQLite-backed document repository.
pub struct SqliteDocumentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDocumentRepository<'conn> {
    /// Wraps a migrated connection (see `db::open_db`).
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl DocumentRepository for SqliteDocumentRepository<'_> {
    fn save_document(&self, document: &NormalizedDocument) -> RepoResult<()> {
        if !document.has_identity() {
            return Err(RepoError::InvalidData(
                "document id must not be empty".to_string(),
            ));
        }

        let payload = serde_json::to_string(&document.without_status())?;
        self.conn.execute(
            "INSERT INTO documents (doc_id, name, faculty, program, payload_json)
             VALUES (?1, NULL, ?2, ?3, ?4)
             ON CONFLICT(doc_id) DO UPDATE SET
                faculty = excluded.faculty,
                program = excluded.program,
                payload_json = excluded.payload_json,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                document.id.as_str(),
                document.faculty.as_str(),
                document.program.as_str(),
                payload,
            ],
        )?;
        Ok(())
    }

    fn get_document(&self, doc_id: &str) -> RepoResult<Option<DocumentRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DOCUMENT_SELECT_SQL} WHERE doc_id = ?1;"))?;
        let mut rows = stmt.query([doc_id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_document_row(row)?)),
            None => Ok(None),
        }
    }

    fn get_document_by_name(&self, name: &str) -> RepoResult<Option<DocumentRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{DOCUMENT_SELECT_SQL}
             WHERE name = ?1
             ORDER BY updated_at DESC, doc_id ASC
             LIMIT 1;"
        ))?;
        let mut rows = stmt.query([name])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_document_row(row)?)),
            None => Ok(None),
        }
    }

    fn set_document_name(&self, doc_id: &str, name: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE documents
             SET
                name = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE doc_id = ?1;",
            params![doc_id, name],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(doc_id.to_string()));
        }
        Ok(())
    }
}

fn parse_document_row(row: &Row<'_>) -> RepoResult<DocumentRecord> {
    let doc_id: String = row.get("doc_id")?;
    let payload: String = row.get("payload_json")?;
    let mut document: NormalizedDocument = serde_json::from_str(&payload).map_err(|err| {
        RepoError::InvalidData(format!(
            "invalid payload for document `{doc_id}` in documents.payload_json: {err}"
        ))
    })?;

    document.id = doc_id;
    document.faculty = row.get("faculty")?;
    document.program = row.get("program")?;
    if document.plan.iter().any(|course| course.passed.is_some()) {
        return Err(RepoError::InvalidData(format!(
            "stored payload for document `{}` carries course status",
            document.id
        )));
    }

    Ok(DocumentRecord::new(document, row.get("name")?))
}

#[cfg(test)]
mod tests {
    use super::{DocumentRepository, SqliteDocumentRepository};
    use crate::db::open_db_in_memory;
    use crate::model::document::{Course, NormalizedDocument};
    use crate::repo::RepoError;

    #[test]
    fn saved_payload_never_carries_status() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteDocumentRepository::new(&conn);

        let mut document = NormalizedDocument::new("doc-1");
        let mut course = Course::with_code("101");
        course.passed = Some(true);
        document.plan.push(course);
        repo.save_document(&document).unwrap();

        let payload: String = conn
            .query_row(
                "SELECT payload_json FROM documents WHERE doc_id = 'doc-1';",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(!payload.contains("PASSED"));

        let loaded = repo.get_document("doc-1").unwrap().unwrap();
        assert_eq!(loaded.document.plan[0].passed, None);
    }

    #[test]
    fn empty_identity_is_rejected_before_sql() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteDocumentRepository::new(&conn);
        let err = repo.save_document(&NormalizedDocument::new(" ")).unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(_)));
    }

    #[test]
    fn corrupted_payload_is_reported() {
        let conn = open_db_in_memory().unwrap();
        conn.execute(
            "INSERT INTO documents (doc_id, payload_json) VALUES ('bad', '{not json');",
            [],
        )
        .unwrap();

        let repo = SqliteDocumentRepository::new(&conn);
        let err = repo.get_document("bad").unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(message) if message.contains("bad")));
    }
}
