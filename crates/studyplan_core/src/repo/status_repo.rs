//! Course status overlay contract and SQLite implementation.
//!
//! # Invariants
//! - One row per `(doc_id, course_code)`; writes are point upserts.
//! - `passed` is stored as 0/1; anything else is reported as invalid data.

use super::{RepoError, RepoResult};
use crate::model::overlay::StatusOverlay;
use rusqlite::{params, Connection};

/// Storage contract for the mutable course status overlay.
pub trait StatusOverlayStore {
    /// Replaces any status stored for this exact key. Idempotent.
    fn set_status(&self, document_id: &str, course_code: &str, passed: bool) -> RepoResult<()>;
    /// Returns every status stored for one document.
    fn statuses_for(&self, document_id: &str) -> RepoResult<StatusOverlay>;
}

/// SQLite-backed overlay store.
pub struct SqliteStatusRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStatusRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl StatusOverlayStore for SqliteStatusRepository<'_> {
    fn set_status(&self, document_id: &str, course_code: &str, passed: bool) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO course_status (doc_id, course_code, passed)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(doc_id, course_code) DO UPDATE SET
                passed = excluded.passed,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![document_id, course_code, bool_to_int(passed)],
        )?;
        Ok(())
    }

    fn statuses_for(&self, document_id: &str) -> RepoResult<StatusOverlay> {
        let mut stmt = self.conn.prepare(
            "SELECT course_code, passed
             FROM course_status
             WHERE doc_id = ?1
             ORDER BY course_code ASC;",
        )?;
        let mut rows = stmt.query([document_id])?;
        let mut overlay = StatusOverlay::new();

        while let Some(row) = rows.next()? {
            let course_code: String = row.get("course_code")?;
            let passed = match row.get::<_, i64>("passed")? {
                0 => false,
                1 => true,
                other => {
                    return Err(RepoError::InvalidData(format!(
                        "invalid passed value `{other}` in course_status.passed"
                    )));
                }
            };
            overlay.insert(course_code, passed);
        }

        Ok(overlay)
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
