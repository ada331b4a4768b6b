use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use rusqlite::Connection;

use super::{schema, SubmissionRepository};
use crate::error::{QsortError, Result};
use crate::models::SubmissionRecord;

/// Submissions in an embedded SQLite database.
#[derive(Clone)]
pub struct SqliteSubmissionStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSubmissionStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::with_connection(conn)
    }

    pub fn open_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        schema::run_migrations(&conn).map_err(|e| QsortError::Persistence(format!("{:#}", e)))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

impl SubmissionRepository for SqliteSubmissionStore {
    fn last_submission(&self, user: &str, version: &str) -> Result<u32> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let last: u32 = conn.query_row(
            "SELECT COALESCE(MAX(submission_number), 0) FROM submissions
             WHERE user_name = ? AND version = ?",
            (user, version),
            |row| row.get(0),
        )?;
        Ok(last)
    }

    fn append(&self, records: &[SubmissionRecord]) -> Result<()> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let now = Utc::now().to_rfc3339();

        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO submissions
                 (user_name, version, submission_number, column_number, project_name, recorded_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )?;
            for record in records {
                stmt.execute((
                    &record.user,
                    &record.version,
                    record.submission,
                    record.column as i64,
                    &record.project,
                    &now,
                ))?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn records(&self) -> Result<Vec<SubmissionRecord>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT user_name, version, submission_number, column_number, project_name
             FROM submissions ORDER BY id",
        )?;

        let records = stmt
            .query_map([], |row| {
                Ok(SubmissionRecord {
                    user: row.get(0)?,
                    version: row.get(1)?,
                    submission: row.get(2)?,
                    column: row.get::<_, i64>(3)? as usize,
                    project: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }
}
