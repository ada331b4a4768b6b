//! Submission storage.
//!
//! [`SubmissionRepository`] is the append-only store; [`SubmissionRecorder`]
//! assigns submission numbers and turns a [`Submission`] into
//! [`SubmissionRecord`]s. The recorder serializes numbering and appending so
//! concurrent submissions never interleave or share a number.

mod csv_file;
mod schema;
mod sqlite;

use std::sync::{Arc, Mutex};

pub use self::csv_file::CsvSubmissionStore;
pub use self::sqlite::SqliteSubmissionStore;

use crate::error::{QsortError, Result};
use crate::models::{Submission, SubmissionRecord};

/// Append-only storage for submission records.
pub trait SubmissionRepository: Send + Sync {
    /// Highest submission number stored for this user and version, 0 if none.
    fn last_submission(&self, user: &str, version: &str) -> Result<u32>;

    /// Append all records of one submission.
    fn append(&self, records: &[SubmissionRecord]) -> Result<()>;

    /// Every stored record, in insertion order.
    fn records(&self) -> Result<Vec<SubmissionRecord>>;
}

#[derive(Clone)]
pub struct SubmissionRecorder {
    repository: Arc<dyn SubmissionRepository>,
    write_lock: Arc<Mutex<()>>,
}

impl SubmissionRecorder {
    pub fn new(repository: Arc<dyn SubmissionRepository>) -> Self {
        Self {
            repository,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn repository(&self) -> &Arc<dyn SubmissionRepository> {
        &self.repository
    }

    /// Persist a submission and return its number.
    ///
    /// The number is one more than the user's previous submission for the
    /// same version, so resubmitting adds a new sequence instead of
    /// overwriting the old one.
    pub fn record(&self, submission: &Submission) -> Result<u32> {
        if !submission.is_complete() {
            return Err(QsortError::Validation(
                "Missing required fields or empty submission".to_string(),
            ));
        }

        let user = submission.name.trim();
        let version = submission.version.trim();

        let _guard = self.write_lock.lock().expect("submission lock poisoned");
        let number = self.repository.last_submission(user, version)? + 1;

        let records: Vec<SubmissionRecord> = submission
            .sorted_data
            .iter()
            .map(|entry| SubmissionRecord {
                user: user.to_string(),
                version: version.to_string(),
                submission: number,
                column: entry.column,
                project: entry.project_name().to_string(),
            })
            .collect();

        self.repository.append(&records)?;

        tracing::info!(
            "Recorded submission {} for {} on version {} ({} cards)",
            number,
            user,
            version,
            records.len()
        );
        Ok(number)
    }
}
