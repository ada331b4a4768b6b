use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use super::SubmissionRepository;
use crate::error::{QsortError, Result};
use crate::models::SubmissionRecord;

const HEADER: &str = "User,Version,Submission,Column,Project\n";

/// Submissions as a delimited text file, one line per placed card.
#[derive(Debug, Clone)]
pub struct CsvSubmissionStore {
    path: PathBuf,
}

impl CsvSubmissionStore {
    /// Open the file, creating it (and its directory) with a header if needed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self { path: path.into() };
        store.ensure_header()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the header into a missing or empty file. An existing file must
    /// already start with it.
    fn ensure_header(&self) -> Result<()> {
        let empty = match fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => return Err(e.into()),
        };
        if !empty {
            return self.check_header();
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        tracing::info!("Creating submission file {}", self.path.display());
        fs::write(&self.path, HEADER)?;
        Ok(())
    }

    fn check_header(&self) -> Result<()> {
        let mut first_line = String::new();
        BufReader::new(File::open(&self.path)?).read_line(&mut first_line)?;

        let found = first_line.trim_end_matches(['\r', '\n']);
        let expected = HEADER.trim_end();
        if found != expected {
            return Err(QsortError::Persistence(format!(
                "{} does not start with the header {:?} (found {:?}); move it aside or convert it",
                self.path.display(),
                expected,
                found
            )));
        }
        Ok(())
    }
}

impl SubmissionRepository for CsvSubmissionStore {
    fn last_submission(&self, user: &str, version: &str) -> Result<u32> {
        let last = self
            .records()?
            .into_iter()
            .filter(|r| r.user == user && r.version == version)
            .map(|r| r.submission)
            .max()
            .unwrap_or(0);
        Ok(last)
    }

    fn append(&self, records: &[SubmissionRecord]) -> Result<()> {
        self.ensure_header()?;

        // Encode everything first so the submission hits the file in one write.
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        for record in records {
            writer.serialize(record)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| QsortError::Persistence(e.to_string()))?;

        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(&bytes)?;
        file.flush()?;
        Ok(())
    }

    fn records(&self) -> Result<Vec<SubmissionRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;
        let records = reader
            .deserialize()
            .collect::<std::result::Result<Vec<SubmissionRecord>, _>>()?;
        Ok(records)
    }
}
