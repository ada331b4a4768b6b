//! Error types for the Q-sort service.
//!
//! [`QsortError`] is the service-level taxonomy: source data problems,
//! schema problems, caller mistakes and storage failures. [`SessionError`]
//! covers the caller-correctable failures of a [`crate::session::SortSession`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QsortError {
    /// The workbook could not be opened or an expected sheet is missing.
    #[error("Data source error: {0}")]
    DataSource(String),

    /// A sheet exists but lacks a required column.
    #[error("Schema error: column '{column}' missing in {table} sheet")]
    Schema { table: String, column: String },

    /// Bad or missing request parameters, or an incomplete sort.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The submission store could not be read or appended to.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl QsortError {
    pub fn schema(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::Schema {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Validation errors are the caller's to fix; everything else is ours.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for QsortError {
    fn from(e: std::io::Error) -> Self {
        Self::Persistence(e.to_string())
    }
}

impl From<csv::Error> for QsortError {
    fn from(e: csv::Error) -> Self {
        Self::Persistence(e.to_string())
    }
}

impl From<rusqlite::Error> for QsortError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Persistence(e.to_string())
    }
}

impl From<SessionError> for QsortError {
    fn from(e: SessionError) -> Self {
        Self::Validation(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, QsortError>;

/// Failures of sort session transitions. None of them change session state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("name required")]
    NameRequired,

    #[error("incomplete: {unplaced} cards still need to be placed")]
    Incomplete { unplaced: usize },

    #[error("no cards loaded")]
    NoCardsLoaded,

    #[error("unknown card: {0}")]
    UnknownCard(String),

    #[error("no slot at row {row}, column {column}")]
    UnknownSlot { row: usize, column: usize },

    #[error("duplicate card identifier: {0}")]
    DuplicateCard(String),
}
