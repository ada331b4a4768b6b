//! Data Source Adapter.
//!
//! The survey definition lives in a workbook with three sheets: `Teams`,
//! `Versions` and `Cards`. A [`DataSource`] hands back a fresh [`Workbook`]
//! snapshot on every call; nothing is cached between requests.

mod memory;
mod xlsx;

use std::fmt;

pub use memory::MemorySource;
pub use xlsx::XlsxSource;

use crate::error::{QsortError, Result};

pub const TEAMS_SHEET: &str = "Teams";
pub const VERSIONS_SHEET: &str = "Versions";
pub const CARDS_SHEET: &str = "Cards";

pub const TEAM_NAME: &str = "Team Name";
pub const VERSION_NAME: &str = "Version Name";
pub const VERSION: &str = "Version";
pub const PROJECT_NAME: &str = "Project Name";
pub const MW: &str = "MW";
pub const TECHNOLOGY: &str = "Technology";
pub const RTO: &str = "RTO";
pub const NTP: &str = "NTP";

/// Anything that can produce the survey workbook.
pub trait DataSource: Send + Sync {
    fn load(&self) -> Result<Workbook>;
}

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// Text form used for all comparisons: stringified, then trimmed.
    ///
    /// A numeric `5` and a text `" 5 "` normalize to the same value.
    pub fn normalized(&self) -> String {
        self.to_string().trim().to_string()
    }

    pub fn is_blank(&self) -> bool {
        self.normalized().is_empty()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => f.write_str(s),
            // f64 Display drops the fraction of whole numbers: 5.0 -> "5"
            Self::Number(n) => write!(f, "{}", n),
            Self::Bool(true) => f.write_str("TRUE"),
            Self::Bool(false) => f.write_str("FALSE"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// A sheet: a header row and the data rows beneath it.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new<H, S>(name: impl Into<String>, headers: H) -> Self
    where
        H: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            headers: headers
                .into_iter()
                .map(|h| h.into().trim().to_string())
                .collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_row<R, C>(mut self, cells: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: Into<CellValue>,
    {
        self.push_row(cells);
        self
    }

    /// Append a data row. Rows with no non-blank cells are skipped, as a
    /// spreadsheet reader would.
    pub fn push_row<R, C>(&mut self, cells: R)
    where
        R: IntoIterator<Item = C>,
        C: Into<CellValue>,
    {
        let row: Vec<CellValue> = cells.into_iter().map(Into::into).collect();
        if row.iter().any(|c| !c.is_blank()) {
            self.rows.push(row);
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a required column, or a schema error naming it.
    pub fn column(&self, header: &str) -> Result<usize> {
        self.find_column(header)
            .ok_or_else(|| QsortError::schema(&self.name, header))
    }

    pub fn find_column(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |cells| Row {
            headers: &self.headers,
            cells,
        })
    }
}

/// A borrowed data row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    headers: &'a [String],
    cells: &'a [CellValue],
}

impl<'a> Row<'a> {
    /// Cell at `index`; short rows read as empty.
    pub fn get(&self, index: usize) -> &'a CellValue {
        const EMPTY: &CellValue = &CellValue::Empty;
        self.cells.get(index).unwrap_or(EMPTY)
    }

    pub fn text(&self, index: usize) -> String {
        self.get(index).normalized()
    }

    /// Optional column as text, `None` when the column is absent or blank.
    pub fn text_opt(&self, index: Option<usize>) -> Option<String> {
        index.map(|i| self.text(i)).filter(|s| !s.is_empty())
    }

    /// Non-blank cells paired with their headers, in column order.
    pub fn entries(&self) -> impl Iterator<Item = (&'a str, &'a CellValue)> {
        self.headers
            .iter()
            .zip(self.cells.iter())
            .filter(|(h, c)| !h.is_empty() && !c.is_blank())
            .map(|(h, c)| (h.as_str(), c))
    }
}

/// The sheets of one workbook read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    tables: Vec<Table>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: Table) -> Self {
        self.push_table(table);
        self
    }

    /// Add a sheet, replacing any sheet with the same name.
    pub fn push_table(&mut self, table: Table) {
        match self.tables.iter_mut().find(|t| t.name == table.name) {
            Some(existing) => *existing = table,
            None => self.tables.push(table),
        }
    }

    /// A required sheet, or a data source error naming it.
    pub fn table(&self, name: &str) -> Result<&Table> {
        self.tables
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| QsortError::DataSource(format!("{} sheet not found", name)))
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }
}
