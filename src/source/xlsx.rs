use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, Range, Reader, Xlsx, XlsxError};

use super::{CellValue, DataSource, Table, Workbook};
use crate::error::{QsortError, Result};

/// Reads the survey workbook from an `.xlsx` file on every load.
#[derive(Debug, Clone)]
pub struct XlsxSource {
    path: PathBuf,
}

impl XlsxSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataSource for XlsxSource {
    fn load(&self) -> Result<Workbook> {
        let mut xlsx: Xlsx<_> = open_workbook(&self.path).map_err(|e: XlsxError| {
            QsortError::DataSource(format!("failed to open {}: {}", self.path.display(), e))
        })?;

        let mut workbook = Workbook::new();
        for name in xlsx.sheet_names() {
            let range = xlsx.worksheet_range(&name).map_err(|e| {
                QsortError::DataSource(format!("failed to read sheet {}: {}", name, e))
            })?;
            workbook.push_table(table_from_range(&name, &range));
        }

        tracing::debug!(
            "Loaded workbook {} ({} sheets)",
            self.path.display(),
            workbook.table_names().count()
        );
        Ok(workbook)
    }
}

/// First row of the used range is the header row.
fn table_from_range(name: &str, range: &Range<Data>) -> Table {
    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|header| header.iter().map(|c| cell_value(c).normalized()).collect())
        .unwrap_or_default();

    let mut table = Table::new(name, headers);
    for row in rows {
        table.push_row(row.iter().map(cell_value));
    }
    table
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        other => CellValue::Text(other.to_string()),
    }
}
