use std::sync::{Arc, RwLock};

use super::{DataSource, Workbook};
use crate::error::Result;

/// A workbook held in memory. Used by tests and for embedding the service.
///
/// Clones share the same workbook, so [`MemorySource::replace`] is visible to
/// every holder, the way editing the spreadsheet file would be.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    workbook: Arc<RwLock<Workbook>>,
}

impl MemorySource {
    pub fn new(workbook: Workbook) -> Self {
        Self {
            workbook: Arc::new(RwLock::new(workbook)),
        }
    }

    pub fn replace(&self, workbook: Workbook) {
        *self.workbook.write().expect("workbook lock poisoned") = workbook;
    }
}

impl DataSource for MemorySource {
    fn load(&self) -> Result<Workbook> {
        Ok(self.workbook.read().expect("workbook lock poisoned").clone())
    }
}
