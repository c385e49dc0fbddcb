//! Implements the `Workbook` trait using in-memory data for testing purposes.

use crate::model::Cell;
use crate::source::Workbook;
use crate::Result;
use anyhow::Context;

/// A workbook whose sheets are held in memory, in insertion order.
#[derive(Debug, Default, Clone)]
pub(crate) struct MemoryWorkbook {
    sheets: Vec<(String, Vec<Vec<Cell>>)>,
}

impl MemoryWorkbook {
    /// Adds a sheet. `cells` includes the header row.
    pub(crate) fn with_sheet(mut self, name: impl Into<String>, cells: Vec<Vec<Cell>>) -> Self {
        self.sheets.push((name.into(), cells));
        self
    }
}

#[async_trait::async_trait]
impl Workbook for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.clone()).collect()
    }

    async fn cells(&mut self, sheet: &str) -> Result<Vec<Vec<Cell>>> {
        self.sheets
            .iter()
            .find(|(name, _)| name == sheet)
            .map(|(_, cells)| cells.clone())
            .with_context(|| format!("Sheet '{sheet}' not found"))
    }
}
