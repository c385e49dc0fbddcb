//! Implements the `Workbook` trait for spreadsheet files using `calamine`.

use crate::model::Cell;
use crate::source::Workbook;
use crate::Result;
use anyhow::{anyhow, Context};
use calamine::{open_workbook_auto, Data, Reader, Sheets};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::trace;

type Inner = Sheets<BufReader<File>>;

/// A workbook read with `calamine` (xlsx, xlsm, xls, xlsb and ods). Sheets are read on a blocking
/// task when they are asked for.
pub struct XlsxWorkbook {
    path: PathBuf,
    sheet_names: Vec<String>,
    inner: Arc<Mutex<Inner>>,
}

impl XlsxWorkbook {
    pub async fn open(path: &Path) -> Result<Self> {
        let path = path.to_path_buf();
        let p = path.clone();
        let inner = tokio::task::spawn_blocking(move || open_workbook_auto(&p))
            .await
            .context("The workbook reader task failed")?
            .with_context(|| format!("Failed to open workbook {}", path.display()))?;
        let sheet_names = inner.sheet_names().to_vec();
        trace!("{} has sheets {sheet_names:?}", path.display());
        Ok(Self {
            path,
            sheet_names,
            inner: Arc::new(Mutex::new(inner)),
        })
    }
}

#[async_trait::async_trait]
impl Workbook for XlsxWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheet_names.clone()
    }

    async fn cells(&mut self, sheet: &str) -> Result<Vec<Vec<Cell>>> {
        trace!("cells for {sheet}");
        let inner = self.inner.clone();
        let name = sheet.to_string();
        let range = tokio::task::spawn_blocking(move || {
            let mut workbook = inner
                .lock()
                .map_err(|_| anyhow!("The workbook lock is poisoned"))?;
            workbook.worksheet_range(&name).map_err(anyhow::Error::from)
        })
        .await
        .context("The workbook reader task failed")?
        .with_context(|| format!("Failed to read sheet '{sheet}' of {}", self.path.display()))?;

        Ok(range
            .rows()
            .map(|row| row.iter().map(to_cell).collect())
            .collect())
    }
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_cell() {
        assert_eq!(to_cell(&Data::Empty), Cell::Empty);
        assert_eq!(to_cell(&Data::Int(7)), Cell::Number(7.0));
        assert_eq!(to_cell(&Data::Float(1.5)), Cell::Number(1.5));
        assert_eq!(to_cell(&Data::Bool(true)), Cell::from("TRUE"));
        assert_eq!(
            to_cell(&Data::String("Caja".to_string())),
            Cell::from("Caja")
        );
        assert_eq!(
            to_cell(&Data::DateTimeIso("2023-01-01T00:00:00".to_string())),
            Cell::from("2023-01-01T00:00:00")
        );
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = XlsxWorkbook::open(&dir.path().join("missing.xlsx")).await;
        assert!(result.is_err());
    }
}
