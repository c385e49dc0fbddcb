//! Spreadsheet input. A `Workbook` is anything that can list its sheets and hand back the cells of
//! one of them; `read_sheet` turns those cells into `RawRow`s keyed by the sheet's header row.

mod csv_file;
#[cfg(test)]
mod memory;
mod xlsx;

pub use csv_file::CsvWorkbook;
#[cfg(test)]
pub(crate) use memory::MemoryWorkbook;
pub use xlsx::XlsxWorkbook;

use crate::model::{Cell, Header, RawRow};
use crate::Result;
use anyhow::bail;
use std::path::Path;
use tracing::{debug, trace};

/// The extensions opened with `XlsxWorkbook`.
const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods"];

/// Read access to the sheets of a workbook.
#[async_trait::async_trait]
pub trait Workbook: Send {
    /// The sheet names, in workbook order.
    fn sheet_names(&self) -> Vec<String>;

    /// Every row of the named sheet, header row included. Rows may have different lengths.
    async fn cells(&mut self, sheet: &str) -> Result<Vec<Vec<Cell>>>;
}

/// Opens the file at `path`, choosing the reader by extension.
pub async fn open(path: &Path) -> Result<Box<dyn Workbook>> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    debug!("Opening {} as '{ext}'", path.display());
    if ext == "csv" {
        Ok(Box::new(CsvWorkbook::open(path).await?))
    } else if SPREADSHEET_EXTENSIONS.contains(&ext.as_str()) {
        Ok(Box::new(XlsxWorkbook::open(path).await?))
    } else {
        bail!(
            "Unsupported file type '{}', expected csv or one of {}",
            path.display(),
            SPREADSHEET_EXTENSIONS.join(", ")
        )
    }
}

/// Chooses which sheet to read. An explicitly `requested` sheet must exist. Otherwise the
/// `preferred` sheet is used when the workbook has it, and the first sheet when it does not.
/// Names are compared trimmed and case-insensitively, and the workbook's own spelling is returned.
pub fn resolve_sheet(
    names: &[String],
    requested: Option<&str>,
    preferred: &str,
) -> Result<String> {
    let find = |wanted: &str| {
        let wanted = wanted.trim().to_lowercase();
        names
            .iter()
            .find(|n| n.trim().to_lowercase() == wanted)
            .cloned()
    };
    if let Some(requested) = requested {
        return match find(requested) {
            Some(name) => Ok(name),
            None => bail!(
                "Sheet '{requested}' not found, the workbook has: {}",
                names.join(", ")
            ),
        };
    }
    if let Some(name) = find(preferred) {
        return Ok(name);
    }
    match names.first() {
        Some(first) => {
            debug!("Sheet '{preferred}' not found, using the first sheet '{first}'");
            Ok(first.clone())
        }
        None => bail!("The workbook has no sheets"),
    }
}

/// Reads a sheet into rows keyed by its header row. The first non-blank row is the header row and
/// fully blank rows are skipped.
pub async fn read_sheet(workbook: &mut dyn Workbook, sheet: &str) -> Result<Vec<RawRow>> {
    let cells = workbook.cells(sheet).await?;
    Ok(to_rows(cells))
}

pub(crate) fn to_rows(cells: Vec<Vec<Cell>>) -> Vec<RawRow> {
    let mut grid = cells
        .into_iter()
        .skip_while(|row| row.iter().all(Cell::is_empty));
    let Some(header_row) = grid.next() else {
        return Vec::new();
    };
    let headers: Vec<Header> = header_row
        .iter()
        .map(|c| Header::from(c.text().unwrap_or_default()))
        .collect();
    trace!("Headers: {headers:?}");
    grid.map(|values| RawRow::from_headers(&headers, values))
        .filter(|row| !row.is_blank())
        .collect()
}
