//! Implements the `Workbook` trait for delimited text files.

use crate::model::Cell;
use crate::source::Workbook;
use crate::Result;
use anyhow::{bail, Context};
use std::path::Path;
use tracing::{debug, trace};

/// Candidate delimiters. On a tie the last one wins.
const DELIMITERS: &[u8] = b"\t;,";

/// A CSV file seen as a workbook with a single sheet named after the file stem.
///
/// Files that are not valid UTF-8 are decoded as Windows-1252, which is what spreadsheet programs
/// commonly write. The delimiter is whichever of `,`, `;` or tab splits the header line into the
/// most fields.
pub struct CsvWorkbook {
    name: String,
    content: String,
}

impl CsvWorkbook {
    pub async fn open(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read file at {}", path.display()))?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(Self::from_bytes(name, bytes))
    }

    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let content = match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(e) => {
                debug!("Input is not UTF-8, decoding as Windows-1252");
                let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(e.as_bytes());
                decoded.into_owned()
            }
        };
        Self {
            name: name.into(),
            content,
        }
    }

    fn delimiter(&self) -> u8 {
        let Some(header) = self.content.lines().find(|l| !l.trim().is_empty()) else {
            return b',';
        };
        DELIMITERS
            .iter()
            .copied()
            .max_by_key(|d| {
                csv::ReaderBuilder::new()
                    .delimiter(*d)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(header.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(0)
            })
            .unwrap_or(b',')
    }
}

#[async_trait::async_trait]
impl Workbook for CsvWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        vec![self.name.clone()]
    }

    async fn cells(&mut self, sheet: &str) -> Result<Vec<Vec<Cell>>> {
        if sheet.trim().to_lowercase() != self.name.trim().to_lowercase() {
            bail!("Sheet '{sheet}' not found, a CSV file only has '{}'", self.name);
        }
        let delimiter = self.delimiter();
        trace!("Reading '{}' with delimiter '{}'", self.name, delimiter as char);
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(self.content.as_bytes());
        let mut rows = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record.with_context(|| format!("Bad CSV record at line {}", i + 1))?;
            rows.push(
                record
                    .iter()
                    .map(|field| {
                        if field.trim().is_empty() {
                            Cell::Empty
                        } else {
                            Cell::from(field)
                        }
                    })
                    .collect(),
            );
        }
        Ok(rows)
    }
}
