use crate::args::ImportArgs;
use crate::commands::Out;
use crate::db::{Counts, ImportBatch};
use crate::error::{ErrorType, IntoResult};
use crate::import::{import_rows, Book, Imported};
use crate::source;
use crate::vat::{compute_settlement, VatSettlement};
use crate::{Config, Result};
use anyhow::anyhow;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// What an import read and, unless it was a dry run, stored.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub batch: ImportBatch,
    /// Journal entries for a ledger, records for a book.
    pub records: usize,
    /// Entry numbers of ledger entries whose debits and credits differ.
    pub unbalanced_entries: Vec<String>,
    /// The settlement of the imported book alone. Not set for ledgers.
    pub settlement: Option<VatSettlement>,
    pub dry_run: bool,
    /// The database snapshot taken before writing.
    pub backup: Option<PathBuf>,
    /// Table sizes after the import.
    pub counts: Option<Counts>,
}

/// Reads one sheet of `args.file()`, normalizes it as `args.book()` and stores the result in a
/// single transaction, after taking a backup of the database.
///
/// # Errors
/// - `import` if the file cannot be opened, the sheet does not exist or holds no data rows.
/// - `database` if the backup or the insert fails.
pub async fn import(config: Config, args: &ImportArgs) -> Result<Out<ImportReport>> {
    let book = args.book();
    let path = args.file();

    let mut workbook = source::open(path).await.pub_result(ErrorType::Import)?;
    let sheet = source::resolve_sheet(
        &workbook.sheet_names(),
        args.sheet(),
        config.sheet_for(book),
    )
    .pub_result(ErrorType::Import)?;
    let rows = source::read_sheet(workbook.as_mut(), &sheet)
        .await
        .pub_result(ErrorType::Import)?;
    if rows.is_empty() {
        return Err(anyhow!(
            "Sheet '{sheet}' in '{}' has no data rows",
            path.display()
        ))
        .pub_result(ErrorType::Import);
    }
    debug!("Read {} rows from sheet '{sheet}'", rows.len());

    let group_by = args.group_by().unwrap_or(config.group_by());
    let imported = import_rows(book, &rows, &config.normalizer(), group_by);

    let unbalanced_entries: Vec<String> = match &imported {
        Imported::Ledger(entries) => entries
            .iter()
            .filter(|e| !e.is_balanced())
            .map(|e| {
                warn!(
                    "{} on {} is unbalanced: debit {}, credit {}",
                    e.entry_number(),
                    e.entry_date,
                    e.total_debit(),
                    e.total_credit()
                );
                e.entry_number()
            })
            .collect(),
        _ => Vec::new(),
    };
    let settlement = match &imported {
        Imported::Ledger(_) => None,
        Imported::Purchases(p) => Some(compute_settlement(&[], p)),
        Imported::Sales(s) => Some(compute_settlement(s, &[])),
    };

    let batch = ImportBatch {
        id: uuid::Uuid::new_v4().to_string(),
        book,
        source_path: path.display().to_string(),
        sheet: sheet.clone(),
        group_by: (book == Book::Ledger).then_some(group_by),
        row_count: rows.len(),
        imported_at: chrono::Utc::now().to_rfc3339(),
    };
    let mut report = ImportReport {
        batch,
        records: imported.len(),
        unbalanced_entries,
        settlement,
        dry_run: args.dry_run(),
        backup: None,
        counts: None,
    };
    let summary = summarize(&imported, rows.len(), &sheet);

    if args.dry_run() {
        return Ok(Out::new(format!("Dry run: {summary}"), report));
    }

    let backup = config
        .backup()
        .copy_sqlite()
        .await
        .pub_result(ErrorType::Database)?;
    info!("Backed up the database to {}", backup.display());
    report.backup = Some(backup);

    config
        .db()
        .insert_import(&report.batch, &imported)
        .await
        .pub_result(ErrorType::Database)?;
    report.counts = Some(config.db().counts().await.pub_result(ErrorType::Database)?);

    Ok(Out::new(format!("Imported {summary}"), report))
}

fn summarize(imported: &Imported, rows: usize, sheet: &str) -> String {
    match imported {
        Imported::Ledger(entries) => format!(
            "{rows} ledger rows from '{sheet}' as {} journal entries",
            entries.len()
        ),
        Imported::Purchases(records) => {
            format!("{} purchase records from '{sheet}'", records.len())
        }
        Imported::Sales(records) => format!("{} sales records from '{sheet}'", records.len()),
    }
}
