//! Runs rows from a sheet through the normalizer and, for the ledger, the grouper.

use crate::group::{group_entries, GroupBy};
use crate::model::{JournalEntry, PurchaseRecord, RawRow, SaleRecord};
use crate::normalize::Normalizer;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The three kinds of sheet that can be imported.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Book {
    /// The general ledger: one row per journal line.
    Ledger,
    /// The purchase book (`Libro de Compras`).
    Purchases,
    /// The sales book (`Libro de Ventas`).
    Sales,
}

serde_plain::derive_display_from_serialize!(Book);
serde_plain::derive_fromstr_from_deserialize!(Book);

/// The normalized content of one imported sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Imported {
    Ledger(Vec<JournalEntry>),
    Purchases(Vec<PurchaseRecord>),
    Sales(Vec<SaleRecord>),
}

impl Imported {
    pub fn book(&self) -> Book {
        match self {
            Imported::Ledger(_) => Book::Ledger,
            Imported::Purchases(_) => Book::Purchases,
            Imported::Sales(_) => Book::Sales,
        }
    }

    /// Journal entries for a ledger, records for a book.
    pub fn len(&self) -> usize {
        match self {
            Imported::Ledger(v) => v.len(),
            Imported::Purchases(v) => v.len(),
            Imported::Sales(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of source rows represented. For a ledger this is the number of journal lines.
    pub fn row_count(&self) -> usize {
        match self {
            Imported::Ledger(v) => v.iter().map(|e| e.lines.len()).sum(),
            _ => self.len(),
        }
    }
}

/// Normalizes ledger rows and groups them into journal entries.
pub fn ledger(rows: &[RawRow], normalizer: &Normalizer, group_by: GroupBy) -> Vec<JournalEntry> {
    let entries = group_entries(rows.iter().map(|r| normalizer.ledger_row(r)), group_by);
    debug!(
        "Grouped {} ledger rows into {} entries by {group_by}",
        rows.len(),
        entries.len()
    );
    entries
}

/// Normalizes purchase book rows.
pub fn purchases(rows: &[RawRow], normalizer: &Normalizer) -> Vec<PurchaseRecord> {
    rows.iter()
        .enumerate()
        .map(|(i, r)| normalizer.purchase(r, i))
        .collect()
}

/// Normalizes sales book rows.
pub fn sales(rows: &[RawRow], normalizer: &Normalizer) -> Vec<SaleRecord> {
    rows.iter()
        .enumerate()
        .map(|(i, r)| normalizer.sale(r, i))
        .collect()
}

/// Normalizes `rows` as the given `book`. `group_by` only applies to the ledger.
pub fn import_rows(
    book: Book,
    rows: &[RawRow],
    normalizer: &Normalizer,
    group_by: GroupBy,
) -> Imported {
    match book {
        Book::Ledger => Imported::Ledger(ledger(rows, normalizer, group_by)),
        Book::Purchases => Imported::Purchases(purchases(rows, normalizer)),
        Book::Sales => Imported::Sales(sales(rows, normalizer)),
    }
}
