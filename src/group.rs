//! The entry grouper: folds normalized ledger rows into journal entries.

use crate::model::{JournalEntry, VoucherType};
use crate::normalize::LedgerRow;
use std::collections::HashMap;

/// Controls which rows are merged into the same journal entry.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    serde::Serialize,
    serde::Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum GroupBy {
    /// Default: rows with the same voucher type and the same raw date share an entry. Distinct
    /// vouchers posted on the same day of the same type are merged.
    #[default]
    TypeAndDate,
    /// Rows with the same voucher type and voucher number share an entry. Rows that have no
    /// voucher number are grouped by voucher type and raw date.
    VoucherNumber,
}

serde_plain::derive_display_from_serialize!(GroupBy);
serde_plain::derive_fromstr_from_deserialize!(GroupBy);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Key {
    Date(VoucherType, String),
    Voucher(VoucherType, String),
}

impl Key {
    fn new(row: &LedgerRow, group_by: GroupBy) -> Self {
        match (group_by, &row.voucher_number) {
            (GroupBy::VoucherNumber, Some(number)) => {
                Key::Voucher(row.voucher_type, number.clone())
            }
            _ => Key::Date(row.voucher_type, row.date_key.clone()),
        }
    }
}

/// Groups ledger rows into journal entries.
///
/// Entries are created in order of first appearance and numbered from 1. The first row of each
/// entry supplies its gloss, date and voucher number. Every row's line is appended to its entry in
/// arrival order, so the total number of lines always equals the number of rows.
pub fn group_entries<I>(rows: I, group_by: GroupBy) -> Vec<JournalEntry>
where
    I: IntoIterator<Item = LedgerRow>,
{
    let (entries, _) = rows.into_iter().fold(
        (Vec::<JournalEntry>::new(), HashMap::<Key, usize>::new()),
        |(mut entries, mut index), row| {
            let i = *index.entry(Key::new(&row, group_by)).or_insert_with(|| {
                let number = u32::try_from(entries.len() + 1).unwrap_or(u32::MAX);
                entries.push(JournalEntry::new(
                    number,
                    row.voucher_type,
                    row.voucher_number.clone(),
                    row.entry_date,
                    row.gloss.clone(),
                ));
                entries.len() - 1
            });
            entries[i].lines.push(row.line);
            (entries, index)
        },
    );
    entries
}
