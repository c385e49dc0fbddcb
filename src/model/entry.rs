use crate::model::{AccountingLine, Amount};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Classification of a journal entry's origin.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VoucherType {
    /// `TRASPASO`: internal transfer between accounts. This is the fallback for unknown values.
    #[default]
    Traspaso,
    /// `EGRESO`: money going out.
    Egreso,
    /// `INGRESO`: money coming in.
    Ingreso,
}

serde_plain::derive_display_from_serialize!(VoucherType);

impl VoucherType {
    /// Resolves a free-form sheet value. Accepts the Spanish name, the English name or the
    /// one-letter code in any case. Anything else, including an empty value, is `Traspaso`.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "EGRESO" | "EXPENSE" | "E" => VoucherType::Egreso,
            "INGRESO" | "INCOME" | "I" => VoucherType::Ingreso,
            "TRASPASO" | "TRANSFER" | "T" => VoucherType::Traspaso,
            _ => VoucherType::Traspaso,
        }
    }
}

impl FromStr for VoucherType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

/// A dated accounting transaction: a header and its lines in sheet order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct JournalEntry {
    /// Display sequence assigned during grouping, starting at 1. Not a stable identity.
    pub number: u32,
    pub voucher_type: VoucherType,
    /// The sheet's voucher number (`N. COMP`) from the entry's first row, if it had one.
    pub voucher_number: Option<String>,
    pub entry_date: NaiveDate,
    /// 1-12, derived from `entry_date`.
    pub month: u32,
    /// Derived from `entry_date`.
    pub year: i32,
    /// Free-text memo taken from the entry's first row.
    pub gloss: String,
    pub lines: Vec<AccountingLine>,
}

impl JournalEntry {
    /// Creates an entry with no lines. `month` and `year` are derived from `entry_date`.
    pub fn new(
        number: u32,
        voucher_type: VoucherType,
        voucher_number: Option<String>,
        entry_date: NaiveDate,
        gloss: impl Into<String>,
    ) -> Self {
        Self {
            number,
            voucher_type,
            voucher_number,
            entry_date,
            month: entry_date.month(),
            year: entry_date.year(),
            gloss: gloss.into(),
            lines: Vec::new(),
        }
    }

    /// The display number, e.g. `JE-000042`.
    pub fn entry_number(&self) -> String {
        format!("JE-{:06}", self.number)
    }

    pub fn total_debit(&self) -> Amount {
        self.lines.iter().map(|l| l.debit).sum()
    }

    pub fn total_credit(&self) -> Amount {
        self.lines.iter().map(|l| l.credit).sum()
    }

    /// True if debits equal credits, i.e. the line balances sum to zero.
    pub fn is_balanced(&self) -> bool {
        self.lines
            .iter()
            .map(AccountingLine::balance)
            .sum::<Amount>()
            .is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voucher_type_parse_lenient() {
        assert_eq!(VoucherType::parse_lenient("EGRESO"), VoucherType::Egreso);
        assert_eq!(VoucherType::parse_lenient(" ingreso "), VoucherType::Ingreso);
        assert_eq!(VoucherType::parse_lenient("income"), VoucherType::Ingreso);
        assert_eq!(VoucherType::parse_lenient("E"), VoucherType::Egreso);
        assert_eq!(VoucherType::parse_lenient("TRASPASO"), VoucherType::Traspaso);
        assert_eq!(VoucherType::parse_lenient("APERTURA"), VoucherType::Traspaso);
        assert_eq!(VoucherType::parse_lenient(""), VoucherType::Traspaso);
    }

    #[test]
    fn test_voucher_type_display() {
        assert_eq!(VoucherType::Egreso.to_string(), "EGRESO");
        assert_eq!(
            serde_json::to_string(&VoucherType::Traspaso).unwrap(),
            "\"TRASPASO\""
        );
    }

    #[test]
    fn test_entry_derives_month_and_year() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 31).unwrap();
        let entry = JournalEntry::new(3, VoucherType::Ingreso, None, date, "Venta");
        assert_eq!(entry.month, 7);
        assert_eq!(entry.year, 2024);
        assert_eq!(entry.entry_number(), "JE-000003");
    }

    #[test]
    fn test_entry_balance() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let mut entry = JournalEntry::new(1, VoucherType::Traspaso, None, date, "");
        entry.lines.push(AccountingLine {
            debit: Amount::from(100),
            ..Default::default()
        });
        assert!(!entry.is_balanced());
        entry.lines.push(AccountingLine {
            credit: Amount::from(100),
            ..Default::default()
        });
        assert!(entry.is_balanced());
        assert_eq!(entry.total_debit(), Amount::from(100));
        assert_eq!(entry.total_credit(), Amount::from(100));
    }

    #[test]
    fn test_entry_balance_across_lines() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let mut entry = JournalEntry::new(1, VoucherType::Ingreso, None, date, "");
        let line = |debit: i64, credit: i64| AccountingLine {
            debit: Amount::from(debit),
            credit: Amount::from(credit),
            ..Default::default()
        };
        entry.lines.push(line(1190, 0));
        entry.lines.push(line(0, 1000));
        assert_eq!(entry.lines[1].balance(), Amount::from(-1000));
        assert!(!entry.is_balanced());
        entry.lines.push(line(10, 200));
        assert!(entry.is_balanced());
    }
}
