use crate::model::Amount;
use anyhow::{bail, Context};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A tax period: a calendar month of a year.
///
/// Periods order by year and then by month, and display as `YYYY-MM`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Period {
    pub month: u32,
    pub year: i32,
}

impl Period {
    /// Returns `None` unless `month` is in 1-12.
    pub fn new(month: u32, year: i32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { month, year })
    }

    /// The period that contains `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            year: date.year(),
        }
    }
}

impl Ord for Period {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.year, self.month).cmp(&(other.year, other.month))
    }
}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = anyhow::Error;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((year, month)) = s.trim().split_once('-') else {
            bail!("Expected a period like 2024-03, got '{s}'");
        };
        let year: i32 = year
            .parse()
            .with_context(|| format!("Bad year in period '{s}'"))?;
        let month: u32 = month
            .parse()
            .with_context(|| format!("Bad month in period '{s}'"))?;
        match Period::new(month, year) {
            Some(p) => Ok(p),
            None => bail!("Month out of range in period '{s}'"),
        }
    }
}

/// Anything that belongs to a tax period.
pub trait Periodic {
    fn period(&self) -> Period;
}

/// One row of the purchase book (`Libro de Compras`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PurchaseRecord {
    pub period: Period,
    /// Position in the book, from the sheet's `Nro` column or the row index.
    pub line_number: u32,
    pub document_type: String,
    /// `Tipo Compra`, e.g. `Del Giro`.
    pub purchase_type: String,
    pub counterparty_tax_id: String,
    pub counterparty_name: String,
    pub folio: String,
    pub document_date: NaiveDate,
    pub reception_date: Option<NaiveDate>,
    pub acknowledgment_date: Option<NaiveDate>,
    pub exempt_amount: Amount,
    pub net_amount: Amount,
    /// Recoverable VAT. This is what counts as fiscal credit.
    pub vat_amount: Amount,
    pub fixed_asset_amount: Amount,
    pub non_recoverable_vat: Amount,
    pub total_amount: Amount,
}

impl Periodic for PurchaseRecord {
    fn period(&self) -> Period {
        self.period
    }
}

/// One row of the sales book (`Libro de Ventas`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SaleRecord {
    pub period: Period,
    pub line_number: u32,
    pub document_type: String,
    /// `Tipo Venta`.
    pub sale_type: String,
    pub counterparty_tax_id: String,
    pub counterparty_name: String,
    pub folio: String,
    pub document_date: NaiveDate,
    pub exempt_amount: Amount,
    pub net_amount: Amount,
    /// VAT charged. This is what counts as fiscal debit.
    pub vat_amount: Amount,
    pub total_amount: Amount,
}

impl Periodic for SaleRecord {
    fn period(&self) -> Period {
        self.period
    }
}
