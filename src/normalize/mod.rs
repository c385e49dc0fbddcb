//! The ledger normalizer: turns loosely labelled spreadsheet rows into canonical records.
//!
//! Nothing in this module fails. A missing column yields an empty string, a zero amount or `None`;
//! a cell that does not parse is treated the same as a missing one; an unreadable date falls back
//! to the normalizer's fallback date.

mod date;
pub mod fields;

pub use date::{from_serial, parse_cell as parse_date, parse_text as parse_date_text};

use crate::model::{
    AccountingLine, Amount, Cell, JournalEntry, Period, PurchaseRecord, RawRow, SaleRecord,
    VoucherType,
};
use chrono::NaiveDate;
use std::str::FromStr;
use tracing::trace;

/// The default fallback year for unreadable dates.
pub const DEFAULT_FALLBACK_YEAR: i32 = 2023;

/// Normalizes the line-level fields of a ledger row.
///
/// # Example
///
/// ```
/// # use contabook::model::{Amount, RawRow};
/// # use contabook::normalize::normalize_line;
/// let row = RawRow::new(vec![("CODIGO ", "1101"), ("DEBE", "$1,500"), ("HABER", "abc")]);
/// let line = normalize_line(&row);
/// assert_eq!(line.account_code, "1101");
/// assert_eq!(line.debit, Amount::from(1500));
/// assert_eq!(line.credit, Amount::ZERO);
/// ```
pub fn normalize_line(row: &RawRow) -> AccountingLine {
    AccountingLine {
        account_code: text(row, fields::ACCOUNT_CODE),
        account_name: text(row, fields::ACCOUNT_NAME),
        debit: non_negative(amount(row, fields::DEBIT)),
        credit: non_negative(amount(row, fields::CREDIT)),
        control: optional_amount(row, fields::CONTROL),
        compensation: optional_amount(row, fields::COMPENSATION),
        third_party_tax_id: optional_text(row, fields::THIRD_PARTY_TAX_ID),
        third_party_name: optional_text(row, fields::THIRD_PARTY_NAME),
        document_type: optional_text(row, fields::DOCUMENT_TYPE),
        document_number: optional_text(row, fields::DOCUMENT_NUMBER),
    }
}

/// A normalized ledger row: the entry-level header fields plus the line itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRow {
    pub voucher_type: VoucherType,
    pub voucher_number: Option<String>,
    /// The date cell exactly as the sheet had it, rendered as text. Rows are grouped on this, not
    /// on the parsed date.
    pub date_key: String,
    pub entry_date: NaiveDate,
    pub gloss: String,
    pub line: AccountingLine,
}

/// Normalizes rows using the import's fallback date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer {
    fallback_date: NaiveDate,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            fallback_date: fallback_date(DEFAULT_FALLBACK_YEAR),
        }
    }
}

impl Normalizer {
    pub fn new(fallback_date: NaiveDate) -> Self {
        Self { fallback_date }
    }

    /// Uses January 1 of `year` as the fallback date.
    pub fn with_fallback_year(year: i32) -> Self {
        Self::new(fallback_date(year))
    }

    pub fn fallback_date(&self) -> NaiveDate {
        self.fallback_date
    }

    fn date(&self, row: &RawRow, aliases: &[&str]) -> NaiveDate {
        optional_date(row, aliases).unwrap_or(self.fallback_date)
    }

    /// Normalizes a ledger (`Hoja1`) row.
    pub fn ledger_row(&self, row: &RawRow) -> LedgerRow {
        let date_cell = row.lookup(fields::ENTRY_DATE);
        LedgerRow {
            voucher_type: VoucherType::parse_lenient(&text(row, fields::VOUCHER_TYPE)),
            voucher_number: optional_text(row, fields::VOUCHER_NUMBER),
            date_key: date_cell.and_then(Cell::text).unwrap_or_default(),
            entry_date: date_cell
                .and_then(parse_date)
                .unwrap_or(self.fallback_date),
            gloss: text(row, fields::GLOSS),
            line: normalize_line(row),
        }
    }

    /// Normalizes a purchase book row. `index` is the zero-based position of the row among the
    /// sheet's data rows.
    pub fn purchase(&self, row: &RawRow, index: usize) -> PurchaseRecord {
        let document_date = self.date(row, fields::DOCUMENT_DATE);
        PurchaseRecord {
            period: period(row, document_date),
            line_number: line_number(row, index),
            document_type: text(row, fields::BOOK_DOCUMENT_TYPE),
            purchase_type: text(row, fields::PURCHASE_TYPE),
            counterparty_tax_id: text(row, fields::SUPPLIER_TAX_ID),
            counterparty_name: text(row, fields::COUNTERPARTY_NAME),
            folio: text(row, fields::FOLIO),
            document_date,
            reception_date: optional_date(row, fields::RECEPTION_DATE),
            acknowledgment_date: optional_date(row, fields::ACKNOWLEDGMENT_DATE),
            exempt_amount: amount(row, fields::EXEMPT_AMOUNT),
            net_amount: amount(row, fields::NET_AMOUNT),
            vat_amount: amount(row, fields::RECOVERABLE_VAT),
            fixed_asset_amount: amount(row, fields::FIXED_ASSET_AMOUNT),
            non_recoverable_vat: amount(row, fields::NON_RECOVERABLE_VAT),
            total_amount: amount(row, fields::TOTAL_AMOUNT),
        }
    }

    /// Normalizes a sales book row. `index` is the zero-based position of the row among the
    /// sheet's data rows.
    pub fn sale(&self, row: &RawRow, index: usize) -> SaleRecord {
        let document_date = self.date(row, fields::DOCUMENT_DATE);
        SaleRecord {
            period: period(row, document_date),
            line_number: line_number(row, index),
            document_type: text(row, fields::BOOK_DOCUMENT_TYPE),
            sale_type: text(row, fields::SALE_TYPE),
            counterparty_tax_id: text(row, fields::CUSTOMER_TAX_ID),
            counterparty_name: text(row, fields::COUNTERPARTY_NAME),
            folio: text(row, fields::FOLIO),
            document_date,
            exempt_amount: amount(row, fields::EXEMPT_AMOUNT),
            net_amount: amount(row, fields::NET_AMOUNT),
            vat_amount: amount(row, fields::SALES_VAT),
            total_amount: amount(row, fields::TOTAL_AMOUNT),
        }
    }
}

/// Renders one journal line as ledger cells, in the order of `fields::ledger_headers()`.
pub fn ledger_cells(entry: &JournalEntry, line: &AccountingLine) -> Vec<Cell> {
    let opt = |s: &Option<String>| s.clone().map(Cell::Text).unwrap_or_default();
    let opt_amount = |a: &Option<Amount>| a.map(amount_cell).unwrap_or_default();
    vec![
        Cell::Text(entry.voucher_type.to_string()),
        opt(&entry.voucher_number),
        date_cell(entry.entry_date),
        Cell::Text(entry.gloss.clone()),
        Cell::Text(line.account_code.clone()),
        Cell::Text(line.account_name.clone()),
        amount_cell(line.debit),
        amount_cell(line.credit),
        opt_amount(&line.control),
        opt_amount(&line.compensation),
        opt(&line.document_type),
        opt(&line.document_number),
        opt(&line.third_party_tax_id),
        opt(&line.third_party_name),
    ]
}

/// Renders a purchase record as cells, in the order of `fields::purchase_headers()`.
pub fn purchase_cells(record: &PurchaseRecord) -> Vec<Cell> {
    vec![
        Cell::Text(record.period.month.to_string()),
        Cell::Text(record.line_number.to_string()),
        Cell::Text(record.document_type.clone()),
        Cell::Text(record.purchase_type.clone()),
        Cell::Text(record.counterparty_tax_id.clone()),
        Cell::Text(record.counterparty_name.clone()),
        Cell::Text(record.folio.clone()),
        date_cell(record.document_date),
        record.reception_date.map(date_cell).unwrap_or_default(),
        record.acknowledgment_date.map(date_cell).unwrap_or_default(),
        amount_cell(record.exempt_amount),
        amount_cell(record.net_amount),
        amount_cell(record.vat_amount),
        amount_cell(record.fixed_asset_amount),
        amount_cell(record.non_recoverable_vat),
        amount_cell(record.total_amount),
    ]
}

/// Renders a sales record as cells, in the order of `fields::sale_headers()`.
pub fn sale_cells(record: &SaleRecord) -> Vec<Cell> {
    vec![
        Cell::Text(record.period.month.to_string()),
        Cell::Text(record.line_number.to_string()),
        Cell::Text(record.document_type.clone()),
        Cell::Text(record.sale_type.clone()),
        Cell::Text(record.counterparty_tax_id.clone()),
        Cell::Text(record.counterparty_name.clone()),
        Cell::Text(record.folio.clone()),
        date_cell(record.document_date),
        amount_cell(record.exempt_amount),
        amount_cell(record.net_amount),
        amount_cell(record.vat_amount),
        amount_cell(record.total_amount),
    ]
}

fn date_cell(date: NaiveDate) -> Cell {
    Cell::Text(date.format("%Y-%m-%d").to_string())
}

fn amount_cell(a: Amount) -> Cell {
    Cell::Text(a.value().normalize().to_string())
}

fn fallback_date(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn text(row: &RawRow, aliases: &[&str]) -> String {
    optional_text(row, aliases).unwrap_or_default()
}

fn optional_text(row: &RawRow, aliases: &[&str]) -> Option<String> {
    row.lookup(aliases).and_then(Cell::text)
}

fn cell_amount(cell: &Cell) -> Option<Amount> {
    match cell {
        Cell::Empty => None,
        Cell::Number(n) => Amount::from_f64(*n),
        Cell::Text(s) => Amount::from_str(s).ok(),
    }
}

fn amount(row: &RawRow, aliases: &[&str]) -> Amount {
    row.lookup(aliases)
        .and_then(cell_amount)
        .unwrap_or_default()
}

fn optional_amount(row: &RawRow, aliases: &[&str]) -> Option<Amount> {
    row.lookup(aliases)
        .and_then(cell_amount)
        .filter(|a| !a.is_zero())
}

fn non_negative(a: Amount) -> Amount {
    if a.is_negative() {
        trace!("Zeroing negative ledger amount {a}");
        Amount::ZERO
    } else {
        a
    }
}

fn optional_date(row: &RawRow, aliases: &[&str]) -> Option<NaiveDate> {
    row.lookup(aliases).and_then(parse_date)
}

fn whole_number(cell: &Cell) -> Option<u32> {
    match cell {
        Cell::Number(n) if n.is_finite() && n.fract() == 0.0 && *n >= 0.0 => {
            u32::try_from(*n as u64).ok()
        }
        Cell::Text(s) => s.trim().parse().ok(),
        _ => None,
    }
}

const MONTH_NAMES: [&str; 12] = [
    "ENERO",
    "FEBRERO",
    "MARZO",
    "ABRIL",
    "MAYO",
    "JUNIO",
    "JULIO",
    "AGOSTO",
    "SEPTIEMBRE",
    "OCTUBRE",
    "NOVIEMBRE",
    "DICIEMBRE",
];

fn month(cell: &Cell) -> Option<u32> {
    let m = whole_number(cell).or_else(|| {
        let name = cell.text()?.to_uppercase();
        MONTH_NAMES
            .iter()
            .position(|n| *n == name || (name.len() >= 3 && n.starts_with(&name)))
            .map(|i| i as u32 + 1)
    })?;
    (1..=12).contains(&m).then_some(m)
}

/// The book period: `Mes` when it names a month, otherwise the document date's month. The year
/// always comes from the document date.
fn period(row: &RawRow, document_date: NaiveDate) -> Period {
    let of_date = Period::of(document_date);
    row.lookup(fields::MONTH)
        .and_then(month)
        .and_then(|m| Period::new(m, of_date.year))
        .unwrap_or(of_date)
}

fn line_number(row: &RawRow, index: usize) -> u32 {
    row.lookup(fields::BOOK_LINE)
        .and_then(whole_number)
        .filter(|n| *n > 0)
        .unwrap_or_else(|| u32::try_from(index + 1).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Header;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ledger(pairs: Vec<(&str, Cell)>) -> RawRow {
        RawRow::new(pairs)
    }

    #[test]
    fn test_unparseable_debit_is_zero() {
        let line = normalize_line(&ledger(vec![("DEBE", "abc".into())]));
        assert_eq!(line.debit, Amount::ZERO);
    }

    #[test]
    fn test_empty_row_defaults() {
        let line = normalize_line(&RawRow::default());
        assert_eq!(line, AccountingLine::default());
        assert_eq!(line.debit, Amount::ZERO);
        assert_eq!(line.account_code, "");
        assert!(line.control.is_none());
        assert!(line.third_party_tax_id.is_none());
    }

    #[test]
    fn test_full_ledger_line() {
        let row = ledger(vec![
            ("TIPO COMP", "EGRESO".into()),
            ("N. COMP", 12.0.into()),
            ("FECHA", 44927.0.into()),
            ("GLOSA", "Pago proveedor".into()),
            ("CODIGO ", "2101-01".into()),
            ("CTA DESCRIPCION", "Proveedores".into()),
            ("DEBE", 119000.0.into()),
            ("HABER", Cell::Empty),
            ("CONTROL", 0.0.into()),
            ("COMPENSACION", "1,500".into()),
            ("TIPO DOC", "FACTURA".into()),
            ("N DOC", 5531.0.into()),
            ("RUT", "76.123.456-7".into()),
            ("NOMBRE", "Comercial Sur Ltda".into()),
        ]);
        let r = Normalizer::default().ledger_row(&row);
        assert_eq!(r.voucher_type, VoucherType::Egreso);
        assert_eq!(r.voucher_number.as_deref(), Some("12"));
        assert_eq!(r.date_key, "44927");
        assert_eq!(r.entry_date, ymd(2023, 1, 1));
        assert_eq!(r.gloss, "Pago proveedor");

        let line = r.line;
        assert_eq!(line.account_code, "2101-01");
        assert_eq!(line.account_name, "Proveedores");
        assert_eq!(line.debit, Amount::from(119000));
        assert_eq!(line.credit, Amount::ZERO);
        assert_eq!(line.control, None);
        assert_eq!(line.compensation, Some(Amount::from(1500)));
        assert_eq!(line.document_type.as_deref(), Some("FACTURA"));
        assert_eq!(line.document_number.as_deref(), Some("5531"));
        assert_eq!(line.third_party_tax_id.as_deref(), Some("76.123.456-7"));
        assert_eq!(line.third_party_name.as_deref(), Some("Comercial Sur Ltda"));
    }

    #[test]
    fn test_negative_ledger_amounts_are_zeroed() {
        let line = normalize_line(&ledger(vec![
            ("DEBE", "-500".into()),
            ("HABER", "(20)".into()),
        ]));
        assert_eq!(line.debit, Amount::ZERO);
        assert_eq!(line.credit, Amount::ZERO);
    }

    #[test]
    fn test_mixed_debit_and_credit_preserved() {
        let line = normalize_line(&ledger(vec![
            ("DEBE", 100.0.into()),
            ("HABER", 40.0.into()),
        ]));
        assert_eq!(line.debit, Amount::from(100));
        assert_eq!(line.credit, Amount::from(40));
    }

    #[test]
    fn test_unreadable_date_uses_fallback() {
        let row = ledger(vec![("FECHA", "not-a-date".into())]);
        let r = Normalizer::default().ledger_row(&row);
        assert_eq!(r.entry_date, ymd(2023, 1, 1));
        assert_eq!(r.date_key, "not-a-date");

        let r = Normalizer::with_fallback_year(2021).ledger_row(&row);
        assert_eq!(r.entry_date, ymd(2021, 1, 1));
    }

    #[test]
    fn test_missing_date_uses_fallback() {
        let r = Normalizer::default().ledger_row(&RawRow::default());
        assert_eq!(r.entry_date, ymd(2023, 1, 1));
        assert_eq!(r.date_key, "");
        assert_eq!(r.voucher_type, VoucherType::Traspaso);
    }

    #[test]
    fn test_serial_date() {
        let row = ledger(vec![("FECHA", 44927.0.into())]);
        let r = Normalizer::with_fallback_year(1999).ledger_row(&row);
        assert_eq!(r.entry_date, ymd(2023, 1, 1));
    }

    #[test]
    fn test_renormalizing_a_canonical_row_is_stable() {
        let row = ledger(vec![
            ("TIPO COMP", "INGRESO".into()),
            ("FECHA", "15/03/2023".into()),
            ("GLOSA", "Venta".into()),
            ("CODIGO", "1101".into()),
            ("CTA DESCRIPCION", "Caja".into()),
            ("DEBE", "1.234,5".into()),
            ("CONTROL", 10.0.into()),
            ("RUT", "1-9".into()),
        ]);
        let normalizer = Normalizer::default();
        let first = normalizer.ledger_row(&row);
        let entry = JournalEntry::new(
            1,
            first.voucher_type,
            first.voucher_number.clone(),
            first.entry_date,
            first.gloss.clone(),
        );

        let headers: Vec<Header> = fields::ledger_headers()
            .into_iter()
            .map(Header::from)
            .collect();
        let canonical = RawRow::from_headers(&headers, ledger_cells(&entry, &first.line));
        let second = normalizer.ledger_row(&canonical);

        assert_eq!(second.line, first.line);
        assert_eq!(second.voucher_type, first.voucher_type);
        assert_eq!(second.entry_date, first.entry_date);
        assert_eq!(second.gloss, first.gloss);
    }

    #[test]
    fn test_purchase_row() {
        let row = RawRow::new(vec![
            ("Mes", Cell::from(3.0)),
            ("Nro", Cell::from(7.0)),
            ("Tipo Doc", Cell::from("33")),
            ("Tipo Compra", Cell::from("Del Giro")),
            ("RUT Proveedor", Cell::from("76.543.210-K")),
            ("Razon Social", Cell::from("Insumos SpA")),
            ("Folio", Cell::from(1001.0)),
            ("Fecha Docto", Cell::from("2024-03-04")),
            ("Fecha Recepcion", Cell::from(45356.0)),
            ("Fecha Acuse", Cell::Empty),
            ("Monto Exento", Cell::from(0.0)),
            ("Monto Neto", Cell::from(100000.0)),
            ("Monto IVA Recuperable", Cell::from(19000.0)),
            ("Monto Neto Activo Fijo", Cell::Empty),
            ("Monto Iva No Recuperable", Cell::from("x")),
            ("Monto Total", Cell::from(119000.0)),
        ]);
        let p = Normalizer::default().purchase(&row, 0);
        assert_eq!(p.period, Period::new(3, 2024).unwrap());
        assert_eq!(p.line_number, 7);
        assert_eq!(p.document_type, "33");
        assert_eq!(p.purchase_type, "Del Giro");
        assert_eq!(p.counterparty_tax_id, "76.543.210-K");
        assert_eq!(p.counterparty_name, "Insumos SpA");
        assert_eq!(p.folio, "1001");
        assert_eq!(p.document_date, ymd(2024, 3, 4));
        assert_eq!(p.reception_date, Some(ymd(2024, 3, 5)));
        assert_eq!(p.acknowledgment_date, None);
        assert_eq!(p.net_amount, Amount::from(100000));
        assert_eq!(p.vat_amount, Amount::from(19000));
        assert_eq!(p.fixed_asset_amount, Amount::ZERO);
        assert_eq!(p.non_recoverable_vat, Amount::ZERO);
        assert_eq!(p.total_amount, Amount::from(119000));
    }

    #[test]
    fn test_sale_row_defaults() {
        let row = RawRow::new(vec![
            ("Rut cliente", "12.345.678-5"),
            ("Fecha Docto", "garbage"),
            ("Monto IVA", "1.900,00"),
        ]);
        let s = Normalizer::with_fallback_year(2022).sale(&row, 4);
        assert_eq!(s.line_number, 5);
        assert_eq!(s.document_date, ymd(2022, 1, 1));
        assert_eq!(s.period, Period::new(1, 2022).unwrap());
        assert_eq!(s.counterparty_tax_id, "12.345.678-5");
        assert_eq!(s.vat_amount, Amount::from(1900));
        assert_eq!(s.total_amount, Amount::ZERO);
        assert_eq!(s.net_amount, Amount::ZERO);
        assert_eq!(s.sale_type, "");
    }

    #[test]
    fn test_book_month_column() {
        let date_only = RawRow::new(vec![("Fecha Docto", "2024-06-30")]);
        let s = Normalizer::default().sale(&date_only, 0);
        assert_eq!(s.period, Period::new(6, 2024).unwrap());

        let named = RawRow::new(vec![("Mes", "Julio"), ("Fecha Docto", "2024-06-30")]);
        let s = Normalizer::default().sale(&named, 0);
        assert_eq!(s.period, Period::new(7, 2024).unwrap());

        let bogus = RawRow::new(vec![("Mes", "14"), ("Fecha Docto", "2024-06-30")]);
        let s = Normalizer::default().sale(&bogus, 0);
        assert_eq!(s.period, Period::new(6, 2024).unwrap());
    }
}
