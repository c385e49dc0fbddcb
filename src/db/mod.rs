//! This module is responsible for reading, writing and managing the SQLite database.

mod migrations;

use crate::group::GroupBy;
use crate::import::{Book, Imported};
use crate::model::{
    AccountingLine, Amount, JournalEntry, Period, PurchaseRecord, SaleRecord, VoucherType,
};
use crate::Result;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone)]
pub(crate) struct Db {
    pool: SqlitePool,
}

/// One import run: which file and sheet were read, and how many rows they produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ImportBatch {
    pub id: String,
    pub book: Book,
    pub source_path: String,
    pub sheet: String,
    /// Only set for ledger imports.
    pub group_by: Option<GroupBy>,
    pub row_count: usize,
    /// RFC 3339 timestamp.
    pub imported_at: String,
}

/// Restricts queries to a month, a year, or both. The default matches everything.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodFilter {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl PeriodFilter {
    pub fn new(month: Option<u32>, year: Option<i32>) -> Self {
        Self { month, year }
    }

    pub fn matches(&self, period: Period) -> bool {
        self.month.is_none_or(|m| m == period.month) && self.year.is_none_or(|y| y == period.year)
    }

    fn month_param(&self) -> Option<i64> {
        self.month.map(i64::from)
    }

    fn year_param(&self) -> Option<i64> {
        self.year.map(i64::from)
    }
}

/// Row counts of the main tables.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Counts {
    pub batches: u64,
    pub journal_entries: u64,
    pub journal_lines: u64,
    pub purchases: u64,
    pub sales: u64,
}

impl Db {
    /// - Validates that there is a SQLite file at `path`
    /// - Connects to it
    /// - Brings the schema up to date, refusing schemas newer than this program knows
    pub(crate) async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            bail!("The SQLite file is missing '{}'", path.display());
        }
        let pool = connect(path, false).await?;
        let current = migrations::version(&pool).await?;
        let latest = migrations::latest_version();
        if current > latest {
            bail!(
                "The database schema is version {current} but this program only knows up to \
                {latest}"
            );
        }
        migrations::run(&pool, current, latest).await?;
        Ok(Self { pool })
    }

    /// - Validates that no file currently exists at `path`
    /// - Creates a new SQLite file at `path`
    /// - Initializes the database schema
    pub(crate) async fn init(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            bail!("A file already exists at '{}'", path.display());
        }
        let pool = connect(path, true).await?;
        migrations::bootstrap(&pool).await?;
        migrations::run(&pool, 0, migrations::latest_version()).await?;
        debug!("Created database at {}", path.display());
        Ok(Self { pool })
    }

    pub(crate) async fn schema_version(&self) -> Result<i32> {
        migrations::version(&self.pool).await
    }

    /// Stores one import run. Everything is written in a single transaction. Journal entries are
    /// renumbered to continue after the highest number already stored.
    pub(crate) async fn insert_import(&self, batch: &ImportBatch, imported: &Imported) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin import transaction")?;

        sqlx::query(
            "INSERT INTO import_batches \
            (id, book, source_path, sheet, group_by, row_count, imported_at) \
            VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&batch.id)
        .bind(batch.book.to_string())
        .bind(&batch.source_path)
        .bind(&batch.sheet)
        .bind(batch.group_by.map(|g| g.to_string()))
        .bind(i64::try_from(batch.row_count).unwrap_or(i64::MAX))
        .bind(&batch.imported_at)
        .execute(&mut *tx)
        .await
        .context("Failed to insert import batch")?;

        match imported {
            Imported::Ledger(entries) => insert_entries(&mut tx, &batch.id, entries).await?,
            Imported::Purchases(records) => insert_purchases(&mut tx, &batch.id, records).await?,
            Imported::Sales(records) => insert_sales(&mut tx, &batch.id, records).await?,
        }

        tx.commit()
            .await
            .context("Failed to commit import transaction")?;
        Ok(())
    }

    /// Journal entries with their lines, ordered by entry number and then line order.
    pub(crate) async fn journal_entries(&self, filter: PeriodFilter) -> Result<Vec<JournalEntry>> {
        let rows = sqlx::query(
            "SELECT id, number, voucher_type, voucher_number, entry_date, gloss \
            FROM journal_entries \
            WHERE (?1 IS NULL OR month = ?1) AND (?2 IS NULL OR year = ?2) \
            ORDER BY number, id",
        )
        .bind(filter.month_param())
        .bind(filter.year_param())
        .fetch_all(&self.pool)
        .await
        .context("Failed to query journal entries")?;

        let mut entries = Vec::with_capacity(rows.len());
        let mut index: HashMap<i64, usize> = HashMap::new();
        for row in &rows {
            let id: i64 = row.try_get("id")?;
            index.insert(id, entries.len());
            entries.push(JournalEntry::new(
                get_u32(row, "number")?,
                VoucherType::parse_lenient(&row.try_get::<String, _>("voucher_type")?),
                row.try_get("voucher_number")?,
                get_date(row, "entry_date")?,
                row.try_get::<String, _>("gloss")?,
            ));
        }

        let lines = sqlx::query(
            "SELECT l.entry_id, l.account_code, l.account_name, l.debit, l.credit, l.control, \
            l.compensation, l.third_party_tax_id, l.third_party_name, l.document_type, \
            l.document_number \
            FROM journal_entry_lines l JOIN journal_entries e ON e.id = l.entry_id \
            WHERE (?1 IS NULL OR e.month = ?1) AND (?2 IS NULL OR e.year = ?2) \
            ORDER BY l.entry_id, l.line_order",
        )
        .bind(filter.month_param())
        .bind(filter.year_param())
        .fetch_all(&self.pool)
        .await
        .context("Failed to query journal entry lines")?;

        for row in &lines {
            let entry_id: i64 = row.try_get("entry_id")?;
            let i = *index
                .get(&entry_id)
                .with_context(|| format!("Line refers to unknown entry {entry_id}"))?;
            entries[i].lines.push(AccountingLine {
                account_code: row.try_get("account_code")?,
                account_name: row.try_get("account_name")?,
                debit: get_amount(row, "debit")?,
                credit: get_amount(row, "credit")?,
                control: get_optional_amount(row, "control")?,
                compensation: get_optional_amount(row, "compensation")?,
                third_party_tax_id: row.try_get("third_party_tax_id")?,
                third_party_name: row.try_get("third_party_name")?,
                document_type: row.try_get("document_type")?,
                document_number: row.try_get("document_number")?,
            });
        }
        Ok(entries)
    }

    pub(crate) async fn purchases(&self, filter: PeriodFilter) -> Result<Vec<PurchaseRecord>> {
        let rows = sqlx::query(
            "SELECT * FROM purchase_book \
            WHERE (?1 IS NULL OR month = ?1) AND (?2 IS NULL OR year = ?2) \
            ORDER BY year, month, line_number, id",
        )
        .bind(filter.month_param())
        .bind(filter.year_param())
        .fetch_all(&self.pool)
        .await
        .context("Failed to query the purchase book")?;

        rows.iter()
            .map(|row| {
                Ok(PurchaseRecord {
                    period: get_period(row)?,
                    line_number: get_u32(row, "line_number")?,
                    document_type: row.try_get("document_type")?,
                    purchase_type: row.try_get("purchase_type")?,
                    counterparty_tax_id: row.try_get("supplier_tax_id")?,
                    counterparty_name: row.try_get("supplier_name")?,
                    folio: row.try_get("folio")?,
                    document_date: get_date(row, "document_date")?,
                    reception_date: get_optional_date(row, "reception_date")?,
                    acknowledgment_date: get_optional_date(row, "acknowledgment_date")?,
                    exempt_amount: get_amount(row, "exempt_amount")?,
                    net_amount: get_amount(row, "net_amount")?,
                    vat_amount: get_amount(row, "vat_amount")?,
                    fixed_asset_amount: get_amount(row, "fixed_asset_amount")?,
                    non_recoverable_vat: get_amount(row, "non_recoverable_vat")?,
                    total_amount: get_amount(row, "total_amount")?,
                })
            })
            .collect()
    }

    pub(crate) async fn sales(&self, filter: PeriodFilter) -> Result<Vec<SaleRecord>> {
        let rows = sqlx::query(
            "SELECT * FROM sales_book \
            WHERE (?1 IS NULL OR month = ?1) AND (?2 IS NULL OR year = ?2) \
            ORDER BY year, month, line_number, id",
        )
        .bind(filter.month_param())
        .bind(filter.year_param())
        .fetch_all(&self.pool)
        .await
        .context("Failed to query the sales book")?;

        rows.iter()
            .map(|row| {
                Ok(SaleRecord {
                    period: get_period(row)?,
                    line_number: get_u32(row, "line_number")?,
                    document_type: row.try_get("document_type")?,
                    sale_type: row.try_get("sale_type")?,
                    counterparty_tax_id: row.try_get("customer_tax_id")?,
                    counterparty_name: row.try_get("customer_name")?,
                    folio: row.try_get("folio")?,
                    document_date: get_date(row, "document_date")?,
                    exempt_amount: get_amount(row, "exempt_amount")?,
                    net_amount: get_amount(row, "net_amount")?,
                    vat_amount: get_amount(row, "vat_amount")?,
                    total_amount: get_amount(row, "total_amount")?,
                })
            })
            .collect()
    }

    /// Import runs, oldest first.
    pub(crate) async fn batches(&self) -> Result<Vec<ImportBatch>> {
        let rows = sqlx::query("SELECT * FROM import_batches ORDER BY imported_at, id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to query import batches")?;
        rows.iter()
            .map(|row| {
                let book: String = row.try_get("book")?;
                let group_by: Option<String> = row.try_get("group_by")?;
                let row_count: i64 = row.try_get("row_count")?;
                Ok(ImportBatch {
                    id: row.try_get("id")?,
                    book: Book::from_str(&book)
                        .with_context(|| format!("Unknown book '{book}' in import_batches"))?,
                    source_path: row.try_get("source_path")?,
                    sheet: row.try_get("sheet")?,
                    group_by: group_by
                        .map(|g| GroupBy::from_str(&g))
                        .transpose()
                        .context("Unknown group_by in import_batches")?,
                    row_count: usize::try_from(row_count).context("Negative row_count")?,
                    imported_at: row.try_get("imported_at")?,
                })
            })
            .collect()
    }

    pub(crate) async fn counts(&self) -> Result<Counts> {
        Ok(Counts {
            batches: self.count("import_batches").await?,
            journal_entries: self.count("journal_entries").await?,
            journal_lines: self.count("journal_entry_lines").await?,
            purchases: self.count("purchase_book").await?,
            sales: self.count("sales_book").await?,
        })
    }

    async fn count(&self, table: &'static str) -> Result<u64> {
        let row: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("Failed to count rows in {table}"))?;
        u64::try_from(row.0).context("Negative row count")
    }
}

async fn connect(path: &Path, create: bool) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(create)
        .foreign_keys(true);
    SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open SQLite database at {}", path.display()))
}

async fn insert_entries(
    tx: &mut Transaction<'_, Sqlite>,
    batch_id: &str,
    entries: &[JournalEntry],
) -> Result<()> {
    let (offset,): (i64,) = sqlx::query_as("SELECT COALESCE(MAX(number), 0) FROM journal_entries")
        .fetch_one(&mut **tx)
        .await
        .context("Failed to read the last entry number")?;

    for entry in entries {
        let entry_id = sqlx::query(
            "INSERT INTO journal_entries \
            (batch_id, number, voucher_type, voucher_number, entry_date, month, year, gloss) \
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(batch_id)
        .bind(offset + i64::from(entry.number))
        .bind(entry.voucher_type.to_string())
        .bind(&entry.voucher_number)
        .bind(entry.entry_date.format(DATE_FORMAT).to_string())
        .bind(i64::from(entry.month))
        .bind(i64::from(entry.year))
        .bind(&entry.gloss)
        .execute(&mut **tx)
        .await
        .with_context(|| format!("Failed to insert journal entry {}", entry.entry_number()))?
        .last_insert_rowid();

        for (order, line) in entry.lines.iter().enumerate() {
            sqlx::query(
                "INSERT INTO journal_entry_lines \
                (entry_id, line_order, account_code, account_name, debit, credit, control, \
                compensation, third_party_tax_id, third_party_name, document_type, \
                document_number) \
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(entry_id)
            .bind(i64::try_from(order).unwrap_or(i64::MAX))
            .bind(&line.account_code)
            .bind(&line.account_name)
            .bind(amount_text(line.debit))
            .bind(amount_text(line.credit))
            .bind(line.control.map(amount_text))
            .bind(line.compensation.map(amount_text))
            .bind(&line.third_party_tax_id)
            .bind(&line.third_party_name)
            .bind(&line.document_type)
            .bind(&line.document_number)
            .execute(&mut **tx)
            .await
            .with_context(|| format!("Failed to insert a line of {}", entry.entry_number()))?;
        }
    }
    debug!("Inserted {} journal entries", entries.len());
    Ok(())
}

async fn insert_purchases(
    tx: &mut Transaction<'_, Sqlite>,
    batch_id: &str,
    records: &[PurchaseRecord],
) -> Result<()> {
    for r in records {
        sqlx::query(
            "INSERT INTO purchase_book \
            (batch_id, month, year, line_number, document_type, purchase_type, supplier_tax_id, \
            supplier_name, folio, document_date, reception_date, acknowledgment_date, \
            exempt_amount, net_amount, vat_amount, fixed_asset_amount, non_recoverable_vat, \
            total_amount) \
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(batch_id)
        .bind(i64::from(r.period.month))
        .bind(i64::from(r.period.year))
        .bind(i64::from(r.line_number))
        .bind(&r.document_type)
        .bind(&r.purchase_type)
        .bind(&r.counterparty_tax_id)
        .bind(&r.counterparty_name)
        .bind(&r.folio)
        .bind(r.document_date.format(DATE_FORMAT).to_string())
        .bind(r.reception_date.map(|d| d.format(DATE_FORMAT).to_string()))
        .bind(r.acknowledgment_date.map(|d| d.format(DATE_FORMAT).to_string()))
        .bind(amount_text(r.exempt_amount))
        .bind(amount_text(r.net_amount))
        .bind(amount_text(r.vat_amount))
        .bind(amount_text(r.fixed_asset_amount))
        .bind(amount_text(r.non_recoverable_vat))
        .bind(amount_text(r.total_amount))
        .execute(&mut **tx)
        .await
        .with_context(|| format!("Failed to insert purchase line {}", r.line_number))?;
    }
    debug!("Inserted {} purchase records", records.len());
    Ok(())
}

async fn insert_sales(
    tx: &mut Transaction<'_, Sqlite>,
    batch_id: &str,
    records: &[SaleRecord],
) -> Result<()> {
    for r in records {
        sqlx::query(
            "INSERT INTO sales_book \
            (batch_id, month, year, line_number, document_type, sale_type, customer_tax_id, \
            customer_name, folio, document_date, exempt_amount, net_amount, vat_amount, \
            total_amount) \
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(batch_id)
        .bind(i64::from(r.period.month))
        .bind(i64::from(r.period.year))
        .bind(i64::from(r.line_number))
        .bind(&r.document_type)
        .bind(&r.sale_type)
        .bind(&r.counterparty_tax_id)
        .bind(&r.counterparty_name)
        .bind(&r.folio)
        .bind(r.document_date.format(DATE_FORMAT).to_string())
        .bind(amount_text(r.exempt_amount))
        .bind(amount_text(r.net_amount))
        .bind(amount_text(r.vat_amount))
        .bind(amount_text(r.total_amount))
        .execute(&mut **tx)
        .await
        .with_context(|| format!("Failed to insert sales line {}", r.line_number))?;
    }
    debug!("Inserted {} sales records", records.len());
    Ok(())
}

fn amount_text(a: Amount) -> String {
    a.value().normalize().to_string()
}

fn get_amount(row: &SqliteRow, column: &str) -> Result<Amount> {
    let s: String = row.try_get(column)?;
    Amount::from_str(&s).with_context(|| format!("Bad amount '{s}' in column {column}"))
}

fn get_optional_amount(row: &SqliteRow, column: &str) -> Result<Option<Amount>> {
    let s: Option<String> = row.try_get(column)?;
    s.map(|s| Amount::from_str(&s).with_context(|| format!("Bad amount '{s}' in column {column}")))
        .transpose()
}

fn get_date(row: &SqliteRow, column: &str) -> Result<NaiveDate> {
    let s: String = row.try_get(column)?;
    NaiveDate::parse_from_str(&s, DATE_FORMAT)
        .with_context(|| format!("Bad date '{s}' in column {column}"))
}

fn get_optional_date(row: &SqliteRow, column: &str) -> Result<Option<NaiveDate>> {
    let s: Option<String> = row.try_get(column)?;
    s.map(|s| {
        NaiveDate::parse_from_str(&s, DATE_FORMAT)
            .with_context(|| format!("Bad date '{s}' in column {column}"))
    })
    .transpose()
}

fn get_u32(row: &SqliteRow, column: &str) -> Result<u32> {
    let n: i64 = row.try_get(column)?;
    u32::try_from(n).with_context(|| format!("Value {n} in column {column} is out of range"))
}

fn get_period(row: &SqliteRow) -> Result<Period> {
    let month = get_u32(row, "month")?;
    let year: i64 = row.try_get("year")?;
    let year = i32::try_from(year).context("Year out of range")?;
    Period::new(month, year).with_context(|| format!("Bad month {month} in stored record"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::{ledger, purchases, sales};
    use crate::model::{Cell, RawRow};
    use crate::normalize::Normalizer;
    use tempfile::TempDir;

    fn batch(book: Book, row_count: usize) -> ImportBatch {
        ImportBatch {
            id: uuid::Uuid::new_v4().to_string(),
            book,
            source_path: "/tmp/libro.xlsx".to_string(),
            sheet: "Hoja1".to_string(),
            group_by: (book == Book::Ledger).then_some(GroupBy::TypeAndDate),
            row_count,
            imported_at: "2024-04-01T10:00:00+00:00".to_string(),
        }
    }

    fn ledger_rows() -> Vec<RawRow> {
        vec![
            RawRow::new(vec![
                ("TIPO COMP", Cell::from("INGRESO")),
                ("FECHA", Cell::from(45017.0)),
                ("GLOSA", Cell::from("Venta contado")),
                ("CODIGO", Cell::from("1101")),
                ("DEBE", Cell::from(1190.0)),
                ("CONTROL", Cell::from(3.0)),
                ("RUT", Cell::from("1-9")),
            ]),
            RawRow::new(vec![
                ("TIPO COMP", Cell::from("INGRESO")),
                ("FECHA", Cell::from(45017.0)),
                ("CODIGO", Cell::from("4101")),
                ("HABER", Cell::from(1000.0)),
            ]),
            RawRow::new(vec![
                ("TIPO COMP", Cell::from("INGRESO")),
                ("FECHA", Cell::from(45017.0)),
                ("CODIGO", Cell::from("2111")),
                ("HABER", Cell::from("190.5")),
            ]),
        ]
    }

    async fn test_db() -> (TempDir, Db) {
        let dir = TempDir::new().unwrap();
        let db = Db::init(dir.path().join("test.sqlite")).await.unwrap();
        (dir, db)
    }

    #[tokio::test]
    async fn test_init_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("contabook.sqlite");
        let db = Db::init(&path).await.unwrap();
        assert_eq!(db.schema_version().await.unwrap(), 1);
        assert!(Db::init(&path).await.is_err());

        let db = Db::load(&path).await.unwrap();
        assert_eq!(db.counts().await.unwrap(), Counts::default());
        assert!(Db::load(dir.path().join("missing.sqlite")).await.is_err());
    }

    #[tokio::test]
    async fn test_ledger_round_trip() {
        let (_dir, db) = test_db().await;
        let entries = ledger(&ledger_rows(), &Normalizer::default(), GroupBy::TypeAndDate);
        db.insert_import(&batch(Book::Ledger, 3), &Imported::Ledger(entries.clone()))
            .await
            .unwrap();

        let stored = db.journal_entries(PeriodFilter::default()).await.unwrap();
        assert_eq!(stored, entries);

        let april = db
            .journal_entries(PeriodFilter::new(Some(4), Some(2023)))
            .await
            .unwrap();
        assert_eq!(april.len(), 1);
        let may = db
            .journal_entries(PeriodFilter::new(Some(5), None))
            .await
            .unwrap();
        assert!(may.is_empty());

        let counts = db.counts().await.unwrap();
        assert_eq!(counts.batches, 1);
        assert_eq!(counts.journal_entries, 1);
        assert_eq!(counts.journal_lines, 3);
    }

    #[tokio::test]
    async fn test_entry_numbers_continue_across_imports() {
        let (_dir, db) = test_db().await;
        for _ in 0..2 {
            let entries = ledger(&ledger_rows(), &Normalizer::default(), GroupBy::TypeAndDate);
            db.insert_import(&batch(Book::Ledger, 3), &Imported::Ledger(entries))
                .await
                .unwrap();
        }
        let stored = db.journal_entries(PeriodFilter::default()).await.unwrap();
        let numbers: Vec<u32> = stored.iter().map(|e| e.number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(db.batches().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_books_round_trip() {
        let (_dir, db) = test_db().await;
        let normalizer = Normalizer::default();
        let sale_rows = vec![
            RawRow::new(vec![
                ("Mes", Cell::from(3.0)),
                ("Fecha Docto", Cell::from("2023-03-10")),
                ("Monto Neto", Cell::from(1000.0)),
                ("Monto IVA", Cell::from(190.0)),
            ]),
            RawRow::new(vec![
                ("Mes", Cell::from(4.0)),
                ("Fecha Docto", Cell::from("2023-04-10")),
                ("Monto IVA", Cell::from(19.0)),
            ]),
        ];
        let purchase_rows = vec![RawRow::new(vec![
            ("Mes", Cell::from(3.0)),
            ("Fecha Docto", Cell::from("2023-03-02")),
            ("Fecha Acuse", Cell::from("2023-03-05")),
            ("Monto IVA Recuperable", Cell::from(50.0)),
        ])];
        let s = sales(&sale_rows, &normalizer);
        let p = purchases(&purchase_rows, &normalizer);
        db.insert_import(&batch(Book::Sales, 2), &Imported::Sales(s.clone()))
            .await
            .unwrap();
        db.insert_import(&batch(Book::Purchases, 1), &Imported::Purchases(p.clone()))
            .await
            .unwrap();

        assert_eq!(db.sales(PeriodFilter::default()).await.unwrap(), s);
        assert_eq!(db.purchases(PeriodFilter::default()).await.unwrap(), p);

        let march = PeriodFilter::new(Some(3), Some(2023));
        assert_eq!(db.sales(march).await.unwrap().len(), 1);
        assert_eq!(db.purchases(march).await.unwrap().len(), 1);
        assert!(db
            .purchases(PeriodFilter::new(None, Some(2022)))
            .await
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_period_filter_matches() {
        let p = Period::new(3, 2023).unwrap();
        assert!(PeriodFilter::default().matches(p));
        assert!(PeriodFilter::new(Some(3), None).matches(p));
        assert!(PeriodFilter::new(None, Some(2023)).matches(p));
        assert!(!PeriodFilter::new(Some(4), Some(2023)).matches(p));
    }
}
