use crate::args::ListArgs;
use crate::commands::{export_csv, Out};
use crate::db::PeriodFilter;
use crate::error::{ErrorType, IntoResult};
use crate::model::{Amount, Cell, PurchaseRecord, SaleRecord};
use crate::normalize::{fields, purchase_cells, sale_cells};
use crate::search::{Search, Searchable};
use crate::{Config, Result};
use serde::Serialize;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

/// The stored book records matching a period and search, their totals, and where they were
/// exported to.
#[derive(Debug, Clone, Serialize)]
pub struct BookReport<R>
where
    R: Serialize + Clone + Debug,
{
    pub filter: PeriodFilter,
    pub search: Option<Search>,
    pub records: Vec<R>,
    pub totals: BookTotals,
    pub csv: Option<PathBuf>,
}

/// Column sums over the listed records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BookTotals {
    pub net: Amount,
    pub vat: Amount,
    pub total: Amount,
}

/// Lists the stored purchase book. `--search` matches supplier name, RUT and folio.
pub async fn purchases(
    config: Config,
    args: &ListArgs,
) -> Result<Out<BookReport<PurchaseRecord>>> {
    let filter = period_filter(args);
    let records = config
        .db()
        .purchases(filter)
        .await
        .pub_result(ErrorType::Database)?;
    list(filter, records, args).await
}

/// Lists the stored sales book. `--search` matches customer name, RUT and folio.
pub async fn sales(config: Config, args: &ListArgs) -> Result<Out<BookReport<SaleRecord>>> {
    let filter = period_filter(args);
    let records = config
        .db()
        .sales(filter)
        .await
        .pub_result(ErrorType::Database)?;
    list(filter, records, args).await
}

/// What the listing needs from a purchase or sales record.
trait BookRecord: Searchable + Serialize + Clone + Debug {
    const NOUN: &'static str;
    fn headers() -> Vec<&'static str>;
    fn cells(&self) -> Vec<Cell>;
    fn totals(&self) -> BookTotals;
    fn summary(&self) -> String;
}

impl BookRecord for PurchaseRecord {
    const NOUN: &'static str = "purchases";

    fn headers() -> Vec<&'static str> {
        fields::purchase_headers()
    }

    fn cells(&self) -> Vec<Cell> {
        purchase_cells(self)
    }

    fn totals(&self) -> BookTotals {
        BookTotals {
            net: self.net_amount,
            vat: self.vat_amount,
            total: self.total_amount,
        }
    }

    fn summary(&self) -> String {
        format!(
            "  {} #{} {} {} {} folio {} net {} VAT {} total {}",
            self.period,
            self.line_number,
            self.document_date,
            self.counterparty_tax_id,
            self.counterparty_name,
            self.folio,
            self.net_amount,
            self.vat_amount,
            self.total_amount
        )
    }
}

impl BookRecord for SaleRecord {
    const NOUN: &'static str = "sales";

    fn headers() -> Vec<&'static str> {
        fields::sale_headers()
    }

    fn cells(&self) -> Vec<Cell> {
        sale_cells(self)
    }

    fn totals(&self) -> BookTotals {
        BookTotals {
            net: self.net_amount,
            vat: self.vat_amount,
            total: self.total_amount,
        }
    }

    fn summary(&self) -> String {
        format!(
            "  {} #{} {} {} {} folio {} net {} VAT {} total {}",
            self.period,
            self.line_number,
            self.document_date,
            self.counterparty_tax_id,
            self.counterparty_name,
            self.folio,
            self.net_amount,
            self.vat_amount,
            self.total_amount
        )
    }
}

fn period_filter(args: &ListArgs) -> PeriodFilter {
    let period = args.period();
    PeriodFilter::new(period.month(), period.year())
}

async fn list<R>(
    filter: PeriodFilter,
    mut records: Vec<R>,
    args: &ListArgs,
) -> Result<Out<BookReport<R>>>
where
    R: BookRecord,
{
    let search = args.search().and_then(Search::new);
    Search::retain(search.as_ref(), &mut records);

    let totals = records
        .iter()
        .map(BookRecord::totals)
        .fold(BookTotals::default(), |acc, t| BookTotals {
            net: acc.net + t.net,
            vat: acc.vat + t.vat,
            total: acc.total + t.total,
        });

    let mut message = vec![format!("Found {} {}", records.len(), R::NOUN)];
    message.extend(records.iter().map(BookRecord::summary));
    if !records.is_empty() {
        message.push(format!(
            "  totals: net {} VAT {} total {}",
            totals.net, totals.vat, totals.total
        ));
    }

    if let Some(path) = args.csv() {
        let written = export_csv(path, &R::headers(), records.iter().map(BookRecord::cells))
            .await
            .pub_result(ErrorType::Request)?;
        message.push(format!("Wrote {written} rows to {}", path.display()));
    }

    let report = BookReport {
        filter,
        search,
        records,
        totals,
        csv: args.csv().map(Path::to_path_buf),
    };
    Ok(Out::new(message.join("\n"), report))
}
