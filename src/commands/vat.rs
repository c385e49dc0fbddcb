use crate::args::PeriodArgs;
use crate::commands::Out;
use crate::db::PeriodFilter;
use crate::error::{ErrorType, IntoResult};
use crate::vat::{compute_settlement, settle_by_period, PeriodSettlement, VatSettlement};
use crate::{Config, Result};
use serde::Serialize;

/// The settlements for the selected periods and their combined total.
#[derive(Debug, Clone, Serialize)]
pub struct VatReport {
    pub filter: PeriodFilter,
    pub periods: Vec<PeriodSettlement>,
    pub total: VatSettlement,
}

/// Computes the VAT settlement from the stored books. With both `--month` and `--year` this is a
/// single tax period; otherwise each matching period is settled separately and a total is added.
pub async fn vat(config: Config, period: PeriodArgs) -> Result<Out<VatReport>> {
    let filter = PeriodFilter::new(period.month(), period.year());
    let db = config.db();
    let sales = db.sales(filter).await.pub_result(ErrorType::Database)?;
    let purchases = db.purchases(filter).await.pub_result(ErrorType::Database)?;

    let report = VatReport {
        filter,
        periods: settle_by_period(&sales, &purchases),
        total: compute_settlement(&sales, &purchases),
    };

    let message = match report.periods.as_slice() {
        [] => format!("No sales or purchases {}", describe(filter)),
        [only] => format!("VAT settlement for {}: {}", only.period, only.settlement),
        many => {
            let mut lines = vec![format!("VAT settlements {}:", describe(filter))];
            lines.extend(many.iter().map(|p| format!("  {}: {}", p.period, p.settlement)));
            lines.push(format!("  total: {}", report.total));
            lines.join("\n")
        }
    };
    Ok(Out::new(message, report))
}

fn describe(filter: PeriodFilter) -> String {
    match (filter.month, filter.year) {
        (Some(m), Some(y)) => format!("in {y}-{m:02}"),
        (Some(m), None) => format!("in month {m} of any year"),
        (None, Some(y)) => format!("in {y}"),
        (None, None) => "on record".to_string(),
    }
}
