//! VAT settlement: fiscal debit from the sales book, fiscal credit from the purchase book.

use crate::model::{Amount, Period, Periodic, PurchaseRecord, SaleRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Whether a settlement leaves tax to pay or a credit to carry forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettlementStatus {
    /// Net payable is zero or more.
    #[serde(rename = "pending payment")]
    PendingPayment,
    /// Net payable is negative.
    #[serde(rename = "recoverable credit")]
    RecoverableCredit,
}

serde_plain::derive_display_from_serialize!(SettlementStatus);

/// The VAT position for a set of sales and purchases. Always recomputed from the books.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VatSettlement {
    /// Sum of the VAT charged on sales.
    pub fiscal_debit: Amount,
    /// Sum of the recoverable VAT paid on purchases.
    pub fiscal_credit: Amount,
    /// `fiscal_debit - fiscal_credit`.
    pub net_payable: Amount,
    /// Sum of sales net amounts.
    pub net_sales: Amount,
    /// Sum of purchase net amounts.
    pub net_purchases: Amount,
}

impl VatSettlement {
    pub fn status(&self) -> SettlementStatus {
        if self.net_payable.is_negative() {
            SettlementStatus::RecoverableCredit
        } else {
            SettlementStatus::PendingPayment
        }
    }
}

impl Display for VatSettlement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "fiscal debit {}, fiscal credit {}, net {} ({})",
            self.fiscal_debit,
            self.fiscal_credit,
            self.net_payable,
            self.status()
        )
    }
}

/// Computes the settlement for the given books. The result does not depend on the order of either
/// slice. Empty books settle to zero.
///
/// ```
/// # use contabook::vat::{compute_settlement, SettlementStatus};
/// let s = compute_settlement(&[], &[]);
/// assert!(s.net_payable.is_zero());
/// assert_eq!(s.status(), SettlementStatus::PendingPayment);
/// ```
pub fn compute_settlement(sales: &[SaleRecord], purchases: &[PurchaseRecord]) -> VatSettlement {
    settle(sales.iter(), purchases.iter())
}

fn settle<'a, S, P>(sales: S, purchases: P) -> VatSettlement
where
    S: Iterator<Item = &'a SaleRecord> + Clone,
    P: Iterator<Item = &'a PurchaseRecord> + Clone,
{
    let fiscal_debit: Amount = sales.clone().map(|s| s.vat_amount).sum();
    let fiscal_credit: Amount = purchases.clone().map(|p| p.vat_amount).sum();
    VatSettlement {
        fiscal_debit,
        fiscal_credit,
        net_payable: fiscal_debit - fiscal_credit,
        net_sales: sales.map(|s| s.net_amount).sum(),
        net_purchases: purchases.map(|p| p.net_amount).sum(),
    }
}

/// The settlement of one tax period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PeriodSettlement {
    pub period: Period,
    pub sales_count: usize,
    pub purchases_count: usize,
    pub settlement: VatSettlement,
    pub status: SettlementStatus,
}

/// Settles each period that appears in either book, in ascending period order.
pub fn settle_by_period(
    sales: &[SaleRecord],
    purchases: &[PurchaseRecord],
) -> Vec<PeriodSettlement> {
    let mut books: BTreeMap<Period, (Vec<&SaleRecord>, Vec<&PurchaseRecord>)> = BTreeMap::new();
    for s in sales {
        books.entry(s.period()).or_default().0.push(s);
    }
    for p in purchases {
        books.entry(p.period()).or_default().1.push(p);
    }
    books
        .into_iter()
        .map(|(period, (s, p))| {
            let settlement = settle(s.iter().copied(), p.iter().copied());
            PeriodSettlement {
                period,
                sales_count: s.len(),
                purchases_count: p.len(),
                status: settlement.status(),
                settlement,
            }
        })
        .collect()
}

/// The records that belong to `period`.
pub fn for_period<T>(records: &[T], period: Period) -> impl Iterator<Item = &T>
where
    T: Periodic,
{
    records.iter().filter(move |r| r.period() == period)
}
