use crate::model::Amount;
use serde::{Deserialize, Serialize};

/// One line of a journal entry in canonical form.
///
/// Both `debit` and `credit` may be non-zero on the same line. Nothing here enforces that only one
/// side is used, because the legacy sheets do not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AccountingLine {
    /// Chart-of-accounts code, e.g. `1101-01`.
    pub account_code: String,
    /// Account description, e.g. `Caja`.
    pub account_name: String,
    /// Debit side, never negative.
    pub debit: Amount,
    /// Credit side, never negative.
    pub credit: Amount,
    /// The sheet's running control column, when present and non-zero.
    pub control: Option<Amount>,
    /// The sheet's compensation column, when present and non-zero.
    pub compensation: Option<Amount>,
    /// Tax id (RUT) of the counterparty.
    pub third_party_tax_id: Option<String>,
    pub third_party_name: Option<String>,
    /// Supporting document type, e.g. `FACTURA`.
    pub document_type: Option<String>,
    pub document_number: Option<String>,
}

impl AccountingLine {
    /// Debit minus credit.
    pub fn balance(&self) -> Amount {
        self.debit - self.credit
    }
}
