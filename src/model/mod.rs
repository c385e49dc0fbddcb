//! Types that represent the core data model, such as `JournalEntry` and `SaleRecord`.
mod amount;
mod book;
mod cell;
mod entry;
mod line;

pub use amount::{Amount, AmountError};
pub use book::{Period, Periodic, PurchaseRecord, SaleRecord};
pub use cell::{Cell, Header, RawRow};
pub use entry::{JournalEntry, VoucherType};
pub use line::AccountingLine;
