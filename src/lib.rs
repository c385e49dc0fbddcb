//! contabook reads legacy accounting spreadsheets (a general ledger, a purchase book and a sales
//! book), normalizes their loosely labelled rows, groups ledger lines into journal entries and
//! computes VAT settlements.
//!
//! The core stages are pure functions:
//! - [`normalize`] turns a [`model::RawRow`] into canonical records, never failing.
//! - [`group::group_entries`] folds normalized ledger rows into [`model::JournalEntry`] values.
//! - [`vat::compute_settlement`] derives fiscal debit, fiscal credit and net payable.
//!
//! Around them, [`source`] reads workbooks, and the CLI [`commands`] store results in a SQLite
//! database inside the data directory described by [`Config`].

pub mod args;
mod backup;
pub mod commands;
mod config;
mod db;
mod error;
pub mod group;
pub mod import;
pub mod model;
pub mod normalize;
pub mod search;
pub mod source;
pub mod vat;
mod utils;


pub use config::Config;
pub use db::{Counts, ImportBatch, PeriodFilter};
pub use error::{error_type, Error, ErrorType, Result};
