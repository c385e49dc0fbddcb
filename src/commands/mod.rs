//! Command handlers for the contabook CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod books;
mod entries;
mod import;
mod init;
mod status;
mod vat;

use crate::error::{ErrorType, IntoResult};
use crate::model::Cell;
use crate::{utils, Config, Result};
use anyhow::Context;
use serde::Serialize;
use std::fmt::Debug;
use std::path::Path;
use tracing::{debug, info};

pub use books::{purchases, sales, BookReport, BookTotals};
pub use entries::{entries, EntriesReport};
pub use import::{import, ImportReport};
pub use init::init;
pub use status::{status, StatusReport};
pub use vat::{vat, VatReport};

/// Loads the data directory for a command that needs one. Failures are `config` errors.
pub async fn load_config(home: &Path) -> Result<Config> {
    Config::load(home).await.pub_result(ErrorType::Config)
}

/// Writes `rows` under `headers` as a comma-separated file and returns the number of rows written.
async fn export_csv<I>(path: &Path, headers: &[&str], rows: I) -> Result<usize>
where
    I: IntoIterator<Item = Vec<Cell>>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(headers)
        .context("Unable to write the CSV header")?;
    let mut count = 0;
    for row in rows {
        let record: Vec<String> = row.iter().map(ToString::to_string).collect();
        writer
            .write_record(&record)
            .with_context(|| format!("Unable to write CSV row {}", count + 1))?;
        count += 1;
    }
    let data = writer
        .into_inner()
        .context("Unable to finish the CSV export")?;
    utils::write(path, data).await?;
    Ok(count)
}

/// The output type for a command. The command returns a message for the user and, optionally,
/// structured data describing what it did.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}
