use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory with its `config.json`, `.backups` directory and an empty SQLite
/// database.
///
/// # Arguments
/// - `home` - The directory that will be the root of data directory, e.g. `$HOME/contabook`
/// - `fallback_year` - The year whose January 1 replaces unreadable entry dates.
///
/// # Errors
/// - Returns an error if the directory is already initialized or any file operation fails.
pub async fn init(home: &Path, fallback_year: Option<i32>) -> Result<Out<()>> {
    let config = Config::create(home, fallback_year)
        .await
        .context("Unable to create the data directory and configs")
        .pub_result(ErrorType::Config)?;
    Ok(format!(
        "Successfully created the contabook directory at {}",
        config.root().display()
    )
    .into())
}
