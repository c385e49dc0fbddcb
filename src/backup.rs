//! Rotating snapshots of the SQLite file, taken before an import writes to it.

use crate::{utils, Config, Result};
use anyhow::Context;
use chrono::Local;
use std::path::PathBuf;

/// Prefix for SQLite backup files.
pub const SQLITE: &str = "contabook.sqlite";

/// Creates and rotates backup files in the `.backups` directory.
///
/// Create an instance via `Config::backup()` or `Backup::new()`.
#[derive(Debug, Clone)]
pub struct Backup {
    backups_dir: PathBuf,
    backup_copies: u32,
    sqlite_path: PathBuf,
}

impl Backup {
    pub fn new(config: &Config) -> Self {
        Self {
            backups_dir: config.backups().to_path_buf(),
            backup_copies: config.backup_copies(),
            sqlite_path: config.sqlite_path().to_path_buf(),
        }
    }

    /// Copies the SQLite database file to the backups directory.
    ///
    /// The filename format is `contabook.sqlite.YYYY-MM-DD-NNN`. Old copies are rotated away so
    /// that at most `backup_copies` remain.
    ///
    /// Returns the path to the created backup file.
    pub async fn copy_sqlite(&self) -> Result<PathBuf> {
        let date = today();
        let seq = self.next_sequence_number(SQLITE, &date).await?;
        let path = self.backups_dir.join(format!("{SQLITE}.{date}-{seq:03}"));

        utils::copy(&self.sqlite_path, &path).await?;
        self.rotate(SQLITE).await?;

        Ok(path)
    }

    /// Returns one more than the highest sequence number already used for `prefix` on `date`.
    async fn next_sequence_number(&self, prefix: &str, date: &str) -> Result<u32> {
        let mut max_seq: u32 = 0;

        let mut dir = utils::read_dir(&self.backups_dir).await?;
        while let Some(entry) = dir
            .next_entry()
            .await
            .context("Failed to read directory entry")?
        {
            let file_name = entry.file_name();
            if let Some(seq) = parse_sequence_number(&file_name.to_string_lossy(), prefix, date) {
                max_seq = max_seq.max(seq);
            }
        }

        Ok(max_seq + 1)
    }

    /// Deletes the oldest backups with `prefix` until only `backup_copies` remain.
    async fn rotate(&self, prefix: &str) -> Result<()> {
        let mut files: Vec<(PathBuf, String)> = Vec::new();

        let mut dir = utils::read_dir(&self.backups_dir).await?;
        while let Some(entry) = dir
            .next_entry()
            .await
            .context("Failed to read directory entry")?
        {
            let name = entry.file_name().to_string_lossy().to_string();
            if is_backup_file(&name, prefix) {
                files.push((entry.path(), name));
            }
        }

        // Names sort by date and then sequence number.
        files.sort_by(|a, b| a.1.cmp(&b.1));

        let to_delete = files.len().saturating_sub(self.backup_copies as usize);
        for (path, _) in files.into_iter().take(to_delete) {
            utils::remove(&path).await?;
        }

        Ok(())
    }
}

/// Today's date as YYYY-MM-DD.
fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Parses `NNN` out of `{prefix}.{date}-{NNN}`.
fn parse_sequence_number(filename: &str, prefix: &str, date: &str) -> Option<u32> {
    filename
        .strip_prefix(&format!("{prefix}.{date}-"))?
        .parse()
        .ok()
}

/// Matches `{prefix}.YYYY-MM-DD-NNN`.
fn is_backup_file(filename: &str, prefix: &str) -> bool {
    let Some(rest) = filename.strip_prefix(&format!("{prefix}.")) else {
        return false;
    };
    match rest.rsplit_once('-') {
        Some((date, seq)) => {
            chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
                && !seq.is_empty()
                && seq.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}
