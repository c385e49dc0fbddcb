use crate::commands::Out;
use crate::db::{Counts, ImportBatch};
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub home: PathBuf,
    pub schema_version: i32,
    pub counts: Counts,
    pub batches: Vec<ImportBatch>,
}

/// Reports the database schema version, table sizes and import history.
pub async fn status(config: Config) -> Result<Out<StatusReport>> {
    let db = config.db();
    let report = StatusReport {
        home: config.root().to_path_buf(),
        schema_version: db.schema_version().await.pub_result(ErrorType::Database)?,
        counts: db.counts().await.pub_result(ErrorType::Database)?,
        batches: db.batches().await.pub_result(ErrorType::Database)?,
    };

    let c = report.counts;
    let mut lines = vec![format!(
        "{} (schema v{}): {} journal entries, {} lines, {} purchases, {} sales from {} imports",
        report.home.display(),
        report.schema_version,
        c.journal_entries,
        c.journal_lines,
        c.purchases,
        c.sales,
        c.batches
    )];
    lines.extend(report.batches.iter().map(|b| {
        format!(
            "  {} {} '{}' sheet '{}' ({} rows)",
            b.imported_at, b.book, b.source_path, b.sheet, b.row_count
        )
    }));
    let message = lines.join("\n");
    Ok(Out::new(message, report))
}
