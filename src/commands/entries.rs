use crate::args::ListArgs;
use crate::commands::{export_csv, Out};
use crate::db::PeriodFilter;
use crate::error::{ErrorType, IntoResult};
use crate::model::JournalEntry;
use crate::normalize::{fields, ledger_cells};
use crate::search::Search;
use crate::{Config, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// The stored journal entries matching a period and search, and where they were exported to.
#[derive(Debug, Clone, Serialize)]
pub struct EntriesReport {
    pub filter: PeriodFilter,
    pub search: Option<Search>,
    pub entries: Vec<JournalEntry>,
    pub csv: Option<PathBuf>,
}

/// Lists stored journal entries, one summary line each. With `--search` only entries whose gloss,
/// or any line's account description, RUT or name, contains the term are listed. With `--csv` the
/// entries are also written to a file with one row per journal line, using the same column labels
/// the ledger importer reads.
pub async fn entries(config: Config, args: &ListArgs) -> Result<Out<EntriesReport>> {
    let period = args.period();
    let filter = PeriodFilter::new(period.month(), period.year());
    let search = args.search().and_then(Search::new);
    let mut entries = config
        .db()
        .journal_entries(filter)
        .await
        .pub_result(ErrorType::Database)?;
    Search::retain(search.as_ref(), &mut entries);

    let lines: usize = entries.iter().map(|e| e.lines.len()).sum();
    let mut message = vec![format!(
        "Found {} journal entries with {lines} lines",
        entries.len()
    )];
    message.extend(entries.iter().map(|e| {
        format!(
            "  {} {} {:<8} {} debit {} credit {}{}",
            e.entry_number(),
            e.entry_date,
            e.voucher_type,
            e.gloss,
            e.total_debit(),
            e.total_credit(),
            if e.is_balanced() { "" } else { " (unbalanced)" }
        )
    }));

    if let Some(path) = args.csv() {
        let rows = entries
            .iter()
            .flat_map(|entry| entry.lines.iter().map(move |line| ledger_cells(entry, line)));
        let written = export_csv(path, &fields::ledger_headers(), rows)
            .await
            .pub_result(ErrorType::Request)?;
        message.push(format!("Wrote {written} rows to {}", path.display()));
    }

    let report = EntriesReport {
        filter,
        search,
        entries,
        csv: args.csv().map(Path::to_path_buf),
    };
    Ok(Out::new(message.join("\n"), report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{ImportArgs, PeriodArgs};
    use crate::commands::import;
    use crate::group::GroupBy;
    use crate::import::Book;
    use crate::test::TestEnv;
    use crate::utils;

    const LEDGER_CSV: &str = "\
TIPO COMP,N. COMP,FECHA,GLOSA,CODIGO,CTA DESCRIPCION,DEBE,HABER,RUT
TRASPASO,1,2023-01-01,Apertura,1101,Caja,1000,,
TRASPASO,1,2023-01-01,Apertura,3101,Capital,,1000,
INGRESO,2,2023-02-03,Venta,1101,Caja,1190,,76.543.210-9
INGRESO,2,2023-02-03,Venta,4101,Ventas,,1190,
";

    #[tokio::test]
    async fn test_entries_filter() {
        let env = TestEnv::new().await;
        let file = env.write_file("libro.csv", LEDGER_CSV).await;
        import(env.config(), &ImportArgs::new(Book::Ledger, &file))
            .await
            .unwrap();

        let out = entries(env.config(), &ListArgs::default())
            .await
            .unwrap();
        assert_eq!(out.structure().unwrap().entries.len(), 2);
        assert!(out.message().contains("JE-000001"));

        let feb = ListArgs::new(PeriodArgs::new(Some(2), Some(2023)), None);
        let out = entries(env.config(), &feb).await.unwrap();
        let report = out.structure().unwrap();
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].gloss, "Venta");
    }

    #[tokio::test]
    async fn test_entries_search() {
        let env = TestEnv::new().await;
        let file = env.write_file("libro.csv", LEDGER_CSV).await;
        import(env.config(), &ImportArgs::new(Book::Ledger, &file))
            .await
            .unwrap();

        let by = |term: &str| ListArgs::default().with_search(term);

        // The RUT is on one line of the second entry only.
        let out = entries(env.config(), &by("76.543")).await.unwrap();
        let report = out.structure().unwrap();
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].gloss, "Venta");
        assert_eq!(report.entries[0].lines.len(), 2);
        assert_eq!(report.search.as_ref().unwrap().term(), "76.543");

        let out = entries(env.config(), &by("CAPITAL")).await.unwrap();
        assert_eq!(out.structure().unwrap().entries[0].gloss, "Apertura");

        let out = entries(env.config(), &by("caja")).await.unwrap();
        assert_eq!(out.structure().unwrap().entries.len(), 2);

        let out = entries(env.config(), &by("apertura")).await.unwrap();
        assert_eq!(out.structure().unwrap().entries.len(), 1);

        let out = entries(env.config(), &by("nadie")).await.unwrap();
        assert!(out.structure().unwrap().entries.is_empty());
        assert!(out.message().starts_with("Found 0 journal entries"));

        let out = entries(env.config(), &by("  ")).await.unwrap();
        assert_eq!(out.structure().unwrap().entries.len(), 2);
    }

    #[tokio::test]
    async fn test_entries_csv_export_reimports() {
        let env = TestEnv::new().await;
        let file = env.write_file("libro.csv", LEDGER_CSV).await;
        import(env.config(), &ImportArgs::new(Book::Ledger, &file))
            .await
            .unwrap();

        let export = env.path("export.csv");
        let args = ListArgs::new(PeriodArgs::default(), Some(export.clone()));
        let out = entries(env.config(), &args).await.unwrap();
        let original = out.structure().unwrap().entries.clone();

        let text = utils::read(&export).await.unwrap();
        assert_eq!(text.lines().count(), 5);
        assert!(out.message().ends_with(&format!("Wrote 4 rows to {}", export.display())));

        let again = import(
            env.config(),
            &ImportArgs::new(Book::Ledger, &export)
                .with_group_by(GroupBy::VoucherNumber)
                .with_dry_run(true),
        )
        .await
        .unwrap();
        assert_eq!(again.structure().unwrap().records, original.len());
    }
}
