//! These structs provide the CLI interface for the contabook CLI.

use crate::group::GroupBy;
use crate::import::Book;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// contabook: imports legacy accounting spreadsheets and computes VAT settlements.
///
/// The general ledger sheet (`Hoja1`), the purchase book and the sales book are read from xlsx,
/// xls, ods or csv files, normalized, and stored in a local SQLite database in the data
/// directory. Journal entries are formed by grouping ledger rows, and the VAT settlement for any
/// month is computed from the stored books.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory, its config file and an empty database.
    ///
    /// This is the first command you should run. By default the data directory is
    /// $HOME/contabook; pass --home or set CONTABOOK_HOME to put it somewhere else.
    Init(InitArgs),
    /// Read a ledger, purchase book or sales book from a spreadsheet and store it.
    Import(ImportArgs),
    /// Compute the VAT settlement from the stored purchase and sales books.
    Vat(PeriodArgs),
    /// List the stored journal entries, optionally exporting them to CSV.
    Entries(ListArgs),
    /// List the stored purchase book, optionally exporting it to CSV.
    Purchases(ListArgs),
    /// List the stored sales book, optionally exporting it to CSV.
    Sales(ListArgs),
    /// Show the schema version, row counts and import history of the database.
    Status,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where contabook data and configuration is held. Defaults to ~/contabook
    #[arg(long, env = "CONTABOOK_HOME", default_value_t = default_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// (Not shown): Args for the `contabook init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// Entries whose date cannot be read are placed on January 1 of this year. Defaults to 2023.
    #[arg(long)]
    fallback_year: Option<i32>,
}

impl InitArgs {
    pub fn new(fallback_year: Option<i32>) -> Self {
        Self { fallback_year }
    }

    pub fn fallback_year(&self) -> Option<i32> {
        self.fallback_year
    }
}

/// (Not shown): Args for the `contabook import` command.
#[derive(Debug, Parser, Clone)]
pub struct ImportArgs {
    /// Which book the file holds.
    #[arg(value_enum)]
    book: Book,

    /// The spreadsheet to read: .xlsx, .xlsm, .xls, .xlsb, .ods or .csv
    file: PathBuf,

    /// The sheet to read. Defaults to the configured sheet name for the book, and then to the
    /// first sheet.
    #[arg(long)]
    sheet: Option<String>,

    /// How ledger rows are grouped into journal entries. Defaults to the configured mode.
    #[arg(long, value_enum)]
    group_by: Option<GroupBy>,

    /// Normalize and report without writing to the database.
    #[arg(long)]
    dry_run: bool,
}

impl ImportArgs {
    pub fn new(book: Book, file: impl Into<PathBuf>) -> Self {
        Self {
            book,
            file: file.into(),
            sheet: None,
            group_by: None,
            dry_run: false,
        }
    }

    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    pub fn with_group_by(mut self, group_by: GroupBy) -> Self {
        self.group_by = Some(group_by);
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn book(&self) -> Book {
        self.book
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn sheet(&self) -> Option<&str> {
        self.sheet.as_deref()
    }

    pub fn group_by(&self) -> Option<GroupBy> {
        self.group_by
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
}

/// (Not shown): Period selection for `contabook vat` and the listing commands.
#[derive(Debug, Default, Parser, Clone, Copy)]
pub struct PeriodArgs {
    /// Month number, 1 to 12.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,

    #[arg(long)]
    year: Option<i32>,
}

impl PeriodArgs {
    pub fn new(month: Option<u32>, year: Option<i32>) -> Self {
        Self { month, year }
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }
}

/// (Not shown): Args for `contabook entries`, `contabook purchases` and `contabook sales`.
#[derive(Debug, Default, Parser, Clone)]
pub struct ListArgs {
    #[clap(flatten)]
    period: PeriodArgs,

    /// Only list records containing this text, ignoring case. Entries are matched on gloss,
    /// account description, RUT and name; book records on name, RUT and folio.
    #[arg(long)]
    search: Option<String>,

    /// Write the listed records to this CSV file, under the column labels the importer reads.
    #[arg(long)]
    csv: Option<PathBuf>,
}

impl ListArgs {
    pub fn new(period: PeriodArgs, csv: Option<PathBuf>) -> Self {
        Self {
            period,
            search: None,
            csv,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn period(&self) -> PeriodArgs {
        self.period
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn csv(&self) -> Option<&Path> {
        self.csv.as_deref()
    }
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("contabook"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or CONTABOOK_HOME instead of relying on the default \
                contabook home directory. If you continue using the program right now, you may \
                have problems!",
            );
            PathBuf::from("contabook")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_import() {
        let args = Args::try_parse_from([
            "contabook",
            "--home",
            "/tmp/books",
            "import",
            "ledger",
            "libro.xlsx",
            "--sheet",
            "Hoja1",
            "--group-by",
            "voucher-number",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(args.common().home().path(), Path::new("/tmp/books"));
        let Command::Import(import) = args.command() else {
            panic!("expected import");
        };
        assert_eq!(import.book(), Book::Ledger);
        assert_eq!(import.file(), Path::new("libro.xlsx"));
        assert_eq!(import.sheet(), Some("Hoja1"));
        assert_eq!(import.group_by(), Some(GroupBy::VoucherNumber));
        assert!(import.dry_run());
    }

    #[test]
    fn test_parse_vat_and_entries() {
        let args =
            Args::try_parse_from(["contabook", "vat", "--month", "3", "--year", "2023"]).unwrap();
        let Command::Vat(period) = args.command() else {
            panic!("expected vat");
        };
        assert_eq!(period.month(), Some(3));
        assert_eq!(period.year(), Some(2023));

        let args = Args::try_parse_from(["contabook", "entries", "--csv", "out.csv"]).unwrap();
        let Command::Entries(entries) = args.command() else {
            panic!("expected entries");
        };
        assert_eq!(entries.period().month(), None);
        assert_eq!(entries.csv(), Some(Path::new("out.csv")));
        assert_eq!(entries.search(), None);
    }

    #[test]
    fn test_parse_books() {
        let args = Args::try_parse_from([
            "contabook",
            "purchases",
            "--year",
            "2023",
            "--search",
            "del sur",
            "--csv",
            "compras.csv",
        ])
        .unwrap();
        let Command::Purchases(list) = args.command() else {
            panic!("expected purchases");
        };
        assert_eq!(list.period().year(), Some(2023));
        assert_eq!(list.search(), Some("del sur"));
        assert_eq!(list.csv(), Some(Path::new("compras.csv")));

        let args = Args::try_parse_from(["contabook", "sales", "--month", "4"]).unwrap();
        let Command::Sales(list) = args.command() else {
            panic!("expected sales");
        };
        assert_eq!(list.period().month(), Some(4));
        assert!(list.csv().is_none());

        let args = Args::try_parse_from(["contabook", "entries", "--search", "caja"]).unwrap();
        let Command::Entries(list) = args.command() else {
            panic!("expected entries");
        };
        assert_eq!(list.search(), Some("caja"));
    }

    #[test]
    fn test_month_out_of_range() {
        assert!(Args::try_parse_from(["contabook", "vat", "--month", "13"]).is_err());
        assert!(Args::try_parse_from(["contabook", "import", "journal", "x.csv"]).is_err());
    }

    #[test]
    fn test_log_level() {
        let args =
            Args::try_parse_from(["contabook", "--log-level", "debug", "status"]).unwrap();
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
    }
}
