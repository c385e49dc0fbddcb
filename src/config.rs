//! Configuration file handling.
//!
//! The configuration file is stored at `$CONTABOOK_HOME/config.json` and holds the import defaults:
//! the fallback year for unparseable dates, the ledger grouping mode, the sheet name to look for in
//! each book, and how many database backups to keep.

use crate::backup::Backup;
use crate::db::Db;
use crate::group::GroupBy;
use crate::import::Book;
use crate::normalize::{Normalizer, DEFAULT_FALLBACK_YEAR};
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "contabook";
const CONFIG_VERSION: u8 = 1;
const BACKUP_COPIES: u32 = 5;
const BACKUPS: &str = ".backups";
const CONFIG_JSON: &str = "config.json";
const CONTABOOK_SQLITE: &str = "contabook.sqlite";

/// The `Config` object represents the data directory. You instantiate it by providing the path to
/// `$CONTABOOK_HOME` and from there it loads `config.json` and opens the database.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    backups: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    db: Db,
    sqlite_path: PathBuf,
}

impl Config {
    /// Creates the data directory, its `.backups` subdirectory, an initial `config.json` and an
    /// empty SQLite database.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of the data directory, e.g. `$HOME/contabook`
    /// - `fallback_year` - Entries with unreadable dates are placed on January 1 of this year.
    ///   Defaults to 2023.
    ///
    /// # Errors
    /// - Returns an error if the directory already holds a config file or a database, or if any
    ///   file operation fails.
    pub async fn create(dir: impl Into<PathBuf>, fallback_year: Option<i32>) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the contabook home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!("A config file already exists at '{}'", config_path.display());
        }

        let backups_dir = root.join(BACKUPS);
        utils::make_dir(&backups_dir).await?;

        let config_file = ConfigFile {
            fallback_year: fallback_year.unwrap_or(DEFAULT_FALLBACK_YEAR),
            ..ConfigFile::default()
        };

        let db_path = root.join(CONTABOOK_SQLITE);
        let db = Db::init(&db_path)
            .await
            .context("Unable to create SQLite DB")?;

        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            backups: backups_dir,
            config_path,
            config_file,
            db,
            sqlite_path: db_path,
        })
    }

    /// This will
    /// - validate that the home directory and the config file exist
    /// - load the config file
    /// - validate that the backups directory exists
    /// - open the database, migrating it if needed
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("Contabook home is missing, run `contabook init` first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let backups = root.join(BACKUPS);
        if !backups.is_dir() {
            bail!("The backups directory is missing '{}'", backups.display())
        }

        let db_path = root.join(CONTABOOK_SQLITE);
        let db = Db::load(&db_path)
            .await
            .context("Unable to load SQLite DB")?;

        Ok(Self {
            root,
            backups,
            config_path,
            config_file,
            db,
            sqlite_path: db_path,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub(crate) fn db(&self) -> &Db {
        &self.db
    }

    pub fn backups(&self) -> &Path {
        &self.backups
    }

    pub fn sqlite_path(&self) -> &Path {
        &self.sqlite_path
    }

    pub fn backup_copies(&self) -> u32 {
        self.config_file.backup_copies
    }

    pub fn fallback_year(&self) -> i32 {
        self.config_file.fallback_year
    }

    /// The grouping mode used when `import ledger` is not given `--group-by`.
    pub fn group_by(&self) -> GroupBy {
        self.config_file.group_by
    }

    /// The sheet to look for when importing `book` without `--sheet`.
    pub fn sheet_for(&self, book: Book) -> &str {
        let sheets = &self.config_file.sheets;
        match book {
            Book::Ledger => &sheets.ledger,
            Book::Purchases => &sheets.purchases,
            Book::Sales => &sheets.sales,
        }
    }

    pub fn normalizer(&self) -> Normalizer {
        Normalizer::with_fallback_year(self.fallback_year())
    }

    pub fn backup(&self) -> Backup {
        Backup::new(self)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "contabook",
///   "config_version": 1,
///   "backup_copies": 5,
///   "fallback_year": 2023,
///   "group_by": "type-and-date",
///   "sheets": {
///     "ledger": "Hoja1",
///     "purchases": "Libro compra ",
///     "sales": "Libro Ventas"
///   }
/// }
/// ```
///
/// Every field except `app_name` and `config_version` may be omitted.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "contabook"
    app_name: String,

    config_version: u8,

    /// Number of database backups to keep
    #[serde(default = "default_backup_copies")]
    backup_copies: u32,

    #[serde(default = "default_fallback_year")]
    fallback_year: i32,

    #[serde(default)]
    group_by: GroupBy,

    #[serde(default)]
    sheets: SheetNames,
}

/// The preferred sheet name for each book.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(default)]
struct SheetNames {
    ledger: String,
    purchases: String,
    sales: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            ledger: "Hoja1".to_string(),
            purchases: "Libro compra ".to_string(),
            sales: "Libro Ventas".to_string(),
        }
    }
}

fn default_backup_copies() -> u32 {
    BACKUP_COPIES
}

fn default_fallback_year() -> i32 {
    DEFAULT_FALLBACK_YEAR
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            backup_copies: BACKUP_COPIES,
            fallback_year: DEFAULT_FALLBACK_YEAR,
            group_by: GroupBy::default(),
            sheets: SheetNames::default(),
        }
    }
}

impl ConfigFile {
    /// Loads and validates the file at `path`.
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = utils::read(path).await?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version <= CONFIG_VERSION,
            "The config file version {} is newer than this program supports ({})",
            config.config_version,
            CONFIG_VERSION
        );

        Ok(config)
    }

    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}
