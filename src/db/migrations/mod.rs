//! Database schema migrations.
//!
//! Migration files live next to this module as `migration_NN_up.sql`, which takes the schema from
//! version `NN-1` to `NN`, and `migration_NN_down.sql`, which takes it back.

use anyhow::{bail, Context};
use sqlx::{Executor, SqlitePool};
use tracing::debug;

use crate::Result;

struct Migration {
    /// The schema version after running `up_sql`.
    version: i32,
    up_sql: &'static str,
    down_sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    up_sql: include_str!("migration_01_up.sql"),
    down_sql: include_str!("migration_01_down.sql"),
}];

/// The schema version this build of the program expects.
pub(crate) fn latest_version() -> i32 {
    MIGRATIONS.iter().map(|m| m.version).max().unwrap_or(0)
}

/// Creates the `schema_version` table at version 0. The table must not exist yet.
pub(crate) async fn bootstrap(pool: &SqlitePool) -> Result<()> {
    sqlx::query("CREATE TABLE schema_version (version INTEGER NOT NULL)")
        .execute(pool)
        .await
        .context("Failed to create schema_version table")?;
    sqlx::query("INSERT INTO schema_version (version) VALUES (0)")
        .execute(pool)
        .await
        .context("Failed to insert initial schema version")?;
    Ok(())
}

/// Reads the current schema version.
pub(crate) async fn version(pool: &SqlitePool) -> Result<i32> {
    let row: (i32,) = sqlx::query_as("SELECT MAX(version) FROM schema_version")
        .fetch_one(pool)
        .await
        .context("Failed to query schema version")?;
    Ok(row.0)
}

/// Moves the schema from `current_ver` to `target_ver`, one migration at a time, up or down.
/// Each step runs in its own transaction together with its `schema_version` update. Nothing runs
/// unless every step in between is available.
pub(crate) async fn run(pool: &SqlitePool, current_ver: i32, target_ver: i32) -> Result<()> {
    if current_ver == target_ver {
        debug!("Schema already at version {target_ver}");
        return Ok(());
    }

    validate_migrations(current_ver, target_ver)?;

    if current_ver < target_ver {
        for version in (current_ver + 1)..=target_ver {
            let migration = find(version)?;
            debug!("Running migration {version:02} (up)");
            run_single_migration(pool, migration.up_sql, version).await?;
        }
    } else {
        for version in (target_ver + 1..=current_ver).rev() {
            let migration = find(version)?;
            debug!("Running migration {version:02} (down)");
            run_single_migration(pool, migration.down_sql, version - 1).await?;
        }
    }

    debug!("Schema now at version {target_ver}");
    Ok(())
}

fn find(version: i32) -> Result<&'static Migration> {
    MIGRATIONS
        .iter()
        .find(|m| m.version == version)
        .with_context(|| format!("Migration {version} not found"))
}

async fn run_single_migration(pool: &SqlitePool, sql: &str, new_version: i32) -> Result<()> {
    let mut tx = pool
        .begin()
        .await
        .context("Failed to begin migration transaction")?;

    // Migration files hold several statements.
    tx.execute(sql)
        .await
        .context("Failed to execute migration SQL")?;

    sqlx::query("DELETE FROM schema_version")
        .execute(&mut *tx)
        .await
        .context("Failed to clear schema_version")?;

    sqlx::query("INSERT INTO schema_version (version) VALUES (?)")
        .bind(new_version)
        .execute(&mut *tx)
        .await
        .context("Failed to update schema_version")?;

    tx.commit()
        .await
        .context("Failed to commit migration transaction")?;

    Ok(())
}

fn validate_migrations(current_version: i32, target_version: i32) -> Result<()> {
    let (start, end) = if current_version < target_version {
        (current_version + 1, target_version)
    } else {
        (target_version + 1, current_version)
    };

    for version in start..=end {
        if !MIGRATIONS.iter().any(|m| m.version == version) {
            bail!(
                "Migration {version} is missing, cannot migrate from version {current_version} \
                to {target_version}"
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use tempfile::TempDir;

    const TABLES: &[&str] = &[
        "import_batches",
        "journal_entries",
        "journal_entry_lines",
        "purchase_book",
        "sales_book",
    ];

    async fn create_test_db() -> Result<(TempDir, SqlitePool)> {
        let temp_dir = TempDir::new().context("Failed to create temp dir")?;
        let options = SqliteConnectOptions::new()
            .filename(temp_dir.path().join("test.sqlite"))
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .context("Failed to create SQLite database")?;
        bootstrap(&pool).await?;
        Ok((temp_dir, pool))
    }

    async fn table_exists(pool: &SqlitePool, table_name: &str) -> Result<bool> {
        let row: (i32,) =
            sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?")
                .bind(table_name)
                .fetch_one(pool)
                .await
                .context("Failed to check table existence")?;
        Ok(row.0 > 0)
    }

    #[tokio::test]
    async fn test_up_creates_tables() {
        let (_temp_dir, pool) = create_test_db().await.unwrap();
        assert_eq!(version(&pool).await.unwrap(), 0);

        run(&pool, 0, latest_version()).await.unwrap();

        assert_eq!(version(&pool).await.unwrap(), 1);
        for table in TABLES {
            assert!(table_exists(&pool, table).await.unwrap(), "{table}");
        }
    }

    #[tokio::test]
    async fn test_down_drops_tables() {
        let (_temp_dir, pool) = create_test_db().await.unwrap();
        run(&pool, 0, 1).await.unwrap();

        run(&pool, 1, 0).await.unwrap();

        assert_eq!(version(&pool).await.unwrap(), 0);
        for table in TABLES {
            assert!(!table_exists(&pool, table).await.unwrap(), "{table}");
        }
    }

    #[tokio::test]
    async fn test_no_op_at_target() {
        let (_temp_dir, pool) = create_test_db().await.unwrap();
        run(&pool, 0, 1).await.unwrap();
        run(&pool, 1, 1).await.unwrap();
        assert_eq!(version(&pool).await.unwrap(), 1);
    }

    #[test]
    fn test_validate_migrations() {
        assert!(validate_migrations(0, 1).is_ok());
        assert!(validate_migrations(1, 0).is_ok());
        assert!(validate_migrations(0, 2).is_err());
        assert!(validate_migrations(1, 3).is_err());
    }

    #[test]
    fn test_latest_version() {
        assert_eq!(latest_version(), 1);
    }
}
