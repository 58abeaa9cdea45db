//! Database initialization
//!
//! Creates the database file and schema on first run; opening an existing
//! database is idempotent.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// How long a connection waits on a locked database before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open (creating if needed) the catalog database and ensure its schema exists
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // WAL lets readers proceed while a write is in progress
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_composers_table(&pool).await?;

    Ok(pool)
}

/// Create the composers table
///
/// `name` carries the uniqueness constraint; `notable_works` holds an
/// ordered JSON array of titles.
pub async fn create_composers_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS composers (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            born INTEGER NOT NULL,
            death INTEGER,
            era TEXT NOT NULL,
            bio TEXT NOT NULL,
            notable_works TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_composers_born ON composers(born)")
        .execute(pool)
        .await?;

    Ok(())
}
