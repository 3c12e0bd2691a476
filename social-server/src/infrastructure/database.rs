use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tracing::{info, warn};

pub(crate) async fn create_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("invalid DATABASE_URL '{database_url}'"))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .context("failed to open the sqlite database")?;

    info!("connected to {database_url}");
    Ok(pool)
}

pub(crate) async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("failed to run migrations")?;
    Ok(())
}

/// Deletes the database file (and its WAL side files) so the schema is rebuilt
/// from scratch. In-memory URLs are left alone.
pub(crate) async fn reset_store_file(database_url: &str) -> Result<()> {
    let Some(path) = database_file_path(database_url) else {
        return Ok(());
    };

    for candidate in [
        path.clone(),
        with_suffix(&path, "-wal"),
        with_suffix(&path, "-shm"),
    ] {
        match tokio::fs::remove_file(&candidate).await {
            Ok(()) => warn!(path = %candidate.display(), "database file removed on startup"),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to remove {}", candidate.display()));
            }
        }
    }
    Ok(())
}

fn database_file_path(database_url: &str) -> Option<PathBuf> {
    let raw = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);
    let raw = raw.split('?').next().unwrap_or_default();

    if raw.is_empty() || raw == ":memory:" {
        return None;
    }
    Some(PathBuf::from(raw))
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Single-connection in-memory database with the full schema applied.
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid in-memory url")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("in-memory sqlite must open");

    run_migrations(&pool).await.expect("migrations must apply");
    pool
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{database_file_path, reset_store_file};

    #[test]
    fn database_file_path_handles_url_forms() {
        assert_eq!(
            database_file_path("sqlite://social.db"),
            Some(PathBuf::from("social.db"))
        );
        assert_eq!(
            database_file_path("sqlite:data/app.db?mode=rwc"),
            Some(PathBuf::from("data/app.db"))
        );
        assert_eq!(database_file_path("sqlite::memory:"), None);
    }

    #[tokio::test]
    async fn reset_removes_existing_file_and_ignores_missing_one() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = dir.path().join("social.db");
        std::fs::write(&db, b"stale").expect("write");

        let url = format!("sqlite://{}", db.display());
        reset_store_file(&url).await.expect("reset must succeed");
        assert!(!db.exists());

        reset_store_file(&url).await.expect("second reset is a no-op");
    }
}
