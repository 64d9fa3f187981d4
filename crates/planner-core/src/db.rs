use std::path::Path;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::error::CoreError;

// Re-export the pool for use in other parts of the core crate
pub use sqlx::SqlitePool as DbPool;

/// Opens the task database at `db_path` and brings its schema up to date.
///
/// The file and its parent directory are created on first use; an existing
/// `scheduler` table is left as it is.
pub async fn establish_connection(db_path: &str) -> Result<SqlitePool, CoreError> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    if !Path::new(db_path).exists() {
        tokio::fs::File::create(db_path).await?;
        info!(path = db_path, "created task database");
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .busy_timeout(std::time::Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    Ok(pool)
}

/// A throwaway database living in memory.
///
/// The pool holds a single connection, since every SQLite in-memory
/// connection is a separate database.
pub async fn establish_in_memory() -> Result<SqlitePool, CoreError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    Ok(pool)
}

async fn run_migrations(pool: &SqlitePool) -> Result<(), CoreError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("scheduler.db");
        let path = path.to_str().unwrap();

        let pool = establish_connection(path).await.unwrap();
        assert!(Path::new(path).exists());

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM scheduler")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_reopening_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scheduler.db");
        let path = path.to_str().unwrap();

        let pool = establish_connection(path).await.unwrap();
        sqlx::query("INSERT INTO scheduler (date, title) VALUES ('20240301', 'kept')")
            .execute(&pool)
            .await
            .unwrap();
        pool.close().await;

        let pool = establish_connection(path).await.unwrap();
        let (title,): (String,) = sqlx::query_as("SELECT title FROM scheduler")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(title, "kept");
    }

    #[tokio::test]
    async fn test_repeat_length_is_capped() {
        let pool = establish_in_memory().await.unwrap();
        let long = "d".repeat(129);
        let result = sqlx::query("INSERT INTO scheduler (date, title, repeat) VALUES ('20240301', 't', $1)")
            .bind(long)
            .execute(&pool)
            .await;
        assert!(result.is_err());
    }
}
