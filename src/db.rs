use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

use crate::config::DbConfig;

/// Open the catalog database, creating the file if needed.
///
/// The pool holds a single connection: one run is the only user of the
/// file, and every stage goes through the same handle.
pub async fn connect(config: &DbConfig) -> Result<SqlitePool> {
    let db_path = &config.path;

    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    open(db_path, true).await
}

/// Open a database written by an earlier `run` or `init`.
///
/// Fails without touching the filesystem when the file does not exist.
pub async fn connect_existing(config: &DbConfig) -> Result<SqlitePool> {
    let db_path = &config.path;
    if !db_path.is_file() {
        anyhow::bail!(
            "Database not found: {} (run `storefront run` or `storefront init` first)",
            db_path.display()
        );
    }

    open(db_path, false).await
}

async fn open(db_path: &Path, create: bool) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
        .create_if_missing(create)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open database: {}", db_path.display()))?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_connect_creates_missing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("catalog.db");
        let pool = connect(&DbConfig { path: path.clone() }).await.unwrap();
        pool.close().await;
        assert!(path.is_file());
    }

    #[tokio::test]
    async fn test_connect_existing_leaves_no_file_behind() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data").join("catalog.db");

        let err = connect_existing(&DbConfig { path: path.clone() })
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Database not found"));
        assert!(!path.exists());
        assert!(!tmp.path().join("data").exists());
    }

    #[tokio::test]
    async fn test_connect_existing_opens_prior_database() {
        let tmp = TempDir::new().unwrap();
        let config = DbConfig {
            path: tmp.path().join("catalog.db"),
        };
        connect(&config).await.unwrap().close().await;

        let pool = connect_existing(&config).await.unwrap();
        let one: i64 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await.unwrap();
        assert_eq!(one, 1);
    }
}
