//! Catalog schema.
//!
//! Each run rebuilds the three tables from scratch, so the only migration
//! is drop-then-create. Child tables are dropped first so the foreign keys
//! never point at a missing parent.

use anyhow::Result;
use sqlx::SqlitePool;

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    for table in ["ratings", "products", "categories"] {
        sqlx::query(&format!("DROP TABLE IF EXISTS {table}"))
            .execute(pool)
            .await?;
    }

    // Category names are normalized into a lookup table
    sqlx::query(
        r#"
        CREATE TABLE categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Product ids come from the source, not from SQLite
    sqlx::query(
        r#"
        CREATE TABLE products (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            price REAL NOT NULL,
            category_id INTEGER NOT NULL,
            FOREIGN KEY (category_id) REFERENCES categories(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE ratings (
            product_id INTEGER PRIMARY KEY,
            rate REAL NOT NULL,
            count INTEGER NOT NULL,
            FOREIGN KEY (product_id) REFERENCES products(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX idx_products_category_id ON products(category_id)")
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DbConfig;
    use crate::db;
    use tempfile::TempDir;

    async fn table_names(pool: &SqlitePool) -> Vec<String> {
        sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_migrations_create_three_tables() {
        let tmp = TempDir::new().unwrap();
        let pool = db::connect(&DbConfig {
            path: tmp.path().join("catalog.db"),
        })
        .await
        .unwrap();

        run_migrations(&pool).await.unwrap();

        assert_eq!(
            table_names(&pool).await,
            vec!["categories", "products", "ratings"]
        );
    }

    #[tokio::test]
    async fn test_migrations_twice_leave_empty_tables() {
        let tmp = TempDir::new().unwrap();
        let pool = db::connect(&DbConfig {
            path: tmp.path().join("catalog.db"),
        })
        .await
        .unwrap();

        run_migrations(&pool).await.unwrap();
        sqlx::query("INSERT INTO categories (name) VALUES ('stale')")
            .execute(&pool)
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();

        assert_eq!(
            table_names(&pool).await,
            vec!["categories", "products", "ratings"]
        );
        for table in ["categories", "products", "ratings"] {
            let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
                .fetch_one(&pool)
                .await
                .unwrap();
            assert_eq!(count, 0, "{table} should be empty");
        }
    }
}
