//! Catalog loader.
//!
//! Writes fetched records into the freshly migrated tables. The whole load
//! runs inside one transaction: either every product, category, and rating
//! row is committed, or nothing is.

use anyhow::{Context, Result};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

use crate::models::{LoadStats, ProductRecord};

pub async fn load_products(pool: &SqlitePool, products: &[ProductRecord]) -> Result<LoadStats> {
    let mut tx = pool.begin().await?;

    for product in products {
        let category_id = resolve_category(&mut tx, &product.category).await?;

        sqlx::query("INSERT INTO products (id, title, price, category_id) VALUES (?, ?, ?, ?)")
            .bind(product.id)
            .bind(&product.title)
            .bind(product.price)
            .bind(category_id)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to insert product {}", product.id))?;

        sqlx::query("INSERT INTO ratings (product_id, rate, count) VALUES (?, ?, ?)")
            .bind(product.id)
            .bind(product.rating.rate)
            .bind(product.rating.count)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to insert rating for product {}", product.id))?;
    }

    // Dropping `tx` on an early return above rolls everything back
    tx.commit().await?;

    let stats = load_stats(pool).await?;
    info!(
        categories = stats.categories,
        products = stats.products,
        ratings = stats.ratings,
        "catalog loaded"
    );
    Ok(stats)
}

/// Insert the category if it is new, then return its surrogate id.
async fn resolve_category(tx: &mut Transaction<'_, Sqlite>, name: &str) -> Result<i64> {
    let inserted = sqlx::query("INSERT OR IGNORE INTO categories (name) VALUES (?)")
        .bind(name)
        .execute(&mut **tx)
        .await?;
    if inserted.rows_affected() > 0 {
        debug!(category = name, "new category");
    }

    let id: i64 = sqlx::query_scalar("SELECT id FROM categories WHERE name = ?")
        .bind(name)
        .fetch_one(&mut **tx)
        .await
        .with_context(|| format!("Category '{}' missing after insert", name))?;

    Ok(id)
}

pub async fn load_stats(pool: &SqlitePool) -> Result<LoadStats> {
    let categories: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
        .fetch_one(pool)
        .await?;
    let products: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await?;
    let ratings: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ratings")
        .fetch_one(pool)
        .await?;

    Ok(LoadStats {
        categories,
        products,
        ratings,
    })
}
