//! Aggregate queries over the loaded catalog.
//!
//! All functions are read-only. Orderings are fully specified so repeated
//! runs over the same data print identical output:
//!
//! | Query | Order |
//! |-------|-------|
//! | [`category_summary`] | category id (first-seen order) |
//! | [`category_volumes`] | category id |
//! | [`top_category_by_volume`] | total count desc, name asc |
//! | [`top_products_by_count`] | count desc, product id asc |
//! | [`above_category_average`] | rating desc, product id asc |

use anyhow::Result;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;

use crate::models::{AboveAverageProduct, CategorySummary, CategoryVolume, TopProduct};

/// All four results, gathered for printing.
#[derive(Debug, Clone)]
pub struct AnalyticsReport {
    pub summary: Vec<CategorySummary>,
    pub top_category: Option<CategoryVolume>,
    pub top_limit: i64,
    pub top_products: Vec<TopProduct>,
    pub above_average: Vec<AboveAverageProduct>,
}

pub async fn run_all(pool: &SqlitePool, top_limit: i64) -> Result<AnalyticsReport> {
    Ok(AnalyticsReport {
        summary: category_summary(pool).await?,
        top_category: top_category_by_volume(pool).await?,
        top_limit,
        top_products: top_products_by_count(pool, top_limit).await?,
        above_average: above_category_average(pool).await?,
    })
}

/// Product count and average price (2 decimals) per category.
pub async fn category_summary(pool: &SqlitePool) -> Result<Vec<CategorySummary>> {
    let rows = sqlx::query(
        r#"
        SELECT cat.name AS name,
               COUNT(p.id) AS product_count,
               ROUND(AVG(p.price), 2) AS avg_price
        FROM products p
        JOIN categories cat ON p.category_id = cat.id
        GROUP BY cat.id
        ORDER BY cat.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| CategorySummary {
            category: row.get("name"),
            product_count: row.get("product_count"),
            avg_price: row.get("avg_price"),
        })
        .collect())
}

/// Sum of rating counts per category.
pub async fn category_volumes(pool: &SqlitePool) -> Result<Vec<CategoryVolume>> {
    let rows = sqlx::query(
        r#"
        SELECT cat.name AS name, SUM(r.count) AS total_count
        FROM ratings r
        JOIN products p ON r.product_id = p.id
        JOIN categories cat ON p.category_id = cat.id
        GROUP BY cat.id
        ORDER BY cat.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| CategoryVolume {
            category: row.get("name"),
            total_count: row.get("total_count"),
        })
        .collect())
}

/// The category with the largest summed rating count.
pub async fn top_category_by_volume(pool: &SqlitePool) -> Result<Option<CategoryVolume>> {
    let row = sqlx::query(
        r#"
        SELECT cat.name AS name, SUM(r.count) AS total_count
        FROM ratings r
        JOIN products p ON r.product_id = p.id
        JOIN categories cat ON p.category_id = cat.id
        GROUP BY cat.id
        ORDER BY total_count DESC, cat.name ASC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| CategoryVolume {
        category: row.get("name"),
        total_count: row.get("total_count"),
    }))
}

pub async fn top_products_by_count(pool: &SqlitePool, limit: i64) -> Result<Vec<TopProduct>> {
    let rows = sqlx::query(
        r#"
        SELECT p.id AS id, p.title AS title, r.count AS count
        FROM ratings r
        JOIN products p ON r.product_id = p.id
        ORDER BY r.count DESC, p.id ASC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| TopProduct {
            id: row.get("id"),
            title: row.get("title"),
            count: row.get("count"),
        })
        .collect())
}

/// Products rated strictly above the mean rating of their own category.
///
/// Two passes: the per-category mean is computed first into a lookup,
/// then each product is compared against its category's entry.
pub async fn above_category_average(pool: &SqlitePool) -> Result<Vec<AboveAverageProduct>> {
    let avg_rows = sqlx::query(
        r#"
        SELECT p.category_id AS category_id, AVG(r.rate) AS avg_rate
        FROM ratings r
        JOIN products p ON r.product_id = p.id
        GROUP BY p.category_id
        "#,
    )
    .fetch_all(pool)
    .await?;

    let averages: HashMap<i64, f64> = avg_rows
        .iter()
        .map(|row| (row.get("category_id"), row.get("avg_rate")))
        .collect();

    let product_rows = sqlx::query(
        r#"
        SELECT p.id AS id, p.title AS title, p.category_id AS category_id,
               cat.name AS category, r.rate AS rate
        FROM products p
        JOIN categories cat ON p.category_id = cat.id
        JOIN ratings r ON r.product_id = p.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut above: Vec<AboveAverageProduct> = product_rows
        .iter()
        .filter_map(|row| {
            let category_avg = *averages.get(&row.get::<i64, _>("category_id"))?;
            let rate: f64 = row.get("rate");
            (rate > category_avg).then(|| AboveAverageProduct {
                id: row.get("id"),
                title: row.get("title"),
                category: row.get("category"),
                rate,
                category_avg,
            })
        })
        .collect();

    above.sort_by(|a, b| b.rate.total_cmp(&a.rate).then(a.id.cmp(&b.id)));
    Ok(above)
}
