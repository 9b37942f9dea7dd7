//! Run orchestration.
//!
//! A full run is strictly sequential: fetch → schema reset → load →
//! analytics → charts. The database pool is opened once and handed to each
//! stage. An empty catalog stops the run before the database is touched.

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::analytics;
use crate::charts::{self, ChartPaths};
use crate::config::Config;
use crate::db;
use crate::error::StageError;
use crate::fetch;
use crate::ingest;
use crate::migrate;
use crate::models::{LoadStats, ProductRecord};
use crate::report;

/// How a full run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// The endpoint returned no products; nothing after the fetch ran.
    NoData,
    Completed {
        stats: LoadStats,
        charts: Option<ChartPaths>,
    },
}

pub async fn run(config: &Config, render_charts: bool) -> Result<RunOutcome, StageError> {
    let products = fetch::fetch_products(&config.source)
        .await
        .map_err(StageError::Fetch)?;

    if products.is_empty() {
        warn!(url = %config.source.url, "catalog is empty, skipping load");
        println!("No data to process.");
        return Ok(RunOutcome::NoData);
    }

    let pool = db::connect(&config.db).await.map_err(StageError::Load)?;
    let outcome = run_stages(&pool, config, &products, render_charts).await;
    pool.close().await;

    if outcome.is_ok() {
        info!(db = %config.db.path.display(), "run complete");
    }
    outcome
}

async fn run_stages(
    pool: &SqlitePool,
    config: &Config,
    products: &[ProductRecord],
    render_charts: bool,
) -> Result<RunOutcome, StageError> {
    migrate::run_migrations(pool)
        .await
        .map_err(StageError::Load)?;
    let stats = ingest::load_products(pool, products)
        .await
        .map_err(StageError::Load)?;
    print!("{}", report::format_load_stats(&stats));

    let results = analytics::run_all(pool, config.analytics.top_products)
        .await
        .map_err(StageError::Analytics)?;
    report::print_report(&results);

    let charts = if render_charts {
        let paths = charts::render_all(pool, &config.charts, config.analytics.top_products)
            .await
            .map_err(StageError::Render)?;
        print_chart_paths(&paths);
        Some(paths)
    } else {
        None
    };

    Ok(RunOutcome::Completed { stats, charts })
}

/// Drop and recreate the catalog tables.
pub async fn run_init(config: &Config) -> Result<()> {
    let pool = db::connect(&config.db).await?;
    migrate::run_migrations(&pool).await?;
    pool.close().await;
    println!("Database initialized successfully.");
    Ok(())
}

/// Print the analytics for an already loaded database.
pub async fn run_report(config: &Config) -> Result<(), StageError> {
    let pool = db::connect_existing(&config.db)
        .await
        .map_err(StageError::Analytics)?;
    let results = analytics::run_all(&pool, config.analytics.top_products).await;
    pool.close().await;

    report::print_report(&results.map_err(StageError::Analytics)?);
    Ok(())
}

/// Render the charts for an already loaded database.
pub async fn run_charts(config: &Config) -> Result<(), StageError> {
    let pool = db::connect_existing(&config.db)
        .await
        .map_err(StageError::Render)?;
    let paths = charts::render_all(&pool, &config.charts, config.analytics.top_products).await;
    pool.close().await;

    print_chart_paths(&paths.map_err(StageError::Render)?);
    Ok(())
}

fn print_chart_paths(paths: &ChartPaths) {
    println!();
    println!("Charts:");
    for path in [&paths.category_bar, &paths.sales_pie, &paths.top_products] {
        println!("  {}", path.display());
    }
}
