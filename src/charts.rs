//! Chart rendering.
//!
//! Three SVG charts are drawn from the loaded catalog with `plotters`, each
//! to a fixed filename under `charts.output_dir`. Existing files are
//! overwritten.
//!
//! | File | Chart | Data |
//! |------|-------|------|
//! | `bar_products_per_category.svg` | vertical bars | products per category |
//! | `pie_sales_by_category.svg` | pie | share of rating counts per category |
//! | `bar_top5_products.svg` | horizontal bars | best selling products |

use anyhow::{Context, Result};
use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::{Palette, Palette99};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::analytics;
use crate::config::ChartsConfig;
use crate::models::{CategorySummary, CategoryVolume, TopProduct};

pub const CATEGORY_BAR_FILE: &str = "bar_products_per_category.svg";
pub const SALES_PIE_FILE: &str = "pie_sales_by_category.svg";
pub const TOP_PRODUCTS_FILE: &str = "bar_top5_products.svg";

const FONT: &str = "sans-serif";

/// Paths of the files written by [`render_all`].
#[derive(Debug, Clone)]
pub struct ChartPaths {
    pub category_bar: PathBuf,
    pub sales_pie: PathBuf,
    pub top_products: PathBuf,
}

/// Re-query the catalog and draw all three charts.
pub async fn render_all(
    pool: &SqlitePool,
    config: &ChartsConfig,
    top_limit: i64,
) -> Result<ChartPaths> {
    let summary = analytics::category_summary(pool).await?;
    let volumes = analytics::category_volumes(pool).await?;
    let top = analytics::top_products_by_count(pool, top_limit).await?;

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create chart directory: {}",
            config.output_dir.display()
        )
    })?;

    let paths = ChartPaths {
        category_bar: config.output_dir.join(CATEGORY_BAR_FILE),
        sales_pie: config.output_dir.join(SALES_PIE_FILE),
        top_products: config.output_dir.join(TOP_PRODUCTS_FILE),
    };
    let size = (config.width, config.height);

    draw_category_bar(&paths.category_bar, size, &summary)
        .with_context(|| format!("Failed to draw {}", paths.category_bar.display()))?;
    info!(path = %paths.category_bar.display(), "chart written");

    // The pie is square regardless of the configured aspect ratio
    let side = config.width.min(config.height).max(400);
    draw_sales_pie(&paths.sales_pie, (side, side), &volumes)
        .with_context(|| format!("Failed to draw {}", paths.sales_pie.display()))?;
    info!(path = %paths.sales_pie.display(), "chart written");

    draw_top_products(
        &paths.top_products,
        size,
        &top,
        config.title_max_chars,
    )
    .with_context(|| format!("Failed to draw {}", paths.top_products.display()))?;
    info!(path = %paths.top_products.display(), "chart written");

    Ok(paths)
}

/// Cut `title` to `max_chars` characters and append `...` if it was longer.
pub fn truncate_title(title: &str, max_chars: usize) -> String {
    if title.chars().count() > max_chars {
        let mut cut: String = title.chars().take(max_chars).collect();
        cut.push_str("...");
        cut
    } else {
        title.to_string()
    }
}

fn draw_category_bar(path: &Path, size: (u32, u32), summary: &[CategorySummary]) -> Result<()> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let n = summary.len().max(1) as i32;
    let max = summary.iter().map(|s| s.product_count).max().unwrap_or(0);

    let mut chart = ChartBuilder::on(&root)
        .caption("Number of Products per Category", (FONT, 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((0..n).into_segmented(), 0i64..max + 1)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(summary.len().max(1))
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => summary
                .get(*i as usize)
                .map(|s| s.category.clone())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .y_desc("Products")
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BLUE.mix(0.8).filled())
            .margin(12)
            .data(
                summary
                    .iter()
                    .enumerate()
                    .map(|(i, s)| (i as i32, s.product_count)),
            ),
    )?;

    root.present()?;
    Ok(())
}

fn draw_sales_pie(path: &Path, size: (u32, u32), volumes: &[CategoryVolume]) -> Result<()> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled("Sales Distribution by Category", (FONT, 24))?;

    let total: i64 = volumes.iter().map(|v| v.total_count).sum();
    if total <= 0 {
        root.draw(&Text::new(
            "no sales recorded",
            (20, 20),
            (FONT, 16).into_font(),
        ))?;
        root.present()?;
        return Ok(());
    }

    let dims = root.dim_in_pixel();
    let center = (dims.0 as i32 / 2, dims.1 as i32 / 2);
    let radius = dims.0.min(dims.1) as f64 * 0.32;

    let sizes: Vec<f64> = volumes.iter().map(|v| v.total_count as f64).collect();
    let colors: Vec<RGBColor> = (0..volumes.len())
        .map(|i| {
            let (r, g, b) = Palette99::pick(i).rgb();
            RGBColor(r, g, b)
        })
        .collect();
    let labels: Vec<&str> = volumes.iter().map(|v| v.category.as_str()).collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(-90.0);
    pie.label_style((FONT, 14).into_font().color(&BLACK));
    pie.percentages((FONT, 12).into_font().color(&BLACK));
    root.draw(&pie)?;

    root.present()?;
    Ok(())
}

fn draw_top_products(
    path: &Path,
    size: (u32, u32),
    top: &[TopProduct],
    title_max_chars: usize,
) -> Result<()> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let n = top.len().max(1) as i32;
    let max = top.iter().map(|p| p.count).max().unwrap_or(0);
    let labels: Vec<String> = top
        .iter()
        .map(|p| truncate_title(&p.title, title_max_chars))
        .collect();

    let caption = format!("Top {} Best Selling Products", top.len());
    let mut chart = ChartBuilder::on(&root)
        .caption(caption, (FONT, 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(200)
        .build_cartesian_2d(0i64..max + max / 10 + 1, (0..n).into_segmented())?;

    // Row 0 is drawn at the top of the chart
    let row_of = |y: i32| (n - 1 - y) as usize;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(top.len().max(1))
        .y_label_formatter(&|v| match v {
            SegmentValue::CenterOf(y) => labels.get(row_of(*y)).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .x_desc("Rating count")
        .draw()?;

    chart.draw_series(
        Histogram::horizontal(&chart)
            .style(BLUE.mix(0.8).filled())
            .margin(8)
            .data(
                top.iter()
                    .enumerate()
                    .map(|(i, p)| (n - 1 - i as i32, p.count)),
            ),
    )?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::load_products;
    use crate::ingest::tests::{fresh_pool, product};
    use tempfile::TempDir;

    #[test]
    fn test_truncate_long_title() {
        let title = "Fjallraven - Foldsack No. 1 Backpack";
        assert_eq!(truncate_title(title, 20), "Fjallraven - Foldsac...");
    }

    #[test]
    fn test_truncate_exact_length_unchanged() {
        let title = "a".repeat(20);
        assert_eq!(truncate_title(&title, 20), title);
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        let title = "é".repeat(25);
        let cut = truncate_title(&title, 20);
        assert_eq!(cut.chars().count(), 23);
        assert!(cut.ends_with("..."));
    }

    #[tokio::test]
    async fn test_render_all_writes_three_files() {
        let tmp = TempDir::new().unwrap();
        let pool = fresh_pool(&tmp).await;
        let products = vec![
            product(1, "electronics", 10.0, 4.0, 100),
            product(2, "jewelery", 20.0, 3.0, 250),
            product(3, "electronics", 15.0, 2.0, 30),
        ];
        load_products(&pool, &products).await.unwrap();

        let config = ChartsConfig {
            output_dir: tmp.path().join("charts"),
            ..ChartsConfig::default()
        };
        let paths = render_all(&pool, &config, 5).await.unwrap();

        for path in [&paths.category_bar, &paths.sales_pie, &paths.top_products] {
            let svg = std::fs::read_to_string(path).unwrap();
            assert!(svg.contains("<svg"), "{} is not an SVG", path.display());
        }
        assert!(std::fs::read_to_string(&paths.sales_pie)
            .unwrap()
            .contains("jewelery"));
    }

    #[tokio::test]
    async fn test_render_overwrites_existing_files() {
        let tmp = TempDir::new().unwrap();
        let pool = fresh_pool(&tmp).await;
        load_products(&pool, &[product(1, "a", 1.0, 1.0, 1)])
            .await
            .unwrap();

        let config = ChartsConfig {
            output_dir: tmp.path().to_path_buf(),
            ..ChartsConfig::default()
        };
        std::fs::write(tmp.path().join(SALES_PIE_FILE), "stale").unwrap();
        render_all(&pool, &config, 5).await.unwrap();

        let svg = std::fs::read_to_string(tmp.path().join(SALES_PIE_FILE)).unwrap();
        assert!(!svg.contains("stale"));
    }
}
