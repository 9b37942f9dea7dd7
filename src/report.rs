//! Console rendering of the analytics results.
//!
//! Formatting is pure ([`format_report`] returns a `String`); [`print_report`]
//! just writes it to stdout. Tables are drawn with `comfy-table`.

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use crate::analytics::AnalyticsReport;
use crate::models::LoadStats;

pub fn print_report(report: &AnalyticsReport) {
    print!("{}", format_report(report));
}

pub fn format_report(report: &AnalyticsReport) -> String {
    let mut out = String::new();

    out.push_str(&section("[1] Average Price and Product Count per Category"));
    let rows: Vec<Vec<String>> = report
        .summary
        .iter()
        .map(|s| {
            vec![
                s.category.clone(),
                s.product_count.to_string(),
                format!("{:.2}", s.avg_price),
            ]
        })
        .collect();
    out.push_str(&table(&["CATEGORY", "PRODUCTS", "AVG PRICE"], &rows));

    out.push_str(&section("[2] Top Category by Total Sales"));
    match &report.top_category {
        Some(top) => out.push_str(&format!(
            "  Category: {} | Total Sold: {}\n",
            top.category, top.total_count
        )),
        None => out.push_str("  (no categories)\n"),
    }

    out.push_str(&section(&format!(
        "[3] Top {} Best Selling Products",
        report.top_limit
    )));
    let rows: Vec<Vec<String>> = report
        .top_products
        .iter()
        .map(|p| vec![p.title.clone(), p.count.to_string()])
        .collect();
    out.push_str(&table(&["PRODUCT", "SOLD"], &rows));

    out.push_str(&section("[4] Products With Rating Higher Than Category Average"));
    let rows: Vec<Vec<String>> = report
        .above_average
        .iter()
        .map(|p| {
            vec![
                p.title.clone(),
                p.category.clone(),
                format!("{:.1}", p.rate),
                format!("{:.2}", p.category_avg),
            ]
        })
        .collect();
    out.push_str(&table(&["PRODUCT", "CATEGORY", "RATING", "CATEGORY AVG"], &rows));

    out
}

pub fn format_load_stats(stats: &LoadStats) -> String {
    format!(
        "Loaded {} products ({} ratings) across {} categories.\n",
        stats.products, stats.ratings, stats.categories
    )
}

fn section(title: &str) -> String {
    format!("\n{}\n", title)
}

/// Render `rows` under `headers`. The first column is text; every other
/// column is numeric and right-aligned.
fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return "  (no rows)\n".to_string();
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.iter().map(Cell::new));

    for row in rows {
        table.add_row(row.iter().enumerate().map(|(i, value)| {
            let cell = Cell::new(value);
            if i == 0 {
                cell
            } else {
                cell.set_alignment(CellAlignment::Right)
            }
        }));
    }

    format!("{table}\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AboveAverageProduct, CategorySummary, CategoryVolume, TopProduct};

    fn sample() -> AnalyticsReport {
        AnalyticsReport {
            summary: vec![
                CategorySummary {
                    category: "electronics".into(),
                    product_count: 6,
                    avg_price: 332.5,
                },
                CategorySummary {
                    category: "jewelery".into(),
                    product_count: 4,
                    avg_price: 220.99,
                },
            ],
            top_category: Some(CategoryVolume {
                category: "electronics".into(),
                total_count: 1887,
            }),
            top_limit: 5,
            top_products: vec![TopProduct {
                id: 9,
                title: "WD 2TB Elements Portable".into(),
                count: 470,
            }],
            above_average: vec![AboveAverageProduct {
                id: 9,
                title: "WD 2TB Elements Portable".into(),
                category: "electronics".into(),
                rate: 4.8,
                category_avg: 3.483,
            }],
        }
    }

    #[test]
    fn test_sections_in_fixed_order() {
        let out = format_report(&sample());
        let positions: Vec<usize> = ["[1]", "[2]", "[3]", "[4]"]
            .iter()
            .map(|marker| out.find(marker).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_summary_line_and_values() {
        let out = format_report(&sample());
        assert!(out.contains("Category: electronics | Total Sold: 1887"));
        assert!(out.contains("332.50"));
        assert!(out.contains("220.99"));
        assert!(out.contains("3.48"));
    }

    #[test]
    fn test_empty_report() {
        let report = AnalyticsReport {
            summary: vec![],
            top_category: None,
            top_limit: 5,
            top_products: vec![],
            above_average: vec![],
        };
        let out = format_report(&report);
        assert!(out.contains("(no categories)"));
        assert_eq!(out.matches("(no rows)").count(), 3);
    }

    #[test]
    fn test_table_columns_align() {
        let rows = vec![
            vec!["a".to_string(), "1".to_string()],
            vec!["longer name".to_string(), "200".to_string()],
        ];
        let out = table(&["NAME", "N"], &rows);
        let lines: Vec<&str> = out.lines().collect();

        // Top border, header, rule, two rows, bottom border
        assert_eq!(lines.len(), 6);
        let width = lines[0].chars().count();
        assert!(lines.iter().all(|line| line.chars().count() == width));
        assert!(lines[1].contains("NAME"));
        assert!(lines[3].contains("│ a "));
        // Numeric column is right-aligned under its header
        assert!(lines[3].contains("   1 │"));
        assert!(lines[4].contains(" 200 │"));
    }

    #[test]
    fn test_empty_table_has_placeholder_only() {
        let out = table(&["NAME", "N"], &[]);
        assert_eq!(out, "  (no rows)\n");
    }

    #[test]
    fn test_load_stats_line() {
        let line = format_load_stats(&LoadStats {
            categories: 4,
            products: 20,
            ratings: 20,
        });
        assert_eq!(line, "Loaded 20 products (20 ratings) across 4 categories.\n");
    }
}
