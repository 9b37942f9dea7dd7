//! Core data models.
//!
//! [`ProductRecord`] is the typed form of one element of the catalog
//! payload. The remaining types are rows produced by the analytics
//! queries and consumed by the report and chart renderers.

use serde::Deserialize;

/// One product as returned by the catalog endpoint.
///
/// Extra fields in the payload (description, image, ...) are ignored;
/// every field listed here is required.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProductRecord {
    pub id: i64,
    pub title: String,
    pub price: f64,
    pub category: String,
    pub rating: RatingRecord,
}

/// Aggregate customer feedback for one product.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct RatingRecord {
    pub rate: f64,
    pub count: i64,
}

/// Row counts after a committed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    pub categories: i64,
    pub products: i64,
    pub ratings: i64,
}

/// Product count and average price for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub category: String,
    pub product_count: i64,
    pub avg_price: f64,
}

/// Sum of rating counts for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryVolume {
    pub category: String,
    pub total_count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopProduct {
    pub id: i64,
    pub title: String,
    pub count: i64,
}

/// A product rated strictly above the mean rating of its own category.
#[derive(Debug, Clone, PartialEq)]
pub struct AboveAverageProduct {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub rate: f64,
    pub category_avg: f64,
}
