//! Catalog fetcher.
//!
//! Issues a single GET against the configured endpoint and turns the JSON
//! array into [`ProductRecord`]s. Non-success statuses, transport errors,
//! and malformed records all fail the fetch; an empty array does not.

use anyhow::{bail, Context, Result};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::SourceConfig;
use crate::models::ProductRecord;

pub async fn fetch_products(config: &SourceConfig) -> Result<Vec<ProductRecord>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()?;

    debug!(url = %config.url, "requesting catalog");
    let response = client
        .get(&config.url)
        .send()
        .await
        .with_context(|| format!("Request to {} failed", config.url))?;

    let status = response.status();
    if !status.is_success() {
        bail!("{} returned HTTP {}", config.url, status);
    }

    let body = response
        .text()
        .await
        .with_context(|| format!("Failed to read response body from {}", config.url))?;

    let products = parse_products(&body)?;
    info!(url = %config.url, products = products.len(), "catalog fetched");
    Ok(products)
}

/// Parse a catalog payload.
///
/// Records are decoded one by one so an error names the offending
/// position as well as the missing or mistyped field.
pub fn parse_products(body: &str) -> Result<Vec<ProductRecord>> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(body).context("Catalog payload is not a JSON array")?;

    values
        .into_iter()
        .enumerate()
        .map(|(idx, value)| {
            serde_json::from_value(value).with_context(|| format!("Invalid product record {}", idx))
        })
        .collect()
}
