//! # Storefront Insights
//!
//! Pulls a product catalog from a JSON endpoint into SQLite, prints a fixed
//! set of aggregate reports, and renders three charts.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────┐   ┌──────────────┐   ┌───────────┐   ┌──────────┐
//! │  fetch  │──▶│ migrate +    │──▶│ analytics │──▶│  charts  │
//! │ (HTTP)  │   │ ingest (SQL) │   │ + report  │   │  (SVG)   │
//! └─────────┘   └──────────────┘   └───────────┘   └──────────┘
//! ```
//!
//! Every run rebuilds the database from scratch; there is no incremental
//! state.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration with built-in defaults |
//! | [`models`] | Catalog records and query rows |
//! | [`fetch`] | HTTP fetch and payload parsing |
//! | [`db`] | Database connection |
//! | [`migrate`] | Drop-and-recreate schema |
//! | [`ingest`] | Transactional load |
//! | [`analytics`] | Aggregate queries |
//! | [`report`] | Console tables |
//! | [`charts`] | SVG charts |
//! | [`pipeline`] | Stage orchestration |
//! | [`error`] | Stage-tagged errors |

pub mod analytics;
pub mod charts;
pub mod config;
pub mod db;
pub mod error;
pub mod fetch;
pub mod ingest;
pub mod migrate;
pub mod models;
pub mod pipeline;
pub mod report;
