//! Data ingestion and aggregation for Store Insights.
//!
//! Reads per-store CSV exports into one unified dataset, filters it by store
//! and computes the grouped summaries shown on the dashboard.

pub mod aggregator;
pub mod filter;
pub mod reader;

pub use insights_core as core;
