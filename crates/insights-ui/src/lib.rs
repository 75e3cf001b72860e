//! Terminal UI layer for Store Insights.
//!
//! Provides themes, the header, filter panel and bar components, table and
//! chart views, and the interactive event loop built on top of [`ratatui`].

pub mod app;
pub mod chart_view;
pub mod components;
pub mod table_view;
pub mod themes;

pub use insights_core as core;
