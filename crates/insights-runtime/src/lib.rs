//! Runtime layer for Store Insights.
//!
//! Owns the dataset lifecycle for a session and turns the current filter and
//! selections into the set of views the UI renders.

pub mod dataset_manager;
pub mod views;

pub use insights_core as core;
pub use insights_data as data;
