//! Shared domain types for Store Insights.
//!
//! Holds the fixed internal sales schema, the error type used by every
//! library crate, CLI settings and presentation formatting helpers.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{InsightsError, Result};
