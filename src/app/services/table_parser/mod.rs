//! Table parsing for irregular spreadsheet grids
//!
//! This module turns a raw, headerless grid into a normalized table:
//! - [`header`] - header row location with one- and two-row header support
//! - [`columns`] - declarative resolution of noisy labels to canonical fields
//! - [`normalizer`] - header flattening and per-cell value normalization
//! - [`values`] - pure text/date/number/duration normalization helpers
//!
//! The rules driving every stage are injected through
//! [`crate::config::PipelineConfig`]; nothing in here hard-codes the live
//! report vocabulary beyond the defaults in [`crate::constants`].

pub mod columns;
pub mod header;
pub mod normalizer;
pub mod values;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use columns::{CanonicalColumn, ColumnMap, ColumnResolver, ColumnRule, LabelPredicate};
pub use header::{HeaderRules, locate_header};
pub use normalizer::{HeaderFlattenOptions, ValueRules, normalize_table};
