//! Typed record extraction from normalized tables
//!
//! Classifies a parsed table into a report family and projects its rows
//! into typed records:
//! - [`detect`] - column-based report family classification
//! - [`late`] - delivery delay records
//! - [`docs`] - outstanding document records
//! - [`shifts`] - shift assignment records for the downstream sync

pub mod detect;
pub mod docs;
pub mod late;
pub mod shifts;

#[cfg(test)]
pub mod tests;

pub use detect::detect_report_type;
pub use docs::extract_docs;
pub use late::extract_late;
pub use shifts::{extract_shifts, is_shift_table};
