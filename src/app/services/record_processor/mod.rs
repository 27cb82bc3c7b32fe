//! Record post-processing: deduplication and delivery formatting
//!
//! Records extracted from many attachments funnel through here before
//! delivery: [`dedup`] collapses cross-file repeats under each family's
//! merge policy, [`caption`] formats the delay summary under the
//! messaging length limits.

pub mod caption;
pub mod dedup;

#[cfg(test)]
pub mod tests;

pub use caption::{Caption, delay_marker, format_caption};
pub use dedup::{dedup_docs, dedup_late, dedup_shifts};
