//! Run statistics for a pipeline invocation
//!
//! Tracks per-family attachment and record counts plus skip reasons, for
//! logging and for the CLI's end-of-run report.

/// Counters accumulated over one pipeline run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Attachments collected from the source
    pub attachments_seen: usize,
    /// Attachments skipped because their ledger key was already marked
    pub skipped_processed: usize,
    /// Document report attachments skipped by the filename date filter
    pub skipped_date_filter: usize,
    /// Attachments whose columns matched no known report family
    pub skipped_unknown: usize,
    /// Attachments that failed to decode or extract
    pub failed: usize,
    /// Delay report attachments consumed
    pub late_attachments: usize,
    /// Document report attachments consumed
    pub docs_attachments: usize,
    /// Shift sheet attachments consumed
    pub shift_attachments: usize,
    /// Delay records after dedup
    pub late_records: usize,
    /// Document records after dedup
    pub docs_records: usize,
    /// Shift records after dedup
    pub shift_records: usize,
    /// Messages handed to the notifier
    pub messages_sent: usize,
    /// Whether shift records reached the downstream API
    pub shifts_synced: bool,
}

impl RunSummary {
    /// Attachments that produced records in any family
    pub fn consumed(&self) -> usize {
        self.late_attachments + self.docs_attachments + self.shift_attachments
    }

    /// Total records surviving dedup across all families
    pub fn total_records(&self) -> usize {
        self.late_records + self.docs_records + self.shift_records
    }

    /// Whether the run completed without any per-attachment failure
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_summary_is_clean() {
        let summary = RunSummary::default();
        assert!(summary.is_clean());
        assert_eq!(summary.consumed(), 0);
        assert_eq!(summary.total_records(), 0);
    }

    #[test]
    fn test_counters_aggregate() {
        let summary = RunSummary {
            late_attachments: 2,
            docs_attachments: 1,
            late_records: 5,
            docs_records: 3,
            shift_records: 4,
            failed: 1,
            ..Default::default()
        };
        assert_eq!(summary.consumed(), 3);
        assert_eq!(summary.total_records(), 12);
        assert!(!summary.is_clean());
    }
}
