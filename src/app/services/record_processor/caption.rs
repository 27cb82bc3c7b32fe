//! Delay summary formatting for the photo caption
//!
//! Captions are capped by the messaging platform; records that no longer
//! fit are carried in an overflow text so nobody disappears from the
//! summary.

use crate::app::models::LateRecord;
use crate::constants::{
    CAPTION_MAX_CHARS, CAPTION_TRUNCATION_MARKER, DELAY_SEVERE_MINUTES, DELAY_WARNING_MINUTES,
    MARKER_MINOR, MARKER_SEVERE, MARKER_WARNING,
};

/// A formatted caption and the lines that did not fit into it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    pub text: String,
    pub overflow: Option<String>,
}

/// Severity marker for a delay in minutes
pub fn delay_marker(minutes: i64) -> &'static str {
    if minutes >= DELAY_SEVERE_MINUTES {
        MARKER_SEVERE
    } else if minutes >= DELAY_WARNING_MINUTES {
        MARKER_WARNING
    } else {
        MARKER_MINOR
    }
}

fn format_line(record: &LateRecord) -> String {
    format!(
        "{} {} — {}",
        delay_marker(record.delay_minutes),
        record.driver_name,
        record.delay_minutes
    )
}

/// Format one line per record, truncating at the caption limit
///
/// When the joined lines exceed the limit, the caption is cut to leave
/// room for the truncation marker and the records past the cut are
/// re-formatted into the overflow text.
pub fn format_caption(records: &[LateRecord]) -> Caption {
    let lines: Vec<String> = records.iter().map(format_line).collect();
    let joined = lines.join("\n");

    if joined.chars().count() <= CAPTION_MAX_CHARS {
        return Caption {
            text: joined,
            overflow: None,
        };
    }

    let keep = CAPTION_MAX_CHARS - CAPTION_TRUNCATION_MARKER.chars().count() - 1;
    let truncated: String = joined.chars().take(keep).collect();
    // the final, partially cut line counts as shown
    let shown_lines = truncated.lines().count();
    let text = truncated + CAPTION_TRUNCATION_MARKER;

    let overflow_lines: Vec<String> = records
        .iter()
        .skip(shown_lines)
        .map(format_line)
        .collect();
    let overflow = if overflow_lines.is_empty() {
        None
    } else {
        Some(overflow_lines.join("\n"))
    };

    Caption { text, overflow }
}
