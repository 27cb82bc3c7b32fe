//! Application constants for the fleet reports pipeline
//!
//! This module contains default anchor tokens, scan bounds, placeholders
//! and ledger limits used throughout the pipeline. Everything here is a
//! default only; the live vocabulary is injected via [`crate::config`].

// =============================================================================
// Header Location
// =============================================================================

/// Rows scanned for the header anchor in delay (late) reports
pub const LATE_HEADER_SCAN_ROWS: usize = 10;

/// Rows scanned for the header anchor in document reports
pub const DOCS_HEADER_SCAN_ROWS: usize = 30;

/// Rows scanned for the header anchor in shift assignment sheets
pub const SHIFT_HEADER_SCAN_ROWS: usize = 50;

/// Rows scanned for an embedded sheet date above a shift header
pub const SHIFT_DATE_SCAN_ROWS: usize = 20;

/// Minimum non-empty cells in row r+1 for a two-row header promotion
pub const SECOND_HEADER_MIN_CELLS: usize = 3;

/// Share of textual cells required for a row to count as header-like
pub const HEADER_LIKE_TEXT_RATIO: f64 = 0.6;

// =============================================================================
// Report Vocabulary Defaults
// =============================================================================

/// Anchor substring identifying a delay report header row
pub const LATE_ANCHOR_TOKEN: &str = "delay";

/// Driver full-name marker used by document report headers
pub const DRIVER_NAME_TOKEN: &str = "full name";

/// Secondary markers co-occurring with the driver marker in document headers
pub const DOCS_SECONDARY_TOKENS: &[&[&str]] =
    &[&["ttn", "number"], &["ttn", "date"], &["plate"]];

/// Tokens whose co-occurrence classifies a table as a document report
pub const DOCS_REASON_TOKENS: &[&str] = &["incorrectness reason", "ttn"];
pub const DOCS_WAITING_TOKEN: &str = "waiting period";

/// Placeholder emitted for late-record fields with no resolved column
pub const FIELD_PLACEHOLDER: &str = "—";

/// Sub-header cells carrying this prefix are merge artifacts, not labels
pub const UNNAMED_PLACEHOLDER_PREFIX: &str = "unnamed";

/// Administrative document-report columns removed before rendering
pub const DOCS_DROP_COLUMN_TOKENS: &[&str] = &["site", "route number", "plate", "route date"];

// =============================================================================
// Delay Severity Thresholds
// =============================================================================

/// Minutes of delay at which the caption marker turns red
pub const DELAY_SEVERE_MINUTES: i64 = 21;

/// Minutes of delay at which the caption marker turns yellow
pub const DELAY_WARNING_MINUTES: i64 = 11;

/// Caption severity markers, most severe first
pub const MARKER_SEVERE: &str = "\u{1F534}";
pub const MARKER_WARNING: &str = "\u{1F7E1}";
pub const MARKER_MINOR: &str = "\u{1F7E2}";

// =============================================================================
// Delivery Limits
// =============================================================================

/// Maximum caption length accepted by the notification channel
pub const CAPTION_MAX_CHARS: usize = 1024;

/// Marker appended when a caption is truncated
pub const CAPTION_TRUNCATION_MARKER: &str = "...";

/// Maximum plain-text message length for caption overflow
pub const TEXT_MESSAGE_MAX_CHARS: usize = 4096;

/// Default notification topics
pub const DEFAULT_TOPIC_LATE: i64 = 26;
pub const DEFAULT_TOPIC_DOCS: i64 = 2;

// =============================================================================
// Idempotency Ledger
// =============================================================================

/// Entries older than this many days are evicted on save
pub const LEDGER_MAX_AGE_DAYS: i64 = 30;

/// Hard cap on persisted ledger entries; oldest-marked evicted first
pub const LEDGER_MAX_KEYS: usize = 5000;

/// Ledger file name under the state directory
pub const LEDGER_FILE_NAME: &str = "processed.json";

/// Shift-sync ledger file name under the state directory
pub const SHIFT_LEDGER_FILE_NAME: &str = "shift_processed.json";

// =============================================================================
// Date Handling
// =============================================================================

/// Canonical rendering of normalized date cells
pub const DATE_OUTPUT_FORMAT: &str = "%Y-%m-%d";

/// Filename date-token format used to filter docs batches ("2026_17_01" style)
pub const DOCS_DATE_TOKEN_FORMAT: &str = "%Y_%d_%m";

/// Lenient date input formats, ISO first then day-first (trial order matters)
pub const DATE_INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
];
