//! Fleet Reports Library
//!
//! A Rust library for extracting, normalizing and reconciling fleet operations
//! reports from irregularly-formatted spreadsheet attachments.
//!
//! This library provides tools for:
//! - Decoding xlsx containers into typed raw grids (first worksheet only)
//! - Locating single- and two-row table headers in headerless grids
//! - Resolving noisy column labels to canonical semantic fields
//! - Extracting typed records (delivery delays, outstanding documents, shifts)
//! - Deduplicating records across files and across reruns
//! - Maintaining a persisted idempotency ledger with age/count eviction

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod grid_decoder;
        pub mod ledger;
        pub mod record_extractor;
        pub mod record_processor;
        pub mod table_parser;
    }
    pub mod adapters {
        pub mod mail_source;
        pub mod render;
        pub mod shift_api;
        pub mod telegram;
    }
}

// Pipeline orchestration
pub mod processor;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{DocRecord, LateRecord, RawGrid, ReportType, ShiftRecord};
pub use config::PipelineConfig;

/// Result type alias for the fleet reports pipeline
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for report extraction and reconciliation
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Attachment bytes could not be decoded into a grid at all
    #[error("malformed input in attachment '{attachment}': {message}")]
    MalformedInput { attachment: String, message: String },

    /// Grid decoding error inside the xlsx container
    #[error("grid decoding error: {message}")]
    GridDecoding { message: String },

    /// A column the report type requires was not resolved
    #[error("required column '{column}' missing in attachment '{attachment}'")]
    RequiredColumnMissing { attachment: String, column: String },

    /// Table columns match no known report type
    #[error("unknown report type for attachment '{attachment}'")]
    UnknownReportType { attachment: String },

    /// Downstream delivery (notification or API) failed
    #[error("delivery failure to {target}: {message}")]
    Delivery { target: String, message: String },

    /// Idempotency ledger error
    #[error("ledger error: {message}")]
    Ledger { message: String },

    /// Configuration error
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Processing interrupted
    #[error("processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a malformed input error for one attachment
    pub fn malformed_input(attachment: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            attachment: attachment.into(),
            message: message.into(),
        }
    }

    /// Create a grid decoding error
    pub fn grid_decoding(message: impl Into<String>) -> Self {
        Self::GridDecoding {
            message: message.into(),
        }
    }

    /// Create a required-column-missing error
    pub fn required_column_missing(
        attachment: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        Self::RequiredColumnMissing {
            attachment: attachment.into(),
            column: column.into(),
        }
    }

    /// Create an unknown-report-type error
    pub fn unknown_report_type(attachment: impl Into<String>) -> Self {
        Self::UnknownReportType {
            attachment: attachment.into(),
        }
    }

    /// Create a downstream delivery error
    pub fn delivery(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Delivery {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create a ledger error
    pub fn ledger(message: impl Into<String>) -> Self {
        Self::Ledger {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }

    /// True for conditions that mark the ledger key even though extraction
    /// failed, so a permanently malformed file is not retried every run.
    pub fn marks_ledger(&self) -> bool {
        matches!(self, Self::RequiredColumnMissing { .. })
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(error: zip::result::ZipError) -> Self {
        Self::GridDecoding {
            message: format!("zip container error: {error}"),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(error: quick_xml::Error) -> Self {
        Self::GridDecoding {
            message: format!("sheet XML error: {error}"),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Ledger {
            message: format!("state serialization failed: {error}"),
        }
    }
}
