//! Configuration management and validation.
//!
//! Provides configuration structures for the report pipeline: per-family
//! parsing profiles, report type detection rules, ledger placement and
//! delivery targets. Defaults encode the live report vocabulary from
//! [`crate::constants`]; every rule can be overridden for other tenants.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::app::services::table_parser::{
    ColumnRule, HeaderFlattenOptions, HeaderRules, LabelPredicate, ValueRules,
    columns::canonical,
};
use crate::constants::{
    DEFAULT_TOPIC_DOCS, DEFAULT_TOPIC_LATE, DOCS_DROP_COLUMN_TOKENS, DOCS_HEADER_SCAN_ROWS,
    DOCS_REASON_TOKENS, DOCS_SECONDARY_TOKENS, DOCS_WAITING_TOKEN, DRIVER_NAME_TOKEN,
    LATE_ANCHOR_TOKEN, LATE_HEADER_SCAN_ROWS, LEDGER_FILE_NAME, LEDGER_MAX_AGE_DAYS,
    LEDGER_MAX_KEYS, SHIFT_HEADER_SCAN_ROWS, SHIFT_LEDGER_FILE_NAME,
};
use crate::{Error, Result};

/// Parsing profile for one report family
///
/// Bundles everything the table parser needs: where the header is, how a
/// two-row header flattens, which labels bind which canonical fields and
/// which columns receive value coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProfile {
    /// Header location rules
    pub header: HeaderRules,

    /// Two-row header flattening behavior
    pub flatten: HeaderFlattenOptions,

    /// Ordered canonical column binding rules
    pub columns: Vec<ColumnRule>,

    /// Per-column value coercion designations
    pub values: ValueRules,
}

/// Column-presence rules classifying a parsed table into a report family
///
/// Detection reads the flattened column labels only; filenames never decide
/// the report type on their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRules {
    /// Every marker must be satisfied by some column for a delay report
    pub late_markers: Vec<LabelPredicate>,

    /// Any one of these present makes the table a document report
    pub docs_markers: Vec<LabelPredicate>,
}

impl DetectionRules {
    fn satisfied_by(marker: &LabelPredicate, normalized_labels: &[String]) -> bool {
        normalized_labels.iter().any(|label| marker.matches(label))
    }

    /// True when every delay-report marker is present
    pub fn is_late(&self, normalized_labels: &[String]) -> bool {
        self.late_markers
            .iter()
            .all(|marker| Self::satisfied_by(marker, normalized_labels))
    }

    /// True when any document-report marker is present
    pub fn is_docs(&self, normalized_labels: &[String]) -> bool {
        self.docs_markers
            .iter()
            .any(|marker| Self::satisfied_by(marker, normalized_labels))
    }
}

/// Idempotency ledger placement and retention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Ledger file path
    pub path: PathBuf,

    /// Entries older than this are pruned on save
    pub max_age_days: i64,

    /// Hard cap on retained entries; oldest beyond the cap are pruned
    pub max_keys: usize,

    /// Write a `.bak` shadow copy before replacing the ledger file
    pub write_backup: bool,
}

impl LedgerConfig {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(LEDGER_FILE_NAME),
            max_age_days: LEDGER_MAX_AGE_DAYS,
            max_keys: LEDGER_MAX_KEYS,
            write_backup: true,
        }
    }
}

/// Messaging delivery target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Bot token; empty is only valid in dry-run mode
    pub bot_token: String,

    /// Destination chat id
    pub chat_id: String,

    /// Forum topic for delay report deliveries
    pub topic_late: i64,

    /// Forum topic for document report messages
    pub topic_docs: i64,

    /// Log deliveries instead of sending them
    pub dry_run: bool,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: String::new(),
            topic_late: DEFAULT_TOPIC_LATE,
            topic_docs: DEFAULT_TOPIC_DOCS,
            dry_run: false,
        }
    }
}

/// Downstream shift synchronization endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftApiConfig {
    /// Base URL of the shift service; empty disables the sync
    pub base_url: String,

    /// Bearer token for the shift service
    pub token: Option<String>,
}

impl Default for ShiftApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token: None,
        }
    }
}

/// Global configuration for the report pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory scanned for xlsx attachments
    pub input_dir: PathBuf,

    /// Process delay reports
    pub run_late: bool,

    /// Process document reports
    pub run_docs: bool,

    /// Keep document reports whose filename lacks today's date token
    ///
    /// The date token is a secondary filter; column-based detection stays
    /// authoritative either way.
    pub docs_filename_date_filter: bool,

    /// Column-label tokens dropped from document report renderings
    pub docs_drop_columns: Vec<String>,

    /// Delay report parsing profile
    pub late: ReportProfile,

    /// Document report parsing profile
    pub docs: ReportProfile,

    /// Shift assignment parsing profile
    pub shifts: ReportProfile,

    /// Report family detection rules
    pub detection: DetectionRules,

    /// Report idempotency ledger
    pub ledger: LedgerConfig,

    /// Shift sync idempotency ledger
    pub shift_ledger: LedgerConfig,

    /// Messaging delivery settings
    pub delivery: DeliveryConfig,

    /// Shift service settings
    pub shift_api: ShiftApiConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            run_late: true,
            run_docs: true,
            docs_filename_date_filter: true,
            docs_drop_columns: DOCS_DROP_COLUMN_TOKENS
                .iter()
                .map(|t| t.to_string())
                .collect(),
            late: default_late_profile(),
            docs: default_docs_profile(),
            shifts: default_shift_profile(),
            detection: default_detection_rules(),
            ledger: LedgerConfig::default(),
            shift_ledger: LedgerConfig {
                path: PathBuf::from(SHIFT_LEDGER_FILE_NAME),
                ..LedgerConfig::default()
            },
            delivery: DeliveryConfig::default(),
            shift_api: ShiftApiConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Set the attachment input directory
    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = dir.into();
        self
    }

    /// Place both ledgers under the given directory
    pub fn with_ledger_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.ledger.path = dir.join(LEDGER_FILE_NAME);
        self.shift_ledger.path = dir.join(SHIFT_LEDGER_FILE_NAME);
        self
    }

    /// Configure the delivery target
    pub fn with_delivery(mut self, delivery: DeliveryConfig) -> Self {
        self.delivery = delivery;
        self
    }

    /// Log deliveries instead of sending them
    pub fn with_dry_run(mut self) -> Self {
        self.delivery.dry_run = true;
        self
    }

    /// Restrict the run to one report family
    pub fn with_only_late(mut self) -> Self {
        self.run_late = true;
        self.run_docs = false;
        self
    }

    /// Restrict the run to document reports
    pub fn with_only_docs(mut self) -> Self {
        self.run_late = false;
        self.run_docs = true;
        self
    }

    /// Disable the document report filename date filter
    pub fn without_docs_date_filter(mut self) -> Self {
        self.docs_filename_date_filter = false;
        self
    }

    /// Validate cross-field consistency before a run
    pub fn validate(&self) -> Result<()> {
        if !self.run_late && !self.run_docs {
            return Err(Error::configuration(
                "at least one report family must be enabled",
            ));
        }
        if !self.delivery.dry_run {
            if self.delivery.bot_token.trim().is_empty() {
                return Err(Error::configuration(
                    "delivery bot token is required outside dry-run mode",
                ));
            }
            if self.delivery.chat_id.trim().is_empty() {
                return Err(Error::configuration(
                    "delivery chat id is required outside dry-run mode",
                ));
            }
        }
        if self.late.header.scan_rows == 0
            || self.docs.header.scan_rows == 0
            || self.shifts.header.scan_rows == 0
        {
            return Err(Error::configuration("header scan bound must be positive"));
        }
        Ok(())
    }
}

/// Delay report profile: anchor on the delay column, forward-filled
/// two-row headers
fn default_late_profile() -> ReportProfile {
    ReportProfile {
        header: HeaderRules::new(
            LabelPredicate::contains(LATE_ANCHOR_TOKEN),
            LATE_HEADER_SCAN_ROWS,
        ),
        flatten: HeaderFlattenOptions::default(),
        columns: vec![
            ColumnRule::new(canonical::DELAY, LabelPredicate::contains(LATE_ANCHOR_TOKEN)),
            ColumnRule::new(
                canonical::DRIVER_NAME,
                LabelPredicate::contains(DRIVER_NAME_TOKEN),
            ),
            ColumnRule::new(canonical::PLATE, LabelPredicate::contains("plate")),
            ColumnRule::new(
                canonical::PLANNED_TIME,
                LabelPredicate::contains("planned"),
            ),
            ColumnRule::new(
                canonical::ASSIGNED_TIME,
                LabelPredicate::contains("assigned"),
            ),
            ColumnRule::new(canonical::ROUTE_NAME, LabelPredicate::contains("route")),
        ],
        values: ValueRules::default(),
    }
}

/// Document report profile: anchored on the driver marker co-occurring
/// with a secondary marker, with date and integer coercion for the ttn
/// columns
fn default_docs_profile() -> ReportProfile {
    ReportProfile {
        header: HeaderRules::new(
            LabelPredicate::all_of([
                LabelPredicate::contains(DRIVER_NAME_TOKEN),
                LabelPredicate::any_of(
                    DOCS_SECONDARY_TOKENS
                        .iter()
                        .map(|tokens| LabelPredicate::all_tokens(tokens)),
                ),
            ]),
            DOCS_HEADER_SCAN_ROWS,
        ),
        flatten: HeaderFlattenOptions::default(),
        columns: vec![
            ColumnRule::new(
                canonical::DRIVER_NAME,
                LabelPredicate::contains(DRIVER_NAME_TOKEN),
            ),
            ColumnRule::new(
                canonical::TTN_NUMBER,
                LabelPredicate::all_tokens(&["ttn", "number"]),
            ),
            ColumnRule::new(
                canonical::TTN_DATE,
                LabelPredicate::all_tokens(&["ttn", "date"]),
            ),
            ColumnRule::new(
                canonical::ROUTE_NUMBER,
                LabelPredicate::all_tokens(&["route", "number"]),
            ),
            ColumnRule::new(
                canonical::WAITING_PERIOD,
                LabelPredicate::contains(DOCS_WAITING_TOKEN),
            ),
        ],
        values: ValueRules {
            duration_columns: Some(LabelPredicate::contains(DOCS_WAITING_TOKEN)),
            date_columns: Some(LabelPredicate::all_tokens(&["ttn", "date"])),
            integer_columns: Some(LabelPredicate::any_of([
                LabelPredicate::all_tokens(&["ttn", "number"]),
                LabelPredicate::all_tokens(&["route", "number"]),
            ])),
        },
    }
}

/// Shift assignment profile: space-joined headers without forward fill
fn default_shift_profile() -> ReportProfile {
    ReportProfile {
        header: HeaderRules::new(
            LabelPredicate::any_of([
                LabelPredicate::contains(DRIVER_NAME_TOKEN),
                LabelPredicate::contains("driver"),
            ]),
            SHIFT_HEADER_SCAN_ROWS,
        ),
        flatten: HeaderFlattenOptions {
            forward_fill_top: false,
            joiner: " ".to_string(),
        },
        columns: vec![
            ColumnRule::new(
                canonical::DRIVER_NAME,
                LabelPredicate::any_of([
                    LabelPredicate::contains(DRIVER_NAME_TOKEN),
                    LabelPredicate::contains("driver"),
                ]),
            ),
            ColumnRule::new(canonical::PLATE, LabelPredicate::contains("plate")),
            ColumnRule::new(
                canonical::ROUTE_NUMBER,
                LabelPredicate::all_tokens(&["route", "number"]),
            ),
            ColumnRule::new(canonical::ROUTE_NAME, LabelPredicate::contains("route")),
            ColumnRule::new(canonical::SHIFT_DATE, LabelPredicate::contains("date")),
            ColumnRule::new(
                canonical::PLANNED_TIME,
                LabelPredicate::contains("planned"),
            ),
            ColumnRule::new(
                canonical::ASSIGNED_TIME,
                LabelPredicate::contains("assigned"),
            ),
            ColumnRule::new(
                canonical::DEPARTURE_TIME,
                LabelPredicate::contains("departure"),
            ),
            ColumnRule::new(canonical::DELAY, LabelPredicate::contains(LATE_ANCHOR_TOKEN)),
        ],
        values: ValueRules::default(),
    }
}

/// Live detection vocabulary
///
/// A delay report is identified by the delay column alone; a driver column
/// is not required, extraction fills the gap with placeholders. A document
/// report is identified by an incorrectness-reason column carrying a TTN
/// token, or by a waiting-period column.
fn default_detection_rules() -> DetectionRules {
    DetectionRules {
        late_markers: vec![LabelPredicate::contains(LATE_ANCHOR_TOKEN)],
        docs_markers: vec![
            LabelPredicate::all_tokens(DOCS_REASON_TOKENS),
            LabelPredicate::contains(DOCS_WAITING_TOKEN),
        ],
    }
}
