//! Pipeline run orchestration
//!
//! Drives one end-to-end run: collect attachments, gate them through the
//! idempotency ledgers, decode and classify each one in isolation, merge
//! the per-family batches, and deliver. Ledgers persist only after the
//! corresponding delivery succeeds, so a failed send is retried on the
//! next run.

pub mod summary;

#[cfg(test)]
mod tests;

use chrono::Local;
use tracing::{debug, error, info, warn};

use crate::app::adapters::mail_source::{AttachmentSource, DirectorySource};
use crate::app::adapters::render::{TableRenderer, TextTableRenderer};
use crate::app::adapters::shift_api::ShiftApiClient;
use crate::app::adapters::telegram::TelegramNotifier;
use crate::app::models::{Attachment, DocRecord, LateRecord, RawGrid, ReportType, ShiftRecord};
use crate::app::services::grid_decoder::decode_first_sheet;
use crate::app::services::ledger::Ledger;
use crate::app::services::record_extractor::{
    detect_report_type, extract_docs, extract_late, extract_shifts, is_shift_table,
};
use crate::app::services::record_processor::{dedup_docs, dedup_late, dedup_shifts, format_caption};
use crate::app::services::table_parser::{locate_header, normalize_table};
use crate::config::{PipelineConfig, ReportProfile};
use crate::constants::DOCS_DATE_TOKEN_FORMAT;
use crate::{Error, Result};

pub use summary::RunSummary;

/// Per-attachment classification outcome
#[derive(Debug)]
pub enum Parsed {
    Late(Vec<LateRecord>),
    Docs(Vec<DocRecord>),
    Shifts(Vec<ShiftRecord>),
}

/// One end-to-end pipeline run over a configured source
pub struct ReportPipeline {
    config: PipelineConfig,
}

impl ReportPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run against the configured attachment directory with the default
    /// renderer and notifier
    pub async fn run(&self) -> Result<RunSummary> {
        let source = DirectorySource::new(&self.config.input_dir);
        let renderer = TextTableRenderer;
        let notifier = TelegramNotifier::new(self.config.delivery.clone());
        let shift_api = ShiftApiClient::new(self.config.shift_api.clone());
        self.run_with(&source, &renderer, &notifier, &shift_api).await
    }

    /// Run with injected collaborators
    pub async fn run_with(
        &self,
        source: &dyn AttachmentSource,
        renderer: &dyn TableRenderer,
        notifier: &TelegramNotifier,
        shift_api: &ShiftApiClient,
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let attachments = source.collect()?;
        summary.attachments_seen = attachments.len();
        info!(attachments = attachments.len(), "starting pipeline run");

        let mut report_ledger = Ledger::load(&self.config.ledger);
        let mut shift_ledger = Ledger::load(&self.config.shift_ledger);

        let mut late_batch: Vec<LateRecord> = Vec::new();
        let mut docs_batch: Vec<DocRecord> = Vec::new();
        let mut shift_batch: Vec<ShiftRecord> = Vec::new();
        let mut report_keys: Vec<String> = Vec::new();
        let mut shift_keys: Vec<String> = Vec::new();

        let date_token = Local::now().format(DOCS_DATE_TOKEN_FORMAT).to_string();

        for attachment in &attachments {
            let key = attachment.ledger_key();
            // marking happens post-classification, so membership in either
            // ledger already identifies the attachment's family
            if report_ledger.contains(&key) || shift_ledger.contains(&key) {
                debug!(key = %attachment.short_key(), "attachment already processed");
                summary.skipped_processed += 1;
                continue;
            }
            match self.classify(attachment) {
                Ok(Parsed::Shifts(records)) => {
                    summary.shift_attachments += 1;
                    shift_batch.extend(records);
                    shift_keys.push(key);
                }
                Ok(Parsed::Late(records)) => {
                    if !self.config.run_late {
                        debug!(file = %attachment.filename, "delay reports disabled, skipping");
                        continue;
                    }
                    summary.late_attachments += 1;
                    late_batch.extend(records);
                    report_keys.push(key);
                }
                Ok(Parsed::Docs(records)) => {
                    if !self.config.run_docs {
                        debug!(file = %attachment.filename, "document reports disabled, skipping");
                        continue;
                    }
                    if self.config.docs_filename_date_filter
                        && !attachment.filename.contains(&date_token)
                    {
                        debug!(file = %attachment.filename, token = %date_token, "not today's document report");
                        summary.skipped_date_filter += 1;
                        continue;
                    }
                    summary.docs_attachments += 1;
                    docs_batch.extend(records);
                    report_keys.push(key);
                }
                Err(Error::UnknownReportType { .. }) => {
                    warn!(file = %attachment.filename, "columns match no known report family");
                    summary.skipped_unknown += 1;
                }
                Err(e) if e.marks_ledger() => {
                    // a structurally broken report will not fix itself;
                    // mark it so it is not re-parsed every run
                    warn!(file = %attachment.filename, error = %e, "attachment unusable, marking processed");
                    report_ledger.mark(&key);
                    report_keys.push(key);
                    summary.failed += 1;
                }
                Err(e) => {
                    error!(file = %attachment.filename, error = %e, "failed to process attachment");
                    summary.failed += 1;
                }
            }
        }

        // merge phase
        let mut late_records = dedup_late(late_batch);
        late_records.sort_by(|a, b| b.delay_minutes.cmp(&a.delay_minutes));
        let mut docs_records = dedup_docs(docs_batch);
        docs_records.sort_by(|a, b| a.surname().to_lowercase().cmp(&b.surname().to_lowercase()));
        let shift_records = dedup_shifts(shift_batch);
        summary.late_records = late_records.len();
        summary.docs_records = docs_records.len();
        summary.shift_records = shift_records.len();

        // delivery phase; each family marks and saves its ledger only
        // after its own delivery succeeded. A failed delivery leaves the
        // family's keys unmarked for retry but does not stop the other
        // family from being attempted.
        let mut run_failure: Option<Error> = None;

        if !late_records.is_empty() || !docs_records.is_empty() {
            match self
                .deliver_reports(&late_records, &docs_records, renderer, notifier, &mut summary)
                .await
            {
                Ok(()) => {
                    for key in report_keys {
                        report_ledger.mark(key);
                    }
                    report_ledger.save()?;
                }
                Err(e) => {
                    error!(error = %e, "report delivery failed, batch stays eligible for retry");
                    run_failure = Some(e);
                }
            }
        } else if !report_keys.is_empty() {
            // nothing to send but the attachments were consumed
            for key in report_keys {
                report_ledger.mark(key);
            }
            report_ledger.save()?;
        }

        if !shift_records.is_empty() {
            if shift_api.is_enabled() {
                match shift_api.sync(&shift_records).await {
                    Ok(()) => {
                        summary.shifts_synced = true;
                        for key in shift_keys {
                            shift_ledger.mark(key);
                        }
                        shift_ledger.save()?;
                    }
                    Err(e) => {
                        error!(error = %e, "shift sync failed, batch stays eligible for retry");
                        run_failure.get_or_insert(e);
                    }
                }
            } else {
                debug!("shift sync disabled, leaving attachments unmarked");
            }
        } else if !shift_keys.is_empty() {
            for key in shift_keys {
                shift_ledger.mark(key);
            }
            shift_ledger.save()?;
        }

        if let Some(e) = run_failure {
            return Err(e);
        }

        info!(
            late = summary.late_records,
            docs = summary.docs_records,
            shifts = summary.shift_records,
            failed = summary.failed,
            "pipeline run finished"
        );
        Ok(summary)
    }

    /// Decode and classify one attachment
    ///
    /// Shift sheets are probed first: their vocabulary is a superset of
    /// the delay report tokens, so the stricter match must win. Errors
    /// here never abort the run; the caller isolates them per attachment.
    pub fn classify(&self, attachment: &Attachment) -> Result<Parsed> {
        let grid = decode_first_sheet(&attachment.data).map_err(|e| match e {
            Error::GridDecoding { message } => Error::malformed_input(&attachment.filename, message),
            other => other,
        })?;

        if let Some(records) = self.try_shifts(&grid, &attachment.filename)? {
            return Ok(Parsed::Shifts(records));
        }

        let table = parse_with_profile(&grid, &self.config.late);
        match detect_report_type(&table.columns, &self.config.detection) {
            ReportType::Late => {
                let records = extract_late(&table, &self.config.late, &attachment.filename)?;
                return Ok(Parsed::Late(records));
            }
            ReportType::Docs => {}
            ReportType::Unknown => {}
        }

        let table = parse_with_profile(&grid, &self.config.docs);
        match detect_report_type(&table.columns, &self.config.detection) {
            ReportType::Docs => {
                let records = extract_docs(&table, &self.config.docs, &attachment.filename)?;
                Ok(Parsed::Docs(records))
            }
            ReportType::Late => {
                let records = extract_late(&table, &self.config.late, &attachment.filename)?;
                Ok(Parsed::Late(records))
            }
            ReportType::Unknown => Err(Error::unknown_report_type(&attachment.filename)),
        }
    }

    /// Probe a grid as a shift sheet
    fn try_shifts(&self, grid: &RawGrid, filename: &str) -> Result<Option<Vec<ShiftRecord>>> {
        let table = parse_with_profile(grid, &self.config.shifts);
        if !is_shift_table(&table.columns) {
            return Ok(None);
        }
        let records = extract_shifts(grid, &table, &self.config.shifts, filename)?;
        Ok(Some(records))
    }

    async fn deliver_reports(
        &self,
        late_records: &[LateRecord],
        docs_records: &[DocRecord],
        renderer: &dyn TableRenderer,
        notifier: &TelegramNotifier,
        summary: &mut RunSummary,
    ) -> Result<()> {
        if !late_records.is_empty() {
            let artifact = renderer.render_late(late_records)?;
            let caption = format_caption(late_records);
            notifier
                .send_document(
                    artifact,
                    renderer.artifact_name(),
                    &caption.text,
                    self.config.delivery.topic_late,
                )
                .await?;
            summary.messages_sent += 1;
            if let Some(overflow) = caption.overflow {
                notifier
                    .send_text(&overflow, self.config.delivery.topic_late)
                    .await?;
                summary.messages_sent += 1;
            }
        }

        // one delivery per driver, in surname order
        for (driver, records) in group_docs_by_driver(docs_records) {
            let artifact = renderer.render_docs(&records, &self.config.docs_drop_columns)?;
            let caption = format!("Outstanding documents for {driver}");
            notifier
                .send_document(
                    artifact,
                    renderer.artifact_name(),
                    &caption,
                    self.config.delivery.topic_docs,
                )
                .await?;
            summary.messages_sent += 1;
        }
        Ok(())
    }
}

/// Locate, flatten and normalize a grid under one profile
fn parse_with_profile(
    grid: &RawGrid,
    profile: &ReportProfile,
) -> crate::app::models::NormalizedTable {
    let span = locate_header(grid, &profile.header);
    normalize_table(grid, span, &profile.flatten, &profile.values)
}

/// Group document records per driver, preserving the incoming order
fn group_docs_by_driver(records: &[DocRecord]) -> Vec<(String, Vec<DocRecord>)> {
    let mut groups: Vec<(String, Vec<DocRecord>)> = Vec::new();
    for record in records {
        match groups.iter_mut().find(|(driver, _)| driver == &record.driver_name) {
            Some((_, group)) => group.push(record.clone()),
            None => groups.push((record.driver_name.clone(), vec![record.clone()])),
        }
    }
    groups
}
