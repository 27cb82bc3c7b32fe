//! Downstream shift service collaborator

use serde::Serialize;
use tracing::{debug, info};

use crate::app::models::ShiftRecord;
use crate::config::ShiftApiConfig;
use crate::{Error, Result};

#[derive(Serialize)]
struct SyncRequest<'a> {
    records: &'a [ShiftRecord],
}

/// Client for the shift assignment API
#[derive(Debug, Clone)]
pub struct ShiftApiClient {
    client: reqwest::Client,
    config: ShiftApiConfig,
}

impl ShiftApiClient {
    pub fn new(config: ShiftApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// True when a base URL is configured
    pub fn is_enabled(&self) -> bool {
        !self.config.base_url.trim().is_empty()
    }

    /// Post one batch of shift records
    ///
    /// Retries are the caller's concern: a failed sync leaves the ledger
    /// unmarked so the next run sends the batch again.
    pub async fn sync(&self, records: &[ShiftRecord]) -> Result<()> {
        if records.is_empty() {
            debug!("no shift records to sync");
            return Ok(());
        }
        let url = format!(
            "{}/api/shifts",
            self.config.base_url.trim_end_matches('/')
        );

        let mut request = self.client.post(&url).json(&SyncRequest { records });
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::delivery("shift-api", e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::delivery(
                "shift-api",
                format!("status {status}: {body}"),
            ));
        }

        info!(records = records.len(), "synced shift batch");
        Ok(())
    }
}
