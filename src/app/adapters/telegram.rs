//! Messaging delivery collaborator
//!
//! Uploads the rendered table artifact with its caption and sends plain
//! text follow-ups. Dry-run short-circuits before any network call so the
//! pipeline can be exercised without credentials.

use reqwest::multipart;
use tracing::{debug, info};

use crate::config::DeliveryConfig;
use crate::constants::{CAPTION_MAX_CHARS, TEXT_MESSAGE_MAX_CHARS};
use crate::{Error, Result};

const API_BASE: &str = "https://api.telegram.org";

/// Delivery client bound to one bot and chat
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    client: reqwest::Client,
    config: DeliveryConfig,
}

impl TelegramNotifier {
    pub fn new(config: DeliveryConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Upload a table artifact with a caption into a forum topic
    ///
    /// The caption is capped at the platform limit; longer summaries are
    /// expected to arrive pre-truncated with their overflow sent via
    /// [`send_text`](Self::send_text).
    pub async fn send_document(
        &self,
        data: Vec<u8>,
        filename: &str,
        caption: &str,
        topic: i64,
    ) -> Result<()> {
        let caption: String = caption.chars().take(CAPTION_MAX_CHARS).collect();
        if self.config.dry_run {
            info!(
                topic,
                bytes = data.len(),
                caption_chars = caption.chars().count(),
                "[dry-run] would send document"
            );
            return Ok(());
        }

        let url = format!(
            "{API_BASE}/bot{}/sendDocument",
            self.config.bot_token
        );
        let form = multipart::Form::new()
            .text("chat_id", self.config.chat_id.clone())
            .text("message_thread_id", topic.to_string())
            .text("caption", caption)
            .part(
                "document",
                multipart::Part::bytes(data).file_name(filename.to_string()),
            );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::delivery("telegram", e.to_string()))?;
        check(response).await?;
        debug!(topic, "document delivered");
        Ok(())
    }

    /// Send a plain text message into a forum topic
    pub async fn send_text(&self, text: &str, topic: i64) -> Result<()> {
        let text: String = text.chars().take(TEXT_MESSAGE_MAX_CHARS).collect();
        if self.config.dry_run {
            info!(
                topic,
                chars = text.chars().count(),
                "[dry-run] would send text"
            );
            return Ok(());
        }

        let url = format!("{API_BASE}/bot{}/sendMessage", self.config.bot_token);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "chat_id": self.config.chat_id,
                "message_thread_id": topic,
                "text": text,
            }))
            .send()
            .await
            .map_err(|e| Error::delivery("telegram", e.to_string()))?;
        check(response).await?;
        debug!(topic, "text delivered");
        Ok(())
    }
}

async fn check(response: reqwest::Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::delivery(
        "telegram",
        format!("status {status}: {body}"),
    ))
}
