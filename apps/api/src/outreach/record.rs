//! Outreach records and the sinks that receive them.
//!
//! Sinks are fire-and-forget: a failing sink is logged and never affects the
//! response already computed for the caller.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::outreach::models::GenerationResult;
use crate::outreach::normalizer::message_length;
use crate::outreach::orchestrator::Provider;
use crate::outreach::profile::Profile;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Flat, spreadsheet-shaped record of one generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutreachRecord {
    pub timestamp: DateTime<Utc>,
    pub campaign_id: String,
    pub provider: Provider,
    pub linkedin_url: String,
    pub name: String,
    pub headline: String,
    pub location: String,
    pub raw_profile_json: String,
    pub generated_message: String,
    pub message_length: usize,
    pub thesis_used: String,
    pub icp_score: f64,
    pub icp_reason: String,
    /// Learnings joined with ", ".
    pub icp_learning: String,
}

/// Request-side context that is not part of the profile itself.
#[derive(Debug, Clone, Default)]
pub struct RecordContext<'a> {
    pub campaign_id: Option<&'a str>,
    pub current_url: Option<&'a str>,
    pub thesis: &'a str,
}

impl OutreachRecord {
    pub fn new(
        profile: &Profile,
        result: &GenerationResult,
        provider: Provider,
        ctx: RecordContext<'_>,
    ) -> Self {
        let generated_message = result.message.clone().unwrap_or_default();
        Self {
            timestamp: Utc::now(),
            campaign_id: ctx.campaign_id.unwrap_or_default().to_string(),
            provider,
            linkedin_url: profile
                .linkedin_url
                .as_deref()
                .or(ctx.current_url)
                .unwrap_or_default()
                .to_string(),
            name: profile.name.clone(),
            headline: profile.headline.clone().unwrap_or_default(),
            location: profile.location.clone().unwrap_or_default(),
            raw_profile_json: serde_json::to_string(profile).unwrap_or_default(),
            message_length: message_length(result.message.as_deref()),
            generated_message,
            thesis_used: ctx.thesis.to_string(),
            icp_score: result.icp_score.value(),
            icp_reason: result.icp_reason.clone(),
            icp_learning: result.icp_learning.join(", "),
        }
    }
}

#[async_trait]
pub trait OutreachSink: Send + Sync {
    fn name(&self) -> &'static str;

    async fn record(&self, record: &OutreachRecord) -> Result<(), SinkError>;
}

/// Emits each record as a structured log event.
pub struct TracingSink;

#[async_trait]
impl OutreachSink for TracingSink {
    fn name(&self) -> &'static str {
        "tracing"
    }

    async fn record(&self, record: &OutreachRecord) -> Result<(), SinkError> {
        info!(
            target: "outreach_record",
            campaign_id = %record.campaign_id,
            provider = %record.provider,
            name = %record.name,
            linkedin_url = %record.linkedin_url,
            icp_score = record.icp_score,
            message_length = record.message_length,
            "Outreach generated"
        );
        Ok(())
    }
}

/// Appends one JSON object per line.
pub struct JsonlFileSink {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonlFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl OutreachSink for JsonlFileSink {
    fn name(&self) -> &'static str {
        "jsonl"
    }

    async fn record(&self, record: &OutreachRecord) -> Result<(), SinkError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let _guard = self.lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Fans records out to every configured sink.
#[derive(Clone, Default)]
pub struct OutreachLog {
    sinks: Vec<Arc<dyn OutreachSink>>,
}

impl OutreachLog {
    pub fn new(sinks: Vec<Arc<dyn OutreachSink>>) -> Self {
        Self { sinks }
    }

    /// Spawns delivery and returns immediately. Sink errors are logged only.
    pub fn dispatch(&self, record: OutreachRecord) -> JoinHandle<()> {
        let sinks = self.sinks.clone();
        tokio::spawn(async move {
            for sink in sinks {
                if let Err(e) = sink.record(&record).await {
                    warn!("Outreach sink '{}' failed: {e}", sink.name());
                }
            }
        })
    }
}
