use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::language::Language;

/// One processed interaction, as persisted to the month log. Field names
/// match the on-disk JSON records consumed by the reporting tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionLogEntry {
    pub timestamp: String,
    pub phone_number: String,
    pub message_id: String,
    pub incoming_message: String,
    pub detected_language: Language,
    pub reply: String,
    pub sent_successfully: bool,
}

/// Append-only interaction log, partitioned by calendar month
/// (`month_key` is `YYYYMM`). `load` feeds reporting; the decision path
/// only ever appends.
#[async_trait]
pub trait InteractionStore: Send + Sync {
    async fn append(&self, month_key: &str, entry: InteractionLogEntry) -> Result<()>;
    async fn load(&self, month_key: &str) -> Result<Vec<InteractionLogEntry>>;
}

/// File-backed store: one JSON array per month. Appends re-read and rewrite
/// the whole month file, so a single lock across the read-modify-write keeps
/// concurrent appends from losing entries.
pub struct JsonInteractionLog {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonInteractionLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn path_for(&self, month_key: &str) -> PathBuf {
        self.dir.join(format!("whatsapp_interactions_{month_key}.json"))
    }

    async fn read_entries(&self, month_key: &str) -> Result<Vec<InteractionLogEntry>> {
        let path = self.path_for(month_key);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse log file: {}", path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read log file: {}", path.display()))
            }
        }
    }
}

#[async_trait]
impl InteractionStore for JsonInteractionLog {
    async fn append(&self, month_key: &str, entry: InteractionLogEntry) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.read_entries(month_key).await?;
        entries.push(entry);

        let path = self.path_for(month_key);
        let json =
            serde_json::to_string_pretty(&entries).context("Failed to serialize log entries")?;
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("Failed to write log file: {}", path.display()))?;

        Ok(())
    }

    async fn load(&self, month_key: &str) -> Result<Vec<InteractionLogEntry>> {
        self.read_entries(month_key).await
    }
}
