//! # JSONL Event Log
//!
//! Flat UTF-8 file, one JSON object per line. Several processes may append to
//! the same file; each record goes out in a single `write_all` on a handle
//! opened with `O_APPEND`, so lines do not interleave. Readers may observe a
//! half-written trailing line and must skip it.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::StorageResult;
use crate::storage::EventStore;
use crate::types::EventRecord;

pub const DEFAULT_FILE_NAME: &str = "analytics.jsonl";

#[derive(Debug, Clone)]
pub struct JsonlEventLog {
    path: PathBuf,
}

impl JsonlEventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Log file `analytics.jsonl` inside `data_dir`.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join(DEFAULT_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse raw log bytes, keeping only lines that hold a JSON object.
    pub fn parse_lines(content: &[u8]) -> Vec<EventRecord> {
        let mut records = Vec::new();
        let mut skipped = 0usize;

        for (index, line) in content.split(|b| *b == b'\n').enumerate() {
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            match parse_line(line) {
                Some(record) => records.push(record),
                None => {
                    skipped += 1;
                    debug!(line = index + 1, "skipping malformed analytics line");
                }
            }
        }

        if skipped > 0 {
            debug!(skipped, parsed = records.len(), "analytics log contained malformed lines");
        }
        records
    }
}

fn parse_line(line: &[u8]) -> Option<EventRecord> {
    match serde_json::from_slice::<Value>(line).ok()? {
        value @ Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    }
}

#[async_trait]
impl EventStore for JsonlEventLog {
    async fn append(&self, record: &EventRecord) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let mut line = record.to_line()?;
        line.push('\n');

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        debug!(event = %record.event_type, sid = %record.sid, "appended analytics event");
        Ok(())
    }

    async fn read_all(&self) -> StorageResult<Vec<EventRecord>> {
        match fs::read(&self.path).await {
            Ok(content) => Ok(Self::parse_lines(&content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => {
                warn!("Failed to read analytics log {:?}: {}", self.path, e);
                Err(e.into())
            }
        }
    }

    async fn export_raw(&self) -> StorageResult<Option<Vec<u8>>> {
        match fs::read(&self.path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
