//! # Storage Traits

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::types::EventRecord;

/// Append-only event storage.
///
/// Implementations never rewrite or compact earlier records.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Append one record.
    async fn append(&self, record: &EventRecord) -> StorageResult<()>;

    /// Every readable record in write order. Unreadable entries are skipped.
    async fn read_all(&self) -> StorageResult<Vec<EventRecord>>;

    /// The raw stored bytes, or None when nothing has been captured yet.
    async fn export_raw(&self) -> StorageResult<Option<Vec<u8>>>;
}
