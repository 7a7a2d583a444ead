//! # Gyaan Analytics
//!
//! Append-only session event log and the aggregation behind the dashboard.
//!
//! ## Storage layout
//!
//! ```text
//! <data_dir>/
//! └── analytics.jsonl   # one EventRecord per line, append-only
//! ```
//!
//! Writing is best-effort from the caller's point of view: `append` returns a
//! `StorageResult` and the chat path decides to discard the error. Reading
//! skips every line that is not a JSON object instead of failing.

pub mod aggregate;
pub mod error;
pub mod jsonl_log;
pub mod storage;
pub mod types;

pub use aggregate::{aggregate, AnalyticsSummary};
pub use error::{StorageError, StorageResult};
pub use jsonl_log::{JsonlEventLog, DEFAULT_FILE_NAME};
pub use storage::EventStore;
pub use types::{EventRecord, EventType, DEFAULT_LANG};
