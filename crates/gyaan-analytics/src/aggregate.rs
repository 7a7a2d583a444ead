use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::types::{EventRecord, EventType};

/// Dashboard counters computed over the whole log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalyticsSummary {
    pub total_records: usize,
    pub question_count: usize,
    pub blocked_count: usize,
    pub session_start_count: usize,
    pub unique_sessions: usize,
    /// Language tag to number of records, across every event type.
    pub languages: BTreeMap<String, usize>,
}

impl AnalyticsSummary {
    /// Records whose type is none of the known lifecycle events.
    pub fn other_count(&self) -> usize {
        self.total_records - self.question_count - self.blocked_count - self.session_start_count
    }

    /// Share of submitted messages that were blocked, if any were submitted.
    pub fn block_rate(&self) -> Option<f64> {
        let submitted = self.question_count + self.blocked_count;
        (submitted > 0).then(|| self.blocked_count as f64 / submitted as f64)
    }
}

/// Reduce records to counters. The result does not depend on record order.
pub fn aggregate(records: &[EventRecord]) -> AnalyticsSummary {
    let mut summary = AnalyticsSummary {
        total_records: records.len(),
        ..Default::default()
    };
    let mut sessions = HashSet::new();

    for record in records {
        match record.event_type {
            EventType::Question => summary.question_count += 1,
            EventType::Blocked => summary.blocked_count += 1,
            EventType::SessionStart => summary.session_start_count += 1,
            EventType::Other(_) | EventType::Unknown => {}
        }
        *summary.languages.entry(record.lang.clone()).or_insert(0) += 1;
        if !record.sid.is_empty() {
            sessions.insert(record.sid.as_str());
        }
    }

    summary.unique_sessions = sessions.len();
    summary
}
