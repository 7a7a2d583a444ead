//! # Event Record Types
//!
//! One [`EventRecord`] is one line of the analytics log:
//! `{"ts": "...Z", "sid": "...", "type": "...", "lang": "...", ...extra}`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Kinds of lifecycle events. Unknown tags written by other versions are kept
/// verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum EventType {
    SessionStart,
    Question,
    Blocked,
    Other(String),
    #[default]
    Unknown,
}

impl EventType {
    pub fn as_str(&self) -> &str {
        match self {
            EventType::SessionStart => "session_start",
            EventType::Question => "question",
            EventType::Blocked => "blocked",
            EventType::Other(tag) => tag,
            EventType::Unknown => "",
        }
    }
}

impl From<&str> for EventType {
    fn from(tag: &str) -> Self {
        match tag {
            "session_start" => EventType::SessionStart,
            "question" => EventType::Question,
            "blocked" => EventType::Blocked,
            "" => EventType::Unknown,
            other => EventType::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = lenient_string(deserializer)?;
        Ok(EventType::from(tag.as_str()))
    }
}

pub const DEFAULT_LANG: &str = "en";

/// Keys owned by the record itself; extras may not shadow them.
pub const RESERVED_KEYS: [&str; 4] = ["ts", "sid", "type", "lang"];

/// One immutable analytics log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub ts: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sid: String,
    #[serde(rename = "type", default)]
    pub event_type: EventType,
    #[serde(default = "default_lang", deserialize_with = "lenient_lang")]
    pub lang: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventRecord {
    /// New record stamped with the current UTC time.
    pub fn new(event_type: EventType, sid: impl Into<String>, lang: impl Into<String>) -> Self {
        Self::at(Utc::now(), event_type, sid, lang)
    }

    pub fn at(
        when: DateTime<Utc>,
        event_type: EventType,
        sid: impl Into<String>,
        lang: impl Into<String>,
    ) -> Self {
        Self {
            ts: format_ts(when),
            sid: sid.into(),
            event_type,
            lang: lang.into(),
            extra: Map::new(),
        }
    }

    /// Attach an extra field. Reserved keys are ignored.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if !RESERVED_KEYS.contains(&key.as_str()) {
            self.extra.insert(key, value.into());
        }
        self
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.ts)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    pub fn to_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// ISO-8601 UTC with microseconds and a trailing `Z`.
pub fn format_ts(when: DateTime<Utc>) -> String {
    when.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn default_lang() -> String {
    DEFAULT_LANG.to_string()
}

/// Accept any JSON scalar where a string is expected.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn lenient_lang<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let lang = lenient_string(deserializer)?;
    Ok(if lang.is_empty() { default_lang() } else { lang })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_serialized_field_order() {
        let when = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let record = EventRecord::at(when, EventType::Question, "abc123def456", "en")
            .with_extra("chars", 42);

        assert_eq!(
            record.to_line().unwrap(),
            r#"{"ts":"2026-01-02T03:04:05.000000Z","sid":"abc123def456","type":"question","lang":"en","chars":42}"#
        );
    }

    #[test]
    fn test_reserved_extra_keys_ignored() {
        let record = EventRecord::new(EventType::Blocked, "s", "en").with_extra("type", "question");
        assert_eq!(record.event_type, EventType::Blocked);
        assert!(record.extra.is_empty());
    }

    #[test]
    fn test_lenient_parse() {
        let record: EventRecord = serde_json::from_str(r#"{"type":"question"}"#).unwrap();
        assert_eq!(record.event_type, EventType::Question);
        assert_eq!(record.lang, "en");
        assert_eq!(record.sid, "");

        let record: EventRecord =
            serde_json::from_str(r#"{"ts":1,"sid":null,"type":"feedback","lang":null,"rating":5}"#).unwrap();
        assert_eq!(record.ts, "1");
        assert_eq!(record.event_type, EventType::Other("feedback".into()));
        assert_eq!(record.lang, "en");
        assert_eq!(record.extra["rating"], 5);
    }

    #[test]
    fn test_timestamp_round_trip() {
        let record = EventRecord::new(EventType::SessionStart, "s", "en");
        assert!(record.ts.ends_with('Z'));
        assert!(record.timestamp().is_some());
    }
}
