//! The captured webhook event entity.
//!
//! An [`Event`] is one inbound request recorded as a structured, immutable
//! record: headers, optional JSON body, query parameters, method, path, a
//! capture timestamp, and a generated unique id. Events are created once at
//! capture time and never mutated afterwards.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One captured inbound request.
///
/// The serialized field names are the durable record format: every event is
/// written to disk as a single JSON document with exactly these keys, and
/// read back through the same struct. `body` is absent for captures taken
/// through the body-less GET variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique id, assigned at capture time and immutable afterwards.
    pub id: String,

    /// Capture time.
    pub timestamp: DateTime<Utc>,

    /// Request headers as received.
    pub headers: BTreeMap<String, String>,

    /// Request body as arbitrary JSON; absent for the GET capture variant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,

    /// Query string parameters as received.
    pub query: BTreeMap<String, String>,

    /// HTTP method of the originating request.
    pub method: String,

    /// Path of the originating request.
    pub path: String,
}

impl Event {
    /// Construct a new event with a fresh id and the current time.
    pub fn capture(
        method: impl Into<String>,
        path: impl Into<String>,
        headers: BTreeMap<String, String>,
        query: BTreeMap<String, String>,
        body: Option<serde_json::Value>,
    ) -> Self {
        Self {
            id: generate_event_id(),
            timestamp: Utc::now(),
            headers,
            body,
            query,
            method: method.into(),
            path: path.into(),
        }
    }

    /// The file name this event is persisted under.
    pub fn file_name(&self) -> String {
        format!("webhook_{}.json", self.id)
    }
}

/// Generate a unique event id: millisecond timestamp plus a random suffix.
///
/// The timestamp prefix keeps ids roughly sortable by arrival; the suffix
/// makes collisions under concurrent captures within the same millisecond
/// vanishingly unlikely.
pub fn generate_event_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}{}", millis, &suffix[..9])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let ids: std::collections::HashSet<String> =
            (0..1000).map(|_| generate_event_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_id_has_timestamp_prefix_and_suffix() {
        let before = Utc::now().timestamp_millis();
        let id = generate_event_id();
        let after = Utc::now().timestamp_millis();

        let (prefix, suffix) = id.split_at(id.len() - 9);
        let millis: i64 = prefix.parse().expect("prefix should be numeric");
        assert!(millis >= before && millis <= after);
        assert_eq!(suffix.len(), 9);
    }

    #[test]
    fn test_event_serializes_without_absent_body() {
        let event = Event::capture("GET", "/hook", BTreeMap::new(), BTreeMap::new(), None);
        let json = serde_json::to_value(&event).unwrap();

        assert!(json.get("body").is_none());
        assert_eq!(json["method"], "GET");
        assert_eq!(json["path"], "/hook");
    }

    #[test]
    fn test_event_round_trips_through_record_format() {
        let mut headers = BTreeMap::new();
        headers.insert("content-type".into(), "application/json".into());

        let event = Event::capture(
            "POST",
            "/hook",
            headers,
            BTreeMap::new(),
            Some(serde_json::json!({"a": 1})),
        );

        let serialized = serde_json::to_string_pretty(&event).unwrap();
        let parsed: Event = serde_json::from_str(&serialized).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_file_name_is_keyed_by_id() {
        let event = Event::capture("POST", "/hook", BTreeMap::new(), BTreeMap::new(), None);
        assert_eq!(event.file_name(), format!("webhook_{}.json", event.id));
    }
}
