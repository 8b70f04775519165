use {
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
};

/// One decoded inbound webhook event.
///
/// Every field is an opaque string carried through unchanged. Fields
/// absent from the request decode to the empty string; unknown fields
/// are ignored. The serde names double as the wire names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    pub token: String,
    pub team_id: String,
    pub channel_id: String,
    pub channel_name: String,
    pub timestamp: String,
    pub user_id: String,
    pub user_name: String,
    pub text: String,
    pub trigger_word: String,
}

/// A [`Record`] stamped by the bridge and forwarded downstream.
///
/// Both stamps are taken when the consumer loop picks the record up —
/// never from any timestamp carried in the request itself.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub record: Record,
    /// Arrival time.
    pub timestamp: DateTime<Utc>,
    /// Processing time; equals `timestamp` at creation.
    pub proc_timestamp: DateTime<Utc>,
}

impl Envelope {
    /// Wraps `record` with the current time in both stamps.
    #[must_use]
    pub fn now(record: Record) -> Self {
        let now = Utc::now();
        Self {
            record,
            timestamp: now,
            proc_timestamp: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_decodes_missing_fields_to_empty() {
        let record: Record = serde_json::from_value(serde_json::json!({
            "token": "tok",
            "text": "hello",
        }))
        .unwrap();
        assert_eq!(record.token, "tok");
        assert_eq!(record.text, "hello");
        assert_eq!(record.team_id, "");
        assert_eq!(record.trigger_word, "");
    }

    #[test]
    fn record_ignores_unknown_fields() {
        let record: Record = serde_json::from_value(serde_json::json!({
            "text": "hi",
            "ssl_check": "1",
        }))
        .unwrap();
        assert_eq!(record.text, "hi");
    }

    #[test]
    fn envelope_stamps_match_at_creation() {
        let envelope = Envelope::now(Record {
            text: "x".into(),
            ..Record::default()
        });
        assert_eq!(envelope.timestamp, envelope.proc_timestamp);
        assert_eq!(envelope.record.text, "x");
    }
}
