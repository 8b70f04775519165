use {
    serde::Serialize,
    serde_json::{Map, Value},
    tracing::warn,
};

use hookstream_pipeline::{Error, Result};

use crate::config::PublisherConfig;

/// Serialized body of one outgoing webhook POST.
///
/// Fields that resolved to empty are left off the wire, except `text`,
/// which the destination always expects. Wire names are fixed by the
/// destination API (`icon_url`, not `iconURL`).
#[derive(Debug, Clone, Serialize)]
pub struct Payload {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub channel: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub username: String,
    pub text: String,
    #[serde(skip_serializing_if = "attachments_empty")]
    pub attachments: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub icon_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub icon_emoji: String,
}

fn attachments_empty(attachments: &Option<Vec<Value>>) -> bool {
    attachments.as_ref().is_none_or(Vec::is_empty)
}

impl Payload {
    /// Resolves a record against the connector defaults.
    ///
    /// A value present on the record wins, even when empty; an absent
    /// field falls back to the configured default. `text` has no
    /// default and resolves to the empty string. Resolution happens in
    /// call-local values only — the configuration is never written.
    pub fn resolve(record: &Map<String, Value>, config: &PublisherConfig) -> Result<Self> {
        let mut payload = Self {
            channel: str_field(record, "channel")?
                .unwrap_or_else(|| config.default_channel.clone()),
            username: str_field(record, "username")?
                .unwrap_or_else(|| config.default_username.clone()),
            text: str_field(record, "text")?.unwrap_or_default(),
            attachments: array_field(record, "attachments")?,
            icon_url: str_field(record, "icon_url")?
                .unwrap_or_else(|| config.default_icon_url.clone()),
            icon_emoji: str_field(record, "icon_emoji")?
                .unwrap_or_else(|| config.default_icon_emoji.clone()),
        };

        // The record can reintroduce the conflict the construction-time
        // rule already settled; the same rule applies to the effective
        // values.
        if !payload.icon_url.is_empty() && !payload.icon_emoji.is_empty() {
            warn!(
                icon_url = %payload.icon_url,
                "'icon_emoji' suppressed: 'icon_url' takes priority"
            );
            payload.icon_emoji = String::new();
        }

        Ok(payload)
    }
}

fn str_field(record: &Map<String, Value>, field: &'static str) -> Result<Option<String>> {
    match record.get(field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(Error::type_mismatch(field, "a string")),
    }
}

fn array_field(record: &Map<String, Value>, field: &'static str) -> Result<Option<Vec<Value>>> {
    match record.get(field) {
        None => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items.clone())),
        Some(_) => Err(Error::type_mismatch(field, "an array")),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use hookstream_pipeline::Params;

    fn config() -> PublisherConfig {
        PublisherConfig {
            hook: "https://example.test/hook".into(),
            default_channel: "channel".into(),
            default_username: "username".into(),
            default_icon_url: "icon_url".into(),
            default_icon_emoji: String::new(),
        }
    }

    fn record(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn empty_record_resolves_to_defaults() {
        let payload = Payload::resolve(&Params::new(), &config()).unwrap();
        assert_eq!(payload.text, "");
        assert_eq!(payload.channel, "channel");
        assert_eq!(payload.username, "username");
        assert_eq!(payload.icon_url, "icon_url");
        assert_eq!(payload.icon_emoji, "");
        assert!(payload.attachments.is_none());
    }

    #[test]
    fn record_values_override_defaults() {
        let payload = Payload::resolve(
            &record(json!({
                "text": "homhom",
                "channel": "_channel",
                "username": "_username",
                "icon_url": "_icon_url",
            })),
            &config(),
        )
        .unwrap();
        assert_eq!(payload.text, "homhom");
        assert_eq!(payload.channel, "_channel");
        assert_eq!(payload.username, "_username");
        assert_eq!(payload.icon_url, "_icon_url");
    }

    #[test]
    fn empty_record_value_wins_over_default() {
        let payload = Payload::resolve(&record(json!({ "channel": "" })), &config()).unwrap();
        assert_eq!(payload.channel, "");
        let encoded = serde_json::to_value(&payload).unwrap();
        assert!(encoded.get("channel").is_none());
    }

    #[test]
    fn default_icon_url_suppresses_record_icon_emoji() {
        let payload =
            Payload::resolve(&record(json!({ "icon_emoji": ":ghost:" })), &config()).unwrap();
        assert_eq!(payload.icon_url, "icon_url");
        assert_eq!(payload.icon_emoji, "");
    }

    #[test]
    fn same_call_icon_conflict_keeps_url_drops_emoji() {
        let payload = Payload::resolve(
            &record(json!({ "icon_url": "u", "icon_emoji": "e" })),
            &config(),
        )
        .unwrap();
        assert_eq!(payload.icon_url, "u");
        assert_eq!(payload.icon_emoji, "");
    }

    #[test]
    fn record_icon_emoji_alone_survives() {
        let mut config = config();
        config.default_icon_url = String::new();
        let payload =
            Payload::resolve(&record(json!({ "icon_emoji": ":tada:" })), &config).unwrap();
        assert_eq!(payload.icon_emoji, ":tada:");
        assert_eq!(payload.icon_url, "");
    }

    #[test]
    fn non_string_field_is_type_error() {
        for field in ["text", "channel", "username", "icon_url", "icon_emoji"] {
            let err = Payload::resolve(&record(json!({ field: 1 })), &config()).unwrap_err();
            assert!(
                matches!(err, Error::Type { field: f, .. } if f == field),
                "field {field}"
            );
        }
    }

    #[test]
    fn non_array_attachments_is_type_error() {
        let err =
            Payload::resolve(&record(json!({ "attachments": "x" })), &config()).unwrap_err();
        assert!(matches!(err, Error::Type { .. }));
    }

    #[test]
    fn attachments_pass_through() {
        let payload = Payload::resolve(
            &record(json!({ "attachments": [{ "pretext": "pretext", "text": "sub_text" }] })),
            &config(),
        )
        .unwrap();
        let encoded = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            encoded["attachments"],
            json!([{ "pretext": "pretext", "text": "sub_text" }])
        );
    }

    #[test]
    fn wire_omits_empty_fields_but_keeps_text() {
        let config = PublisherConfig {
            hook: "h".into(),
            default_channel: String::new(),
            default_username: String::new(),
            default_icon_url: String::new(),
            default_icon_emoji: String::new(),
        };
        let payload = Payload::resolve(&Params::new(), &config).unwrap();
        let encoded = serde_json::to_value(&payload).unwrap();
        assert_eq!(encoded, json!({ "text": "" }));
    }

    #[test]
    fn wire_omits_empty_attachments_array() {
        let payload =
            Payload::resolve(&record(json!({ "attachments": [] })), &config()).unwrap();
        let encoded = serde_json::to_value(&payload).unwrap();
        assert!(encoded.get("attachments").is_none());
    }

    #[test]
    fn wire_field_names_are_exact() {
        let payload = Payload::resolve(
            &record(json!({ "text": "t", "icon_url": "u", "attachments": [{}] })),
            &config(),
        )
        .unwrap();
        let encoded = serde_json::to_value(&payload).unwrap();
        let keys: Vec<&str> = encoded.as_object().unwrap().keys().map(String::as_str).collect();
        for key in ["channel", "username", "text", "attachments", "icon_url"] {
            assert!(keys.contains(&key), "missing {key}");
        }
    }
}
