use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Construction-time configuration mapping for a connector.
///
/// Connectors resolve their recognized keys once, at construction, and
/// stay immutable afterwards.
pub type Params = Map<String, Value>;

/// Returns the string at `key`. Missing or non-string values are
/// configuration errors.
pub fn required_str(params: &Params, key: &str) -> Result<String> {
    match params.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(Error::config(format!("'{key}' must be a string"))),
        None => Err(Error::config(format!("missing required option '{key}'"))),
    }
}

/// Returns the string at `key`, or `None` when the key is absent. A
/// present non-string value is a configuration error, never a silent
/// fallback.
pub fn optional_str(params: &Params, key: &str) -> Result<Option<String>> {
    match params.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(Error::config(format!("'{key}' must be a string"))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn params(value: Value) -> Params {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn required_str_present() {
        let params = params(json!({ "hook": "https://example.test/x" }));
        assert_eq!(
            required_str(&params, "hook").unwrap(),
            "https://example.test/x"
        );
    }

    #[test]
    fn required_str_missing_is_config_error() {
        let err = required_str(&Params::new(), "hook").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn required_str_wrong_type_is_config_error() {
        let params = params(json!({ "hook": 42 }));
        let err = required_str(&params, "hook").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn optional_str_absent_is_none() {
        assert_eq!(optional_str(&Params::new(), "default_channel").unwrap(), None);
    }

    #[test]
    fn optional_str_wrong_type_is_config_error() {
        let params = params(json!({ "default_channel": false }));
        let err = optional_str(&params, "default_channel").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
