use std::{
    io,
    net::{Ipv4Addr, SocketAddr},
};

use {serde_json::Value, tracing::warn};

use hookstream_pipeline::{
    Error, Result,
    params::{Params, optional_str, required_str},
};

/// Port the listener binds when the `port` option is absent.
pub const DEFAULT_PORT: u16 = 15619;

/// Resolved listener options.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// URL path the webhook endpoint is mounted at.
    pub path: String,
    /// Listen address in `:<port>` form.
    pub listen: String,
}

impl ListenerConfig {
    /// Resolves `api_header` (default `/`) and `port` (default
    /// [`DEFAULT_PORT`]; integer, or string with or without the leading
    /// `:`). A `port` of any other shape is a configuration error.
    pub fn from_params(params: &Params) -> Result<Self> {
        let path = optional_str(params, "api_header")?.unwrap_or_else(|| "/".to_string());
        if !path.starts_with('/') {
            return Err(Error::config(format!(
                "'api_header' must start with '/', got '{path}'"
            )));
        }
        let listen = match params.get("port") {
            None => format!(":{DEFAULT_PORT}"),
            Some(value) => normalize_port(value)?,
        };
        Ok(Self { path, listen })
    }

    /// Socket address for binding. A `listen` string that does not name
    /// a port surfaces at bind level, the same way a raw listen call
    /// would reject it.
    pub(crate) fn socket_addr(&self) -> Result<SocketAddr> {
        let port: u16 = self
            .listen
            .trim_start_matches(':')
            .parse()
            .map_err(|_| Error::Bind {
                addr: self.listen.clone(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "invalid port in address"),
            })?;
        Ok(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)))
    }
}

fn normalize_port(value: &Value) -> Result<String> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(|port| format!(":{port}"))
            .ok_or_else(|| Error::config("'port' must be an integer or a string")),
        Value::String(s) if s.starts_with(':') => Ok(s.clone()),
        Value::String(s) => Ok(format!(":{s}")),
        _ => Err(Error::config("'port' must be an integer or a string")),
    }
}

/// Resolved publisher options. Immutable after construction; per-message
/// overrides are resolved into call-local values, never written back
/// here.
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// Destination webhook URL.
    pub hook: String,
    pub default_channel: String,
    pub default_username: String,
    pub default_icon_url: String,
    pub default_icon_emoji: String,
}

impl PublisherConfig {
    /// Resolves `hook` (required) and the four optional defaults. When
    /// both icon defaults are non-empty, the URL wins and the emoji is
    /// cleared with a warning.
    pub fn from_params(params: &Params) -> Result<Self> {
        let hook = required_str(params, "hook")?;
        let default_channel = optional_str(params, "default_channel")?.unwrap_or_default();
        let default_username = optional_str(params, "default_username")?.unwrap_or_default();
        let default_icon_url = optional_str(params, "default_icon_url")?.unwrap_or_default();
        let mut default_icon_emoji = optional_str(params, "default_icon_emoji")?.unwrap_or_default();

        if !default_icon_url.is_empty() && !default_icon_emoji.is_empty() {
            warn!(
                icon_url = %default_icon_url,
                "'default_icon_emoji' suppressed: 'default_icon_url' takes priority"
            );
            default_icon_emoji = String::new();
        }

        Ok(Self {
            hook,
            default_channel,
            default_username,
            default_icon_url,
            default_icon_emoji,
        })
    }
}
