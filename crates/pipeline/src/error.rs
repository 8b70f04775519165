use std::io;

use thiserror::Error;

/// Crate-wide result type for connector operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed errors shared across connector traits.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad or missing construction-time configuration. The connector
    /// never starts.
    #[error("invalid connector configuration: {message}")]
    Config { message: String },

    /// The listening endpoint could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// A record field has the wrong shape for coercion. Aborts one
    /// write or decode only.
    #[error("field '{field}' is not {expected}")]
    Type {
        field: &'static str,
        expected: &'static str,
    },

    /// Outbound delivery failed. Reported to the caller; never retried
    /// here.
    #[error("delivery to {hook} failed: {source}")]
    Delivery {
        hook: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The listening endpoint itself faulted while serving.
    #[error("listener transport fault: {source}")]
    Transport {
        #[source]
        source: io::Error,
    },

    /// The downstream writer supplied by the host pipeline failed.
    #[error("downstream writer failed: {message}")]
    Downstream { message: String },
}

impl Error {
    #[must_use]
    pub fn config(message: impl std::fmt::Display) -> Self {
        Self::Config {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn type_mismatch(field: &'static str, expected: &'static str) -> Self {
        Self::Type { field, expected }
    }

    #[must_use]
    pub fn delivery(
        hook: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Delivery {
            hook: hook.into(),
            source: Box::new(source),
        }
    }

    #[must_use]
    pub fn downstream(message: impl std::fmt::Display) -> Self {
        Self::Downstream {
            message: message.to_string(),
        }
    }
}
