use std::collections::HashMap;

use {async_trait::async_trait, tracing::debug};

use crate::{
    error::{Error, Result},
    params::Params,
    plugin::{Sink, Source},
};

/// Builds a source from a configuration mapping.
#[async_trait]
pub trait SourceCreator: Send + Sync {
    async fn create(&self, params: &Params) -> Result<Box<dyn Source>>;
}

/// Builds a sink from a configuration mapping.
#[async_trait]
pub trait SinkCreator: Send + Sync {
    async fn create(&self, params: &Params) -> Result<Box<dyn Sink>>;
}

/// Registry of named connector creators.
///
/// Connector crates install their creators under a well-known name; the
/// host resolves names to live sources and sinks at topology build time.
#[derive(Default)]
pub struct ConnectorRegistry {
    sources: HashMap<String, Box<dyn SourceCreator>>,
    sinks: HashMap<String, Box<dyn SinkCreator>>,
}

impl ConnectorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a source creator. Re-registering a name is an error.
    pub fn register_source(&mut self, name: &str, creator: Box<dyn SourceCreator>) -> Result<()> {
        if self.sources.contains_key(name) {
            return Err(Error::config(format!(
                "source '{name}' is already registered"
            )));
        }
        debug!(name, "registered source creator");
        self.sources.insert(name.to_string(), creator);
        Ok(())
    }

    /// Registers a sink creator. Re-registering a name is an error.
    pub fn register_sink(&mut self, name: &str, creator: Box<dyn SinkCreator>) -> Result<()> {
        if self.sinks.contains_key(name) {
            return Err(Error::config(format!("sink '{name}' is already registered")));
        }
        debug!(name, "registered sink creator");
        self.sinks.insert(name.to_string(), creator);
        Ok(())
    }

    /// Builds a source by registered name.
    pub async fn create_source(&self, name: &str, params: &Params) -> Result<Box<dyn Source>> {
        let creator = self
            .sources
            .get(name)
            .ok_or_else(|| Error::config(format!("unknown source '{name}'")))?;
        creator.create(params).await
    }

    /// Builds a sink by registered name.
    pub async fn create_sink(&self, name: &str, params: &Params) -> Result<Box<dyn Sink>> {
        let creator = self
            .sinks
            .get(name)
            .ok_or_else(|| Error::config(format!("unknown sink '{name}'")))?;
        creator.create(params).await
    }

    #[must_use]
    pub fn sources(&self) -> Vec<&str> {
        self.sources.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn sinks(&self) -> Vec<&str> {
        self.sinks.keys().map(String::as_str).collect()
    }
}
