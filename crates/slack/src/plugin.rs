use async_trait::async_trait;

use hookstream_pipeline::{
    Result,
    params::Params,
    plugin::{Sink, Source},
    registry::{ConnectorRegistry, SinkCreator, SourceCreator},
};

use crate::{listener::WebhookListener, publisher::WebhookPublisher};

/// Registry name both connector halves are installed under.
pub const CONNECTOR_NAME: &str = "slack";

/// Creates webhook listeners for the registry.
#[derive(Debug, Default)]
pub struct SlackSourceCreator;

#[async_trait]
impl SourceCreator for SlackSourceCreator {
    async fn create(&self, params: &Params) -> Result<Box<dyn Source>> {
        Ok(Box::new(WebhookListener::bind(params).await?))
    }
}

/// Creates webhook publishers for the registry.
#[derive(Debug, Default)]
pub struct SlackSinkCreator;

#[async_trait]
impl SinkCreator for SlackSinkCreator {
    async fn create(&self, params: &Params) -> Result<Box<dyn Sink>> {
        Ok(Box::new(WebhookPublisher::from_params(params)?))
    }
}

/// Installs the slack source and sink creators into `registry`.
pub fn register(registry: &mut ConnectorRegistry) -> Result<()> {
    registry.register_source(CONNECTOR_NAME, Box::new(SlackSourceCreator))?;
    registry.register_sink(CONNECTOR_NAME, Box::new(SlackSinkCreator))
}
