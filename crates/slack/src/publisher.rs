use std::time::Duration;

use {
    async_trait::async_trait,
    serde_json::{Map, Value},
    tracing::{debug, warn},
};

use hookstream_pipeline::{Error, Result, params::Params, plugin::Sink};

use crate::{config::PublisherConfig, payload::Payload};

/// Client-side timeout covering connection + response for one delivery.
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Posts resolved payloads to a webhook URL.
///
/// Holds no mutable state: the resolved configuration is read-only after
/// construction and every `write` works on call-local values, so
/// concurrent callers need no synchronization.
pub struct WebhookPublisher {
    config: PublisherConfig,
    http: reqwest::Client,
}

impl WebhookPublisher {
    /// Builds a publisher from a configuration mapping. Fails when
    /// `hook` is missing or any recognized option has the wrong type.
    pub fn from_params(params: &Params) -> Result<Self> {
        let config = PublisherConfig::from_params(params)?;
        let http = reqwest::Client::builder()
            .timeout(DELIVERY_TIMEOUT)
            .build()
            .map_err(|err| Error::config(format!("http client setup failed: {err}")))?;
        Ok(Self { config, http })
    }

    /// Destination webhook URL.
    #[must_use]
    pub fn hook(&self) -> &str {
        &self.config.hook
    }

    async fn post(&self, payload: &Payload) -> Result<()> {
        let response = self
            .http
            .post(&self.config.hook)
            .json(payload)
            .send()
            .await
            .map_err(|err| Error::delivery(&self.config.hook, err))?;
        // The destination's status is not part of the delivery contract;
        // surface it in the log only.
        if !response.status().is_success() {
            warn!(
                hook = %self.config.hook,
                status = %response.status(),
                "webhook destination returned a non-success status"
            );
        }
        Ok(())
    }
}

#[async_trait]
impl Sink for WebhookPublisher {
    async fn write(&self, record: &Map<String, Value>) -> Result<()> {
        let payload = Payload::resolve(record, &self.config)?;
        debug!(hook = %self.config.hook, "delivering payload");
        self.post(&payload).await
    }

    /// Nothing is held open across calls; always succeeds.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
