use {
    async_trait::async_trait,
    serde_json::{Map, Value},
    tokio_util::sync::CancellationToken,
};

use crate::{
    error::{Error, Result},
    record::Envelope,
};

/// Downstream writer capability supplied by the host pipeline.
///
/// Called synchronously from a source's consumer loop; the loop does not
/// accept the next record until the call returns. A returned error
/// terminates the stream.
#[async_trait]
pub trait RecordWriter: Send + Sync {
    async fn write(&self, envelope: Envelope) -> Result<()>;
}

/// Terminal outcome of a source's consumer loop.
///
/// The three variants are mutually exclusive: a stream ends exactly one
/// way, and the caller can tell graceful shutdown from failure.
#[derive(Debug)]
pub enum StreamEnd {
    /// The stop signal was observed.
    Stopped,
    /// The listening endpoint itself faulted.
    TransportFault(Error),
    /// The downstream writer returned an error.
    DownstreamFailure(Error),
}

impl StreamEnd {
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }
}

/// Cloneable one-shot stop signal for a running source.
///
/// `stop` is idempotent by construction: the underlying token cancel is
/// a check-and-set, so any number of callers may fire it.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    token: CancellationToken,
}

impl StopHandle {
    #[must_use]
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Fires the stop signal. Safe to call any number of times.
    pub fn stop(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Completes once the stop signal has fired.
    pub async fn stopped(&self) {
        self.token.cancelled().await;
    }
}

/// A connector source: turns an external event surface into a sequential
/// stream of envelopes.
#[async_trait]
pub trait Source: Send {
    /// Runs the single-consumer loop, forwarding each envelope to
    /// `writer` until a terminal outcome is reached. Records are
    /// processed one at a time: the next one is not accepted while
    /// `writer` is still running.
    async fn generate_stream(&mut self, writer: &dyn RecordWriter) -> StreamEnd;

    /// Handle for signalling the source to stop from another task.
    fn stop_handle(&self) -> StopHandle;
}

/// A connector sink: publishes one record per call.
///
/// Implementations hold no mutable state across calls, so `write` may be
/// invoked concurrently without synchronization.
#[async_trait]
pub trait Sink: Send + Sync {
    async fn write(&self, record: &Map<String, Value>) -> Result<()>;

    /// Releases whatever the sink holds. Must be safe to call multiple
    /// times.
    async fn close(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_handle_is_idempotent() {
        let handle = StopHandle::new();
        assert!(!handle.is_stopped());
        handle.stop();
        handle.stop();
        assert!(handle.is_stopped());
    }

    #[test]
    fn stop_handle_clones_share_the_signal() {
        let handle = StopHandle::new();
        let clone = handle.clone();
        clone.stop();
        assert!(handle.is_stopped());
    }

    #[tokio::test]
    async fn stopped_completes_after_stop() {
        let handle = StopHandle::new();
        handle.stop();
        handle.stopped().await;
    }

    #[test]
    fn stream_end_distinguishes_stopped() {
        assert!(StreamEnd::Stopped.is_stopped());
        assert!(!StreamEnd::DownstreamFailure(Error::downstream("x")).is_stopped());
    }
}
