use std::{io, net::SocketAddr};

use {
    async_trait::async_trait,
    axum::{Form, Router, extract::State, http::StatusCode, routing::any},
    tokio::{net::TcpListener, sync::mpsc},
    tracing::{debug, info},
};

use hookstream_pipeline::{
    Error, Result,
    params::Params,
    plugin::{RecordWriter, Source, StopHandle, StreamEnd},
    record::{Envelope, Record},
};

use crate::config::ListenerConfig;

/// Inbound webhook listener.
///
/// Live from the moment [`bind`](WebhookListener::bind) returns: the
/// endpoint is bound and served on a background task. Requests decode
/// into a [`Record`] and block on a capacity-1 hand-off until the
/// consumer loop accepts them — the sole point where request
/// concurrency collapses to sequential order.
pub struct WebhookListener {
    record_rx: mpsc::Receiver<Record>,
    fault_rx: mpsc::Receiver<io::Error>,
    stop: StopHandle,
    local_addr: SocketAddr,
}

#[derive(Clone)]
struct HandlerState {
    record_tx: mpsc::Sender<Record>,
    stop: StopHandle,
}

impl WebhookListener {
    /// Resolves configuration, binds the endpoint, and starts serving.
    ///
    /// Fails with a configuration error when `api_header` or `port` is
    /// malformed, and with a bind error when the endpoint is
    /// unavailable; no partially-initialized listener is ever returned.
    pub async fn bind(params: &Params) -> Result<Self> {
        let config = ListenerConfig::from_params(params)?;
        let addr = config.socket_addr()?;
        let tcp = TcpListener::bind(addr).await.map_err(|source| Error::Bind {
            addr: config.listen.clone(),
            source,
        })?;
        let local_addr = tcp.local_addr().map_err(|source| Error::Bind {
            addr: config.listen.clone(),
            source,
        })?;

        let (record_tx, record_rx) = mpsc::channel(1);
        let (fault_tx, fault_rx) = mpsc::channel(1);
        let stop = StopHandle::new();

        let state = HandlerState {
            record_tx,
            stop: stop.clone(),
        };
        let app = Router::new()
            .route(&config.path, any(receive))
            .with_state(state);

        let server_stop = stop.clone();
        tokio::spawn(async move {
            tokio::select! {
                result = axum::serve(tcp, app).into_future() => {
                    if let Err(err) = result {
                        let _ = fault_tx.send(err).await;
                    }
                }
                () = server_stop.stopped() => {
                    // Dropping the server releases the bound endpoint.
                }
            }
        });
        info!(addr = %local_addr, path = %config.path, "webhook listener started");

        Ok(Self {
            record_rx,
            fault_rx,
            stop,
            local_addr,
        })
    }

    /// Address the endpoint is actually bound to.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

/// Decodes the webhook fields and hands the record to the consumer
/// loop. Responds 200 once the hand-off is accepted — accepted, not
/// processed: downstream forwarding happens after the response.
async fn receive(State(state): State<HandlerState>, Form(record): Form<Record>) -> StatusCode {
    if state.stop.is_stopped() {
        return StatusCode::SERVICE_UNAVAILABLE;
    }
    tokio::select! {
        result = state.record_tx.send(record) => match result {
            Ok(()) => StatusCode::OK,
            Err(_) => StatusCode::SERVICE_UNAVAILABLE,
        },
        () = state.stop.stopped() => StatusCode::SERVICE_UNAVAILABLE,
    }
}

#[async_trait]
impl Source for WebhookListener {
    async fn generate_stream(&mut self, writer: &dyn RecordWriter) -> StreamEnd {
        loop {
            tokio::select! {
                biased;

                Some(record) = self.record_rx.recv() => {
                    let envelope = Envelope::now(record);
                    debug!(user = %envelope.record.user_name, "forwarding record downstream");
                    if let Err(err) = writer.write(envelope).await {
                        return StreamEnd::DownstreamFailure(err);
                    }
                }
                Some(fault) = self.fault_rx.recv() => {
                    return StreamEnd::TransportFault(Error::Transport { source: fault });
                }
                () = self.stop.stopped() => {
                    return StreamEnd::Stopped;
                }
            }
        }
    }

    fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }
}
