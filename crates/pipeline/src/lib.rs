//! Connector SDK for the hookstream bridge.
//!
//! Defines what a connector is to the host pipeline: the shared data
//! model ([`Record`], [`Envelope`]), the [`Source`] and [`Sink`] traits
//! with their terminal outcomes, the error taxonomy, configuration
//! parameter helpers, and the registry connector crates install
//! themselves into.

pub mod error;
pub mod params;
pub mod plugin;
pub mod record;
pub mod registry;

pub use {
    error::{Error, Result},
    params::Params,
    plugin::{RecordWriter, Sink, Source, StopHandle, StreamEnd},
    record::{Envelope, Record},
    registry::{ConnectorRegistry, SinkCreator, SourceCreator},
};
