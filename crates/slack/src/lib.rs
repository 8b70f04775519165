//! Slack webhook connector for the hookstream bridge.
//!
//! Two halves: [`WebhookListener`] turns outgoing-webhook HTTP calls
//! into a sequential stream of records over a capacity-1 hand-off, and
//! [`WebhookPublisher`] resolves records against connector defaults and
//! POSTs them to an incoming-webhook URL.

pub mod config;
pub mod listener;
pub mod payload;
pub mod plugin;
pub mod publisher;

pub use {
    config::{DEFAULT_PORT, ListenerConfig, PublisherConfig},
    listener::WebhookListener,
    payload::Payload,
    plugin::{CONNECTOR_NAME, SlackSinkCreator, SlackSourceCreator, register},
    publisher::WebhookPublisher,
};
