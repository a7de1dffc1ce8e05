#![doc(html_root_url = "https://docs.rs/amqp_adapter/latest")]
//! Public API for the `amqp_adapter` library.
//!
//! This crate turns the raw, one-event-at-a-time notifications of an AMQP 1.0
//! protocol engine into intention-revealing callbacks on an application
//! [`Handler`], and applies the default protocol reactions a passive
//! application needs to remain a well-behaved peer: credit replenishment,
//! echoed opens and closes, automatic acceptance and settlement.

pub mod adapter;
pub mod codec;
pub mod config;
pub mod container;
pub mod context;
pub mod engine;
pub mod error;
pub mod event;
pub mod handler;
pub mod message;
pub mod metrics;
pub mod notification;
pub mod prelude;

pub use adapter::MessagingAdapter;
pub use codec::{BincodeCodec, MessageCodec};
pub use config::{AdapterConfig, DEFAULT_CREDIT_WINDOW, LinkOptions};
pub use container::{Container, StaticContainer};
pub use context::{ConnectionContext, ContextStore, LinkContext};
pub use engine::{
    Condition,
    ConnectionId,
    DeliveryId,
    DeliveryStatus,
    EndpointState,
    Engine,
    EventSource,
    LinkId,
    RemoteState,
    Role,
    SessionId,
    TransportId,
};
pub use error::{DecodeError, SendError};
pub use event::Event;
pub use handler::{Context, Handler};
pub use message::Message;
pub use notification::Notification;
