//! Optional convenience imports for writing handlers.
//!
//! This module is intentionally small and focused on high-frequency types.
//! Prefer importing specialised APIs directly from their owning modules.
//!
//! # Examples
//!
//! ```rust
//! use amqp_adapter::prelude::*;
//!
//! struct Printer;
//!
//! impl<E: Engine> Handler<E> for Printer {
//!     fn on_message(&mut self, _ctx: &mut Context<'_, E>, _delivery: DeliveryId, msg: &Message) {
//!         println!("{} bytes", msg.body.len());
//!     }
//! }
//! ```

pub use crate::{
    adapter::MessagingAdapter,
    config::{AdapterConfig, LinkOptions},
    container::Container,
    engine::{ConnectionId, DeliveryId, Engine, LinkId, SessionId, TransportId},
    event::Event,
    handler::{Context, Handler},
    message::Message,
    notification::Notification,
};
