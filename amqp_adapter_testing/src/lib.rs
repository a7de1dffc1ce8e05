//! Utilities for driving a [`MessagingAdapter`](amqp_adapter::MessagingAdapter)
//! against an in-memory engine during tests.
//!
//! [`MockEngine`] answers the adapter's queries and journals its mutations;
//! [`RecordingHandler`] journals the notifications it receives, so tests can
//! assert both what happened and in which order.
//!
//! ```rust
//! use amqp_adapter::{Event, MessagingAdapter, Notification};
//! use amqp_adapter_testing::{MockEngine, RecordingHandler};
//!
//! let mut engine = MockEngine::new();
//! let connection = engine.connection();
//! let mut handler = RecordingHandler::new();
//! MessagingAdapter::new(&mut handler)
//!     .dispatch(&mut engine, &Event::ConnectionRemoteOpen { connection });
//! assert_eq!(handler.kinds(), vec![Notification::ConnectionOpen]);
//! ```

pub mod engine;
pub mod handler;
pub mod logging;
pub mod macros;
pub mod metrics;

pub use engine::{Action, MockEngine, Record};
pub use handler::{Call, MessageReaction, RecordingHandler};
pub use logging::{LoggerHandle, logger};
pub use crate::metrics::{capture_metrics, counter_total};

/// Encode `message` with the adapter's default codec.
///
/// # Panics
///
/// Panics if the message cannot be encoded.
#[must_use]
pub fn encoded(message: &amqp_adapter::Message) -> Vec<u8> {
    use amqp_adapter::MessageCodec;

    amqp_adapter::BincodeCodec
        .encode(message)
        .expect("message should encode")
}
