//! Error types for message encoding and transfer.
//!
//! The adapter never fails while dispatching an event: peer-reported
//! failures reach handlers as `*_error` notifications. The errors below cover
//! the message codec and the [`Context::send`](crate::Context::send) helper.

use std::error::Error;

use thiserror::Error;

use crate::engine::LinkId;

/// Boxed error produced by a codec backend.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Failure to turn delivery bytes into a [`Message`](crate::Message).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// The payload is not a valid encoded message.
    #[error("malformed message payload: {0}")]
    Malformed(#[source] BoxError),
    /// The payload decoded but bytes were left over.
    #[error("{trailing} trailing bytes after message of {consumed} bytes")]
    TrailingBytes {
        /// Bytes consumed by the message.
        consumed: usize,
        /// Bytes left over.
        trailing: usize,
    },
}

/// Failure to transfer a message on a link.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SendError {
    /// The message could not be encoded.
    #[error("failed to encode message: {0}")]
    Encode(#[source] BoxError),
    /// The link does not send.
    #[error("{0} is not a sender link")]
    NotSender(LinkId),
}
