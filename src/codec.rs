//! Message codecs.
//!
//! The adapter does not own a wire format for message payloads. A
//! [`MessageCodec`] turns delivery bytes into a [`Message`] and back; the
//! default [`BincodeCodec`] uses `bincode` with its standard configuration.

use bincode::{BorrowDecode, Encode, borrow_decode_from_slice, config, encode_to_vec};

use crate::{
    error::{BoxError, DecodeError},
    message::{Message, assign_text},
};

/// Encoding and decoding of application messages.
pub trait MessageCodec {
    /// Encode `message` into bytes suitable for a transfer.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be represented.
    fn encode(&self, message: &Message) -> Result<Vec<u8>, BoxError>;

    /// Decode `bytes` into `message`, overwriting every field.
    ///
    /// Implementations should reuse the allocations already held by
    /// `message` where possible.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if `bytes` is not a complete message.
    fn decode_into(&self, bytes: &[u8], message: &mut Message) -> Result<(), DecodeError>;
}

/// Codec using `bincode` with its standard configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct BincodeCodec;

#[derive(Encode, BorrowDecode)]
struct WireMessage<'a> {
    id: Option<u64>,
    correlation_id: Option<u64>,
    subject: Option<&'a str>,
    content_type: Option<&'a str>,
    body: &'a [u8],
}

impl MessageCodec for BincodeCodec {
    fn encode(&self, message: &Message) -> Result<Vec<u8>, BoxError> {
        let wire = WireMessage {
            id: message.id,
            correlation_id: message.correlation_id,
            subject: message.subject.as_deref(),
            content_type: message.content_type.as_deref(),
            body: &message.body,
        };
        encode_to_vec(&wire, config::standard()).map_err(|error| Box::new(error) as BoxError)
    }

    fn decode_into(&self, bytes: &[u8], message: &mut Message) -> Result<(), DecodeError> {
        let (wire, consumed): (WireMessage<'_>, usize) =
            borrow_decode_from_slice(bytes, config::standard())
                .map_err(|error| DecodeError::Malformed(Box::new(error)))?;
        if consumed != bytes.len() {
            return Err(DecodeError::TrailingBytes {
                consumed,
                trailing: bytes.len() - consumed,
            });
        }
        message.id = wire.id;
        message.correlation_id = wire.correlation_id;
        assign_text(&mut message.subject, wire.subject);
        assign_text(&mut message.content_type, wire.content_type);
        message.body.clear();
        message.body.extend_from_slice(wire.body);
        Ok(())
    }
}
