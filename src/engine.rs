//! Interface to the AMQP 1.0 protocol engine.
//!
//! The engine owns every connection, session, link, delivery and transport.
//! The adapter only refers to those objects through the copyable identities
//! defined here and reads or mutates them through the [`Engine`] trait.

use std::{fmt, ops::BitOr};

use bytes::Bytes;

macro_rules! engine_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u64);

        impl $name {
            /// Create an identity from the engine's raw handle value.
            #[must_use]
            pub const fn new(id: u64) -> Self { Self(id) }

            /// Return the raw handle value.
            #[must_use]
            pub const fn as_u64(self) -> u64 { self.0 }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self { Self(value) }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

engine_id!(
    /// Identity of an engine connection.
    ConnectionId
);
engine_id!(
    /// Identity of an engine session.
    SessionId
);
engine_id!(
    /// Identity of an engine link (sender or receiver).
    LinkId
);
engine_id!(
    /// Identity of a single transfer on a link.
    DeliveryId
);
engine_id!(
    /// Identity of the transport bound to a connection.
    TransportId
);

/// Local and remote endpoint state flags.
///
/// Each endpoint carries exactly one local and one remote flag; the adapter
/// only ever inspects the local half before deciding to open or close.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EndpointState(u8);

impl EndpointState {
    /// The local endpoint has not been opened or closed yet.
    pub const LOCAL_UNINIT: Self = Self(0b0000_0001);
    /// The local endpoint is open.
    pub const LOCAL_ACTIVE: Self = Self(0b0000_0010);
    /// The local endpoint is closed.
    pub const LOCAL_CLOSED: Self = Self(0b0000_0100);
    /// The peer has not opened the endpoint yet.
    pub const REMOTE_UNINIT: Self = Self(0b0000_1000);
    /// The peer has opened the endpoint.
    pub const REMOTE_ACTIVE: Self = Self(0b0001_0000);
    /// The peer has closed the endpoint.
    pub const REMOTE_CLOSED: Self = Self(0b0010_0000);

    /// Return the raw flag bits.
    #[must_use]
    pub const fn bits(self) -> u8 { self.0 }

    /// Whether every flag in `other` is also set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool { self.0 & other.0 == other.0 }

    /// Whether the local endpoint is open.
    #[must_use]
    pub const fn is_local_open(self) -> bool { self.contains(Self::LOCAL_ACTIVE) }

    /// Whether the local endpoint has never been touched.
    #[must_use]
    pub const fn is_local_uninitialised(self) -> bool { self.contains(Self::LOCAL_UNINIT) }

    /// Whether the local endpoint is closed.
    #[must_use]
    pub const fn is_local_closed(self) -> bool { self.contains(Self::LOCAL_CLOSED) }
}

impl BitOr for EndpointState {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output { Self(self.0 | rhs.0) }
}

impl fmt::Debug for EndpointState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(EndpointState, &str); 6] = [
            (EndpointState::LOCAL_UNINIT, "LOCAL_UNINIT"),
            (EndpointState::LOCAL_ACTIVE, "LOCAL_ACTIVE"),
            (EndpointState::LOCAL_CLOSED, "LOCAL_CLOSED"),
            (EndpointState::REMOTE_UNINIT, "REMOTE_UNINIT"),
            (EndpointState::REMOTE_ACTIVE, "REMOTE_ACTIVE"),
            (EndpointState::REMOTE_CLOSED, "REMOTE_CLOSED"),
        ];
        let mut set = f.debug_set();
        for (flag, name) in NAMES {
            if self.contains(flag) {
                set.entry(&format_args!("{name}"));
            }
        }
        set.finish()
    }
}

/// Direction of a link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The local end transfers messages to the peer.
    Sender,
    /// The local end receives messages from the peer.
    Receiver,
}

/// Outcome the peer reported for a delivery.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RemoteState {
    /// No disposition has been reported yet.
    #[default]
    None,
    /// The peer processed the message.
    Accepted,
    /// The peer refused the message as invalid.
    Rejected,
    /// The peer returned the message unprocessed.
    Released,
    /// The peer returned the message with modifications.
    Modified,
}

/// Snapshot of a delivery's flags as reported by the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeliveryStatus {
    /// More transfer frames are still expected.
    pub partial: bool,
    /// The payload has arrived and can be read.
    pub readable: bool,
    /// The remote state changed since the delivery was last inspected.
    pub updated: bool,
    /// The delivery is finalised.
    pub settled: bool,
    /// Disposition reported by the peer.
    pub remote_state: RemoteState,
}

/// Error condition attached to an endpoint or transport.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Condition {
    /// Symbolic condition name, for example `amqp:not-found`.
    pub name: String,
    /// Human readable detail.
    pub description: String,
}

impl Condition {
    /// Build a condition from a name and description.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// A condition is set when it carries a name.
    #[must_use]
    pub fn is_set(&self) -> bool { !self.name.is_empty() }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}: {}", self.name, self.description)
        }
    }
}

/// Returns `true` when `condition` is present and set.
pub(crate) fn condition_is_set(condition: Option<&Condition>) -> bool {
    condition.is_some_and(Condition::is_set)
}

/// Operations the adapter needs from the protocol engine.
///
/// Queries take `&self`; every state change goes through a `&mut self`
/// method. Implementations must treat unknown identities as a programming
/// error on the caller's side and may panic.
pub trait Engine {
    /// Local and remote state of a connection.
    fn connection_state(&self, connection: ConnectionId) -> EndpointState;
    /// Condition the peer attached when closing the connection.
    fn connection_remote_condition(&self, connection: ConnectionId) -> Option<&Condition>;
    /// Open the local end of a connection.
    fn open_connection(&mut self, connection: ConnectionId);
    /// Close the local end of a connection.
    fn close_connection(&mut self, connection: ConnectionId);

    /// Local and remote state of a session.
    fn session_state(&self, session: SessionId) -> EndpointState;
    /// Condition the peer attached when ending the session.
    fn session_remote_condition(&self, session: SessionId) -> Option<&Condition>;
    /// Connection owning `session`.
    fn session_connection(&self, session: SessionId) -> ConnectionId;
    /// Begin the local end of a session.
    fn open_session(&mut self, session: SessionId);
    /// End the local end of a session.
    fn close_session(&mut self, session: SessionId);

    /// Local and remote state of a link.
    fn link_state(&self, link: LinkId) -> EndpointState;
    /// Whether the link sends or receives.
    fn link_role(&self, link: LinkId) -> Role;
    /// Credit currently outstanding on the link.
    fn link_credit(&self, link: LinkId) -> i32;
    /// Condition the peer attached when detaching the link.
    fn link_remote_condition(&self, link: LinkId) -> Option<&Condition>;
    /// Session owning `link`.
    fn link_session(&self, link: LinkId) -> SessionId;
    /// Attach the local end of a link.
    fn open_link(&mut self, link: LinkId);
    /// Detach the local end of a link.
    fn close_link(&mut self, link: LinkId);
    /// Grant `delta` additional credit on a receiver link.
    fn flow(&mut self, link: LinkId, delta: i32);

    /// Current flags of a delivery.
    fn delivery_status(&self, delivery: DeliveryId) -> DeliveryStatus;
    /// Bytes received for a delivery so far.
    fn delivery_payload(&self, delivery: DeliveryId) -> &[u8];
    /// Accept and settle a delivery.
    fn accept(&mut self, delivery: DeliveryId);
    /// Reject and settle a delivery.
    fn reject(&mut self, delivery: DeliveryId);
    /// Release and settle a delivery so the peer may redeliver it.
    fn release(&mut self, delivery: DeliveryId);
    /// Settle a delivery without changing its local state.
    fn settle(&mut self, delivery: DeliveryId);
    /// Transfer an encoded message on a sender link.
    fn send(&mut self, link: LinkId, payload: Bytes) -> DeliveryId;

    /// Condition recorded on the transport, if any.
    fn transport_condition(&self, transport: TransportId) -> Option<&Condition>;
}

/// Single-method pull interface yielding raw engine events in order.
pub trait EventSource {
    /// Return the next pending event, or `None` when the engine is idle.
    fn next_event(&mut self) -> Option<crate::event::Event>;
}
