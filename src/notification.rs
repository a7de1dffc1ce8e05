//! Semantic notification kinds raised on the application handler.

use std::fmt;

/// Kind of notification being delivered to a [`Handler`](crate::Handler).
///
/// Every handler method receives a [`Context`](crate::Context) whose
/// [`kind`](crate::Context::kind) reports one of these values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Notification {
    /// The container started.
    Start,
    /// A sender link has credit to transfer messages.
    Sendable,
    /// A complete message arrived.
    Message,
    /// A delivery was settled.
    DeliverySettle,
    /// The peer accepted a delivery.
    DeliveryAccept,
    /// The peer rejected a delivery.
    DeliveryReject,
    /// The peer released or modified a delivery.
    DeliveryRelease,
    /// The peer opened a connection.
    ConnectionOpen,
    /// The peer closed a connection.
    ConnectionClose,
    /// The peer closed a connection with an error condition.
    ConnectionError,
    /// The peer began a session.
    SessionOpen,
    /// The peer ended a session.
    SessionClose,
    /// The peer ended a session with an error condition.
    SessionError,
    /// The peer attached a link.
    LinkOpen,
    /// The peer detached a link.
    LinkClose,
    /// The peer detached a link with an error condition.
    LinkError,
    /// The transport closed.
    TransportClose,
    /// The transport closed with an error condition.
    TransportError,
    /// A container timer fired.
    Timer,
}

impl Notification {
    /// Stable label used for logs and metric labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Sendable => "sendable",
            Self::Message => "message",
            Self::DeliverySettle => "delivery_settle",
            Self::DeliveryAccept => "delivery_accept",
            Self::DeliveryReject => "delivery_reject",
            Self::DeliveryRelease => "delivery_release",
            Self::ConnectionOpen => "connection_open",
            Self::ConnectionClose => "connection_close",
            Self::ConnectionError => "connection_error",
            Self::SessionOpen => "session_open",
            Self::SessionClose => "session_close",
            Self::SessionError => "session_error",
            Self::LinkOpen => "link_open",
            Self::LinkClose => "link_close",
            Self::LinkError => "link_error",
            Self::TransportClose => "transport_close",
            Self::TransportError => "transport_error",
            Self::Timer => "timer",
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}
