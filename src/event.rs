//! Raw events emitted by the protocol engine.

use crate::engine::{ConnectionId, DeliveryId, LinkId, SessionId, TransportId};

/// A raw engine event together with the objects it implicates.
///
/// The adapter matches on this enum exhaustively, so adding an engine event
/// kind requires deciding how it is routed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Event {
    /// The reactor or container started.
    ReactorInit,
    /// A connection object was created.
    ConnectionInit {
        /// Connection created.
        connection: ConnectionId,
    },
    /// The application opened the local end of a connection.
    ConnectionLocalOpen {
        /// Connection opened.
        connection: ConnectionId,
    },
    /// The peer opened a connection.
    ConnectionRemoteOpen {
        /// Connection opened by the peer.
        connection: ConnectionId,
    },
    /// The application closed the local end of a connection.
    ConnectionLocalClose {
        /// Connection closed.
        connection: ConnectionId,
    },
    /// The peer closed a connection.
    ConnectionRemoteClose {
        /// Connection closed by the peer.
        connection: ConnectionId,
    },
    /// The engine released a connection; its context may be dropped.
    ConnectionFinal {
        /// Connection released.
        connection: ConnectionId,
    },
    /// The application began the local end of a session.
    SessionLocalOpen {
        /// Session opened.
        session: SessionId,
    },
    /// The peer began a session.
    SessionRemoteOpen {
        /// Session opened by the peer.
        session: SessionId,
    },
    /// The application ended the local end of a session.
    SessionLocalClose {
        /// Session closed.
        session: SessionId,
    },
    /// The peer ended a session.
    SessionRemoteClose {
        /// Session closed by the peer.
        session: SessionId,
    },
    /// The application attached the local end of a link.
    LinkLocalOpen {
        /// Link opened, if the engine still knows it.
        link: Option<LinkId>,
    },
    /// The peer attached a link.
    LinkRemoteOpen {
        /// Link opened by the peer.
        link: LinkId,
    },
    /// The application detached the local end of a link.
    LinkLocalClose {
        /// Link closed.
        link: LinkId,
    },
    /// The peer detached a link.
    LinkRemoteClose {
        /// Link closed by the peer.
        link: LinkId,
    },
    /// Credit or drain state changed on a link.
    LinkFlow {
        /// Link whose flow state changed, if the engine still knows it.
        link: Option<LinkId>,
    },
    /// The engine released a link; its context may be dropped.
    LinkFinal {
        /// Link released.
        link: LinkId,
    },
    /// A delivery arrived or its state changed.
    Delivery {
        /// Link carrying the delivery.
        link: LinkId,
        /// Delivery that changed.
        delivery: DeliveryId,
    },
    /// The transport stopped accepting input.
    TransportTailClosed {
        /// Connection bound to the transport, if any.
        connection: Option<ConnectionId>,
        /// Transport whose input closed.
        transport: TransportId,
    },
    /// The transport stopped producing output.
    TransportHeadClosed {
        /// Transport whose output closed.
        transport: TransportId,
    },
    /// A scheduled timer fired.
    TimerTask,
}

impl Event {
    /// Short, stable name of the event kind used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ReactorInit => "reactor_init",
            Self::ConnectionInit { .. } => "connection_init",
            Self::ConnectionLocalOpen { .. } => "connection_local_open",
            Self::ConnectionRemoteOpen { .. } => "connection_remote_open",
            Self::ConnectionLocalClose { .. } => "connection_local_close",
            Self::ConnectionRemoteClose { .. } => "connection_remote_close",
            Self::ConnectionFinal { .. } => "connection_final",
            Self::SessionLocalOpen { .. } => "session_local_open",
            Self::SessionRemoteOpen { .. } => "session_remote_open",
            Self::SessionLocalClose { .. } => "session_local_close",
            Self::SessionRemoteClose { .. } => "session_remote_close",
            Self::LinkLocalOpen { .. } => "link_local_open",
            Self::LinkRemoteOpen { .. } => "link_remote_open",
            Self::LinkLocalClose { .. } => "link_local_close",
            Self::LinkRemoteClose { .. } => "link_remote_close",
            Self::LinkFlow { .. } => "link_flow",
            Self::LinkFinal { .. } => "link_final",
            Self::Delivery { .. } => "delivery",
            Self::TransportTailClosed { .. } => "transport_tail_closed",
            Self::TransportHeadClosed { .. } => "transport_head_closed",
            Self::TimerTask => "timer_task",
        }
    }
}
