//! Side tables holding adapter state the engine objects do not carry.
//!
//! Link contexts hold flow-control and disposition settings. Connection
//! contexts hold the reusable message slot that incoming deliveries are
//! decoded into. Both are keyed by engine identity and created lazily.

use std::collections::HashMap;

use crate::{
    config::AdapterConfig,
    engine::{ConnectionId, LinkId},
    message::Message,
};

/// Per-link settings consulted by the adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkContext {
    /// Target outstanding credit for receiver links; `0` means manual flow
    /// control.
    pub credit_window: u32,
    /// Accept complete messages the handler left unsettled.
    pub auto_accept: bool,
    /// Settle outgoing deliveries once the peer reports on them.
    pub auto_settle: bool,
}

impl Default for LinkContext {
    fn default() -> Self { AdapterConfig::default().link_defaults() }
}

/// Per-connection decode slot.
///
/// The message is overwritten for every incoming delivery on the
/// connection. Reuse is sound only because the adapter dispatches one event
/// at a time on a single thread, so at most one decode is in flight.
#[derive(Debug, Default)]
pub struct ConnectionContext {
    /// Message most recently decoded on this connection.
    pub message: Message,
}

/// Explicit side tables keyed by engine identity.
#[derive(Debug, Default)]
pub struct ContextStore {
    defaults: AdapterConfig,
    links: HashMap<LinkId, LinkContext>,
    connections: HashMap<ConnectionId, ConnectionContext>,
}

impl ContextStore {
    /// Create a store whose link contexts start from `defaults`.
    #[must_use]
    pub fn new(defaults: AdapterConfig) -> Self {
        Self {
            defaults,
            links: HashMap::new(),
            connections: HashMap::new(),
        }
    }

    /// Copy of the link's settings, using the defaults when none exist yet.
    ///
    /// This does not create an entry.
    #[must_use]
    pub fn link(&self, link: LinkId) -> LinkContext {
        self.links
            .get(&link)
            .copied()
            .unwrap_or_else(|| self.defaults.link_defaults())
    }

    /// Mutable access to a link's settings, creating them on first use.
    pub fn link_mut(&mut self, link: LinkId) -> &mut LinkContext {
        let defaults = self.defaults.link_defaults();
        self.links.entry(link).or_insert(defaults)
    }

    /// Drop the context of a released link.
    pub fn remove_link(&mut self, link: LinkId) -> Option<LinkContext> { self.links.remove(&link) }

    /// Mutable access to a connection's context, creating it on first use.
    pub fn connection_mut(&mut self, connection: ConnectionId) -> &mut ConnectionContext {
        self.connections.entry(connection).or_default()
    }

    /// Temporarily move a connection's context out of the store.
    ///
    /// Pair with [`restore_connection`](Self::restore_connection) so the
    /// allocation is reused by the next message.
    pub(crate) fn take_connection(&mut self, connection: ConnectionId) -> ConnectionContext {
        self.connections.remove(&connection).unwrap_or_default()
    }

    /// Return a context previously obtained from
    /// [`take_connection`](Self::take_connection).
    pub(crate) fn restore_connection(&mut self, connection: ConnectionId, ctx: ConnectionContext) {
        self.connections.insert(connection, ctx);
    }

    /// Drop the context of a released connection.
    pub fn remove_connection(&mut self, connection: ConnectionId) -> Option<ConnectionContext> {
        self.connections.remove(&connection)
    }

    /// Number of link contexts currently held.
    #[must_use]
    pub fn link_count(&self) -> usize { self.links.len() }

    /// Number of connection contexts currently held.
    #[must_use]
    pub fn connection_count(&self) -> usize { self.connections.len() }
}
