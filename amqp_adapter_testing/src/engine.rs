//! In-memory protocol engine for driving the adapter in tests.
//!
//! [`MockEngine`] keeps just enough endpoint and delivery state to answer the
//! adapter's queries, applies its mutations immediately, and appends every
//! mutation to a [`Record`] journal. Handlers built on
//! [`RecordingHandler`](crate::RecordingHandler) write their notifications to
//! the same journal so tests can assert the interleaving of callbacks and
//! default reactions.

use std::collections::{HashMap, VecDeque};

use amqp_adapter::{
    Condition,
    ConnectionId,
    DeliveryId,
    DeliveryStatus,
    EndpointState,
    Engine,
    Event,
    EventSource,
    LinkId,
    Notification,
    RemoteState,
    Role,
    SessionId,
    TransportId,
};
use bytes::Bytes;

/// Engine mutation observed by the mock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// `open_connection` was called.
    OpenConnection(ConnectionId),
    /// `close_connection` was called.
    CloseConnection(ConnectionId),
    /// `open_session` was called.
    OpenSession(SessionId),
    /// `close_session` was called.
    CloseSession(SessionId),
    /// `open_link` was called.
    OpenLink(LinkId),
    /// `close_link` was called.
    CloseLink(LinkId),
    /// `flow` was called with the given delta.
    Flow(LinkId, i32),
    /// `accept` was called.
    Accept(DeliveryId),
    /// `reject` was called.
    Reject(DeliveryId),
    /// `release` was called.
    Release(DeliveryId),
    /// `settle` was called.
    Settle(DeliveryId),
    /// `send` created a delivery carrying the payload.
    Send(LinkId, DeliveryId, Bytes),
}

/// Journal entry: a handler notification or an engine mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Record {
    /// A handler was notified.
    Notified(Notification),
    /// The engine was mutated.
    Action(Action),
}

#[derive(Debug)]
struct Endpoint {
    local: EndpointState,
    remote: EndpointState,
    condition: Option<Condition>,
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            local: EndpointState::LOCAL_UNINIT,
            remote: EndpointState::REMOTE_UNINIT,
            condition: None,
        }
    }
}

impl Endpoint {
    fn state(&self) -> EndpointState { self.local | self.remote }
}

#[derive(Debug)]
struct SessionEntry {
    endpoint: Endpoint,
    connection: ConnectionId,
}

#[derive(Debug)]
struct LinkEntry {
    endpoint: Endpoint,
    session: SessionId,
    role: Role,
    credit: i32,
}

#[derive(Debug)]
struct DeliveryEntry {
    status: DeliveryStatus,
    payload: Vec<u8>,
}

/// Scriptable engine recording every mutation the adapter performs.
///
/// Unknown identities cause a panic, which surfaces wiring mistakes in tests.
#[derive(Debug, Default)]
pub struct MockEngine {
    next_id: u64,
    connections: HashMap<ConnectionId, Endpoint>,
    sessions: HashMap<SessionId, SessionEntry>,
    links: HashMap<LinkId, LinkEntry>,
    deliveries: HashMap<DeliveryId, DeliveryEntry>,
    transports: HashMap<TransportId, Option<Condition>>,
    events: VecDeque<Event>,
    journal: Vec<Record>,
}

impl MockEngine {
    /// Create an empty engine.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Create a connection with both ends uninitialised.
    pub fn connection(&mut self) -> ConnectionId {
        let id = ConnectionId::new(self.allocate());
        self.connections.insert(id, Endpoint::default());
        id
    }

    /// Create a session on `connection`.
    pub fn session(&mut self, connection: ConnectionId) -> SessionId {
        let id = SessionId::new(self.allocate());
        self.sessions.insert(
            id,
            SessionEntry {
                endpoint: Endpoint::default(),
                connection,
            },
        );
        id
    }

    fn link(&mut self, session: SessionId, role: Role) -> LinkId {
        let id = LinkId::new(self.allocate());
        self.links.insert(
            id,
            LinkEntry {
                endpoint: Endpoint::default(),
                session,
                role,
                credit: 0,
            },
        );
        id
    }

    /// Create a receiver link on `session` with no credit.
    pub fn receiver(&mut self, session: SessionId) -> LinkId { self.link(session, Role::Receiver) }

    /// Create a sender link on `session` with no credit.
    pub fn sender(&mut self, session: SessionId) -> LinkId { self.link(session, Role::Sender) }

    /// Create a transport with no condition.
    pub fn transport(&mut self) -> TransportId {
        let id = TransportId::new(self.allocate());
        self.transports.insert(id, None);
        id
    }

    /// Build a connection, session and link of `role` in one go.
    pub fn link_with_role(&mut self, role: Role) -> (ConnectionId, SessionId, LinkId) {
        let connection = self.connection();
        let session = self.session(connection);
        let link = self.link(session, role);
        (connection, session, link)
    }

    fn connection_entry(&mut self, id: ConnectionId) -> &mut Endpoint {
        self.connections.get_mut(&id).expect("unknown connection")
    }

    fn session_entry(&mut self, id: SessionId) -> &mut SessionEntry {
        self.sessions.get_mut(&id).expect("unknown session")
    }

    fn link_entry(&mut self, id: LinkId) -> &mut LinkEntry {
        self.links.get_mut(&id).expect("unknown link")
    }

    fn delivery_entry(&mut self, id: DeliveryId) -> &mut DeliveryEntry {
        self.deliveries.get_mut(&id).expect("unknown delivery")
    }

    /// Set the local half of a connection's state.
    pub fn set_connection_local(&mut self, id: ConnectionId, local: EndpointState) {
        self.connection_entry(id).local = local;
    }

    /// Attach a remote condition to a connection.
    pub fn set_connection_condition(&mut self, id: ConnectionId, condition: Condition) {
        self.connection_entry(id).condition = Some(condition);
    }

    /// Set the local half of a session's state.
    pub fn set_session_local(&mut self, id: SessionId, local: EndpointState) {
        self.session_entry(id).endpoint.local = local;
    }

    /// Attach a remote condition to a session.
    pub fn set_session_condition(&mut self, id: SessionId, condition: Condition) {
        self.session_entry(id).endpoint.condition = Some(condition);
    }

    /// Set the local half of a link's state.
    pub fn set_link_local(&mut self, id: LinkId, local: EndpointState) {
        self.link_entry(id).endpoint.local = local;
    }

    /// Attach a remote condition to a link.
    pub fn set_link_condition(&mut self, id: LinkId, condition: Condition) {
        self.link_entry(id).endpoint.condition = Some(condition);
    }

    /// Overwrite the outstanding credit on a link.
    pub fn set_credit(&mut self, id: LinkId, credit: i32) { self.link_entry(id).credit = credit; }

    /// Attach a condition to a transport.
    pub fn set_transport_condition(&mut self, id: TransportId, condition: Condition) {
        self.transports.insert(id, Some(condition));
    }

    /// Create a delivery on `link` with the given flags and payload.
    pub fn delivery(&mut self, link: LinkId, status: DeliveryStatus, payload: Vec<u8>) -> DeliveryId {
        assert!(self.links.contains_key(&link), "unknown link");
        let id = DeliveryId::new(self.allocate());
        self.deliveries.insert(id, DeliveryEntry { status, payload });
        id
    }

    /// Create a complete, unsettled incoming delivery carrying `payload`.
    pub fn incoming(&mut self, link: LinkId, payload: Vec<u8>) -> DeliveryId {
        let status = DeliveryStatus {
            readable: true,
            ..DeliveryStatus::default()
        };
        self.delivery(link, status, payload)
    }

    /// Record that the peer updated an outgoing delivery.
    pub fn remote_update(&mut self, id: DeliveryId, remote_state: RemoteState, settled: bool) {
        let status = &mut self.delivery_entry(id).status;
        status.updated = true;
        status.remote_state = remote_state;
        status.settled = settled;
    }

    /// Current credit on `link`.
    #[must_use]
    pub fn credit(&self, link: LinkId) -> i32 { self.links[&link].credit }

    /// Queue an event for [`EventSource::next_event`].
    pub fn push_event(&mut self, event: Event) { self.events.push_back(event); }

    /// Every notification and mutation recorded so far, in order.
    #[must_use]
    pub fn journal(&self) -> &[Record] { &self.journal }

    /// Append an entry to the journal.
    pub fn record(&mut self, record: Record) { self.journal.push(record); }

    /// Mutations recorded so far, in order.
    #[must_use]
    pub fn actions(&self) -> Vec<Action> {
        self.journal
            .iter()
            .filter_map(|record| match record {
                Record::Action(action) => Some(action.clone()),
                Record::Notified(_) => None,
            })
            .collect()
    }

    fn act(&mut self, action: Action) { self.journal.push(Record::Action(action)); }
}

impl Engine for MockEngine {
    fn connection_state(&self, connection: ConnectionId) -> EndpointState {
        self.connections[&connection].state()
    }

    fn connection_remote_condition(&self, connection: ConnectionId) -> Option<&Condition> {
        self.connections[&connection].condition.as_ref()
    }

    fn open_connection(&mut self, connection: ConnectionId) {
        self.connection_entry(connection).local = EndpointState::LOCAL_ACTIVE;
        self.act(Action::OpenConnection(connection));
    }

    fn close_connection(&mut self, connection: ConnectionId) {
        self.connection_entry(connection).local = EndpointState::LOCAL_CLOSED;
        self.act(Action::CloseConnection(connection));
    }

    fn session_state(&self, session: SessionId) -> EndpointState {
        self.sessions[&session].endpoint.state()
    }

    fn session_remote_condition(&self, session: SessionId) -> Option<&Condition> {
        self.sessions[&session].endpoint.condition.as_ref()
    }

    fn session_connection(&self, session: SessionId) -> ConnectionId {
        self.sessions[&session].connection
    }

    fn open_session(&mut self, session: SessionId) {
        self.session_entry(session).endpoint.local = EndpointState::LOCAL_ACTIVE;
        self.act(Action::OpenSession(session));
    }

    fn close_session(&mut self, session: SessionId) {
        self.session_entry(session).endpoint.local = EndpointState::LOCAL_CLOSED;
        self.act(Action::CloseSession(session));
    }

    fn link_state(&self, link: LinkId) -> EndpointState { self.links[&link].endpoint.state() }

    fn link_role(&self, link: LinkId) -> Role { self.links[&link].role }

    fn link_credit(&self, link: LinkId) -> i32 { self.links[&link].credit }

    fn link_remote_condition(&self, link: LinkId) -> Option<&Condition> {
        self.links[&link].endpoint.condition.as_ref()
    }

    fn link_session(&self, link: LinkId) -> SessionId { self.links[&link].session }

    fn open_link(&mut self, link: LinkId) {
        self.link_entry(link).endpoint.local = EndpointState::LOCAL_ACTIVE;
        self.act(Action::OpenLink(link));
    }

    fn close_link(&mut self, link: LinkId) {
        self.link_entry(link).endpoint.local = EndpointState::LOCAL_CLOSED;
        self.act(Action::CloseLink(link));
    }

    fn flow(&mut self, link: LinkId, delta: i32) {
        self.link_entry(link).credit += delta;
        self.act(Action::Flow(link, delta));
    }

    fn delivery_status(&self, delivery: DeliveryId) -> DeliveryStatus {
        self.deliveries[&delivery].status
    }

    fn delivery_payload(&self, delivery: DeliveryId) -> &[u8] { &self.deliveries[&delivery].payload }

    fn accept(&mut self, delivery: DeliveryId) {
        self.delivery_entry(delivery).status.settled = true;
        self.act(Action::Accept(delivery));
    }

    fn reject(&mut self, delivery: DeliveryId) {
        self.delivery_entry(delivery).status.settled = true;
        self.act(Action::Reject(delivery));
    }

    fn release(&mut self, delivery: DeliveryId) {
        self.delivery_entry(delivery).status.settled = true;
        self.act(Action::Release(delivery));
    }

    fn settle(&mut self, delivery: DeliveryId) {
        self.delivery_entry(delivery).status.settled = true;
        self.act(Action::Settle(delivery));
    }

    fn send(&mut self, link: LinkId, payload: Bytes) -> DeliveryId {
        let id = self.delivery(link, DeliveryStatus::default(), payload.to_vec());
        self.link_entry(link).credit -= 1;
        self.act(Action::Send(link, id, payload));
        id
    }

    fn transport_condition(&self, transport: TransportId) -> Option<&Condition> {
        self.transports[&transport].as_ref()
    }
}

impl EventSource for MockEngine {
    fn next_event(&mut self) -> Option<Event> { self.events.pop_front() }
}
