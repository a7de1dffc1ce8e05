//! Shared fixtures for integration tests.

// Items in this shared module may not be used by all test binaries that import it.
#![allow(
    dead_code,
    reason = "shared test utilities are not used by all test binaries"
)]

use amqp_adapter::{ConnectionId, LinkId, LinkOptions, Role, SessionId, StaticContainer};
use amqp_adapter_testing::MockEngine;
use rstest::fixture;

/// Engine holding one connection, one session and one link of a given role.
pub struct Topology {
    pub engine: MockEngine,
    pub connection: ConnectionId,
    pub session: SessionId,
    pub link: LinkId,
}

impl Topology {
    pub fn new(role: Role) -> Self {
        let mut engine = MockEngine::new();
        let (connection, session, link) = engine.link_with_role(role);
        Self {
            engine,
            connection,
            session,
            link,
        }
    }
}

#[fixture]
pub fn receiver() -> Topology { Topology::new(Role::Receiver) }

#[fixture]
pub fn sender() -> Topology { Topology::new(Role::Sender) }

#[fixture]
pub fn container() -> StaticContainer {
    StaticContainer::new("test-container")
        .with_link_options(LinkOptions::default().credit_window(25))
}
