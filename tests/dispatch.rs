//! Tests for routing raw engine events to handler notifications.

use amqp_adapter::{
    ConnectionId,
    EndpointState,
    Event,
    LinkId,
    MessagingAdapter,
    Notification,
    Role,
    SessionId,
    StaticContainer,
};
use amqp_adapter_testing::{Action, MockEngine, RecordingHandler, assert_notified, encoded};
use rstest::rstest;

mod common;
use common::{Topology, container, receiver};

#[rstest]
fn start_requires_container(container: StaticContainer) {
    let mut engine = MockEngine::new();
    let mut handler = RecordingHandler::new();

    MessagingAdapter::new(&mut handler).dispatch(&mut engine, &Event::ReactorInit);
    assert!(handler.calls.is_empty());

    MessagingAdapter::new(&mut handler)
        .with_container(&container)
        .dispatch(&mut engine, &Event::ReactorInit);
    assert_notified!(handler, [Notification::Start]);
    assert_eq!(handler.calls[0].target, "test-container");
}

#[rstest]
fn timer_requires_container(container: StaticContainer) {
    let mut engine = MockEngine::new();
    let mut handler = RecordingHandler::new();

    MessagingAdapter::new(&mut handler).dispatch(&mut engine, &Event::TimerTask);
    assert!(handler.calls.is_empty());

    MessagingAdapter::new(&mut handler)
        .with_container(&container)
        .dispatch(&mut engine, &Event::TimerTask);
    assert_notified!(handler, [Notification::Timer]);
}

#[rstest]
#[case::connection_init(Event::ConnectionInit { connection: ConnectionId::new(1) })]
#[case::connection_local_open(Event::ConnectionLocalOpen { connection: ConnectionId::new(1) })]
#[case::connection_local_close(Event::ConnectionLocalClose { connection: ConnectionId::new(1) })]
#[case::session_local_open(Event::SessionLocalOpen { session: SessionId::new(2) })]
#[case::session_local_close(Event::SessionLocalClose { session: SessionId::new(2) })]
#[case::link_local_close(Event::LinkLocalClose { link: LinkId::new(3) })]
fn local_endpoint_events_are_ignored(receiver: Topology, #[case] event: Event) {
    let Topology { mut engine, .. } = receiver;
    let mut handler = RecordingHandler::new();

    MessagingAdapter::new(&mut handler).dispatch(&mut engine, &event);

    assert!(handler.calls.is_empty());
    assert!(engine.journal().is_empty());
}

#[rstest]
fn link_final_drops_link_context(receiver: Topology) {
    let Topology {
        mut engine, link, ..
    } = receiver;
    let mut handler = RecordingHandler::new();
    let mut adapter = MessagingAdapter::new(&mut handler);
    adapter.link_context_mut(link).credit_window = 40;

    adapter.dispatch(&mut engine, &Event::LinkFinal { link });

    assert_eq!(adapter.contexts().link_count(), 0);
    assert_eq!(
        adapter.contexts().link(link).credit_window,
        amqp_adapter::DEFAULT_CREDIT_WINDOW
    );
}

#[rstest]
fn connection_final_drops_decode_slot(receiver: Topology) {
    let Topology {
        mut engine,
        connection,
        link,
        ..
    } = receiver;
    let delivery = engine.incoming(link, encoded(&amqp_adapter::Message::new(b"x".to_vec())));
    let mut handler = RecordingHandler::new();
    let mut adapter = MessagingAdapter::new(&mut handler);

    adapter.dispatch(&mut engine, &Event::Delivery { link, delivery });
    assert_eq!(adapter.contexts().connection_count(), 1);

    adapter.dispatch(&mut engine, &Event::ConnectionFinal { connection });
    assert_eq!(adapter.contexts().connection_count(), 0);
}

#[test]
fn run_drains_events_in_order() {
    let mut engine = MockEngine::new();
    let (connection, session, link) = engine.link_with_role(Role::Sender);
    engine.push_event(Event::ConnectionRemoteOpen { connection });
    engine.push_event(Event::SessionRemoteOpen { session });
    engine.push_event(Event::LinkRemoteOpen { link });
    let mut handler = RecordingHandler::new();

    let handled = MessagingAdapter::new(&mut handler).run(&mut engine);

    assert_eq!(handled, 3);
    assert_notified!(
        handler,
        [
            Notification::ConnectionOpen,
            Notification::SessionOpen,
            Notification::LinkOpen,
        ]
    );
    assert_eq!(
        engine.actions(),
        vec![
            Action::OpenConnection(connection),
            Action::OpenSession(session),
            Action::OpenLink(link),
        ]
    );
}

#[test]
fn run_on_idle_engine_handles_nothing() {
    let mut engine = MockEngine::new();
    let mut handler = RecordingHandler::new();
    assert_eq!(MessagingAdapter::new(&mut handler).run(&mut engine), 0);
}

#[rstest]
fn transport_close_requires_locally_open_connection(receiver: Topology) {
    let Topology {
        mut engine,
        connection,
        ..
    } = receiver;
    let transport = engine.transport();
    let mut handler = RecordingHandler::new();
    let event = Event::TransportTailClosed {
        connection: Some(connection),
        transport,
    };

    MessagingAdapter::new(&mut handler).dispatch(&mut engine, &event);
    assert!(handler.calls.is_empty());

    engine.set_connection_local(connection, EndpointState::LOCAL_ACTIVE);
    MessagingAdapter::new(&mut handler).dispatch(&mut engine, &event);
    assert_notified!(handler, [Notification::TransportClose]);
}

#[test]
fn transport_close_without_connection_is_silent() {
    let mut engine = MockEngine::new();
    let transport = engine.transport();
    let mut handler = RecordingHandler::new();

    MessagingAdapter::new(&mut handler).dispatch(
        &mut engine,
        &Event::TransportTailClosed {
            connection: None,
            transport,
        },
    );

    assert!(handler.calls.is_empty());
}
