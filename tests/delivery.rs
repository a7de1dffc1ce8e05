//! Tests for delivery classification on receiver and sender links.

use amqp_adapter::{
    DeliveryStatus,
    Engine,
    EndpointState,
    Event,
    Message,
    MessagingAdapter,
    Notification,
    RemoteState,
};
use amqp_adapter_testing::{
    Action,
    MessageReaction,
    Record,
    RecordingHandler,
    assert_notified,
    encoded,
};
use rstest::rstest;

mod common;
use common::{Topology, receiver, sender};

fn incoming_topology(receiver: Topology, message: &Message) -> (Topology, amqp_adapter::DeliveryId) {
    let mut topology = receiver;
    topology
        .engine
        .set_link_local(topology.link, EndpointState::LOCAL_ACTIVE);
    topology.engine.set_credit(topology.link, 9);
    let delivery = topology.engine.incoming(topology.link, encoded(message));
    (topology, delivery)
}

#[rstest]
fn complete_delivery_is_delivered_then_accepted(receiver: Topology) {
    let message = Message::new(b"hello".to_vec()).with_id(7);
    let (Topology { mut engine, link, .. }, delivery) = incoming_topology(receiver, &message);
    let mut handler = RecordingHandler::new();

    MessagingAdapter::new(&mut handler).dispatch(&mut engine, &Event::Delivery { link, delivery });

    assert_eq!(handler.messages, vec![message]);
    assert_eq!(
        engine.journal(),
        [
            Record::Notified(Notification::Message),
            Record::Action(Action::Accept(delivery)),
            Record::Action(Action::Flow(link, 1)),
        ]
    );
}

#[rstest]
#[case::accept(MessageReaction::Accept, Action::Accept)]
#[case::reject(MessageReaction::Reject, Action::Reject)]
#[case::release(MessageReaction::Release, Action::Release)]
#[case::settle(MessageReaction::Settle, Action::Settle)]
fn auto_accept_respects_handler_settlement(
    receiver: Topology,
    #[case] reaction: MessageReaction,
    #[case] expected: fn(amqp_adapter::DeliveryId) -> Action,
) {
    let (Topology { mut engine, link, .. }, delivery) =
        incoming_topology(receiver, &Message::new(b"m".to_vec()));
    let mut handler = RecordingHandler::new().reacting(reaction);

    MessagingAdapter::new(&mut handler).dispatch(&mut engine, &Event::Delivery { link, delivery });

    assert_eq!(engine.actions(), vec![expected(delivery), Action::Flow(link, 1)]);
}

#[rstest]
fn auto_accept_disabled_leaves_delivery_unsettled(receiver: Topology) {
    let (Topology { mut engine, link, .. }, delivery) =
        incoming_topology(receiver, &Message::new(b"m".to_vec()));
    let mut handler = RecordingHandler::new();
    let mut adapter = MessagingAdapter::new(&mut handler);
    adapter.link_context_mut(link).auto_accept = false;

    adapter.dispatch(&mut engine, &Event::Delivery { link, delivery });

    assert_eq!(engine.actions(), vec![Action::Flow(link, 1)]);
    assert!(!engine.delivery_status(delivery).settled);
}

#[rstest]
#[case::auto_accept(true)]
#[case::manual_accept(false)]
fn delivery_on_closed_link_is_released(receiver: Topology, #[case] auto_accept: bool) {
    let (Topology { mut engine, link, .. }, delivery) =
        incoming_topology(receiver, &Message::new(b"late".to_vec()));
    engine.set_link_local(link, EndpointState::LOCAL_CLOSED);
    let mut handler = RecordingHandler::new();
    let mut adapter = MessagingAdapter::new(&mut handler);
    adapter.link_context_mut(link).auto_accept = auto_accept;

    adapter.dispatch(&mut engine, &Event::Delivery { link, delivery });

    drop(adapter);
    assert!(handler.calls.is_empty());
    assert_eq!(engine.actions(), vec![Action::Release(delivery), Action::Flow(link, 1)]);
}

#[rstest]
#[case::auto_accept(true, true)]
#[case::manual_accept(false, false)]
fn undecodable_payload_is_rejected_only_with_auto_accept(
    receiver: Topology,
    #[case] auto_accept: bool,
    #[case] rejected: bool,
) {
    let mut topology = receiver;
    topology
        .engine
        .set_link_local(topology.link, EndpointState::LOCAL_ACTIVE);
    let Topology {
        mut engine, link, ..
    } = topology;
    engine.set_credit(link, 10);
    let delivery = engine.incoming(link, vec![0xff, 0xff, 0xff]);
    let mut handler = RecordingHandler::new();
    let mut adapter = MessagingAdapter::new(&mut handler);
    adapter.link_context_mut(link).auto_accept = auto_accept;

    adapter.dispatch(&mut engine, &Event::Delivery { link, delivery });

    drop(adapter);
    assert!(handler.calls.is_empty());
    let mut expected = Vec::new();
    if rejected {
        expected.push(Action::Reject(delivery));
    }
    expected.push(Action::Flow(link, 0));
    assert_eq!(engine.actions(), expected);
    assert_eq!(engine.delivery_status(delivery).settled, rejected);
}

#[rstest]
fn undecodable_payload_on_closed_link_is_released(receiver: Topology) {
    let Topology {
        mut engine, link, ..
    } = receiver;
    engine.set_link_local(link, EndpointState::LOCAL_CLOSED);
    engine.set_credit(link, 7);
    let delivery = engine.incoming(link, vec![0xff; 3]);
    let mut handler = RecordingHandler::new();

    MessagingAdapter::new(&mut handler).dispatch(&mut engine, &Event::Delivery { link, delivery });

    assert!(handler.calls.is_empty());
    assert_eq!(engine.actions(), vec![Action::Release(delivery), Action::Flow(link, 3)]);
}

#[rstest]
fn partial_delivery_only_tops_up(receiver: Topology) {
    let Topology {
        mut engine, link, ..
    } = receiver;
    let status = DeliveryStatus {
        partial: true,
        readable: true,
        ..DeliveryStatus::default()
    };
    let delivery = engine.delivery(link, status, vec![1, 2]);
    let mut handler = RecordingHandler::new();

    MessagingAdapter::new(&mut handler).dispatch(&mut engine, &Event::Delivery { link, delivery });

    assert!(handler.calls.is_empty());
    assert_eq!(engine.actions(), vec![Action::Flow(link, 10)]);
}

#[rstest]
fn settled_receiver_delivery_reports_settle(receiver: Topology) {
    let Topology {
        mut engine, link, ..
    } = receiver;
    let status = DeliveryStatus {
        updated: true,
        settled: true,
        ..DeliveryStatus::default()
    };
    let delivery = engine.delivery(link, status, Vec::new());
    let mut handler = RecordingHandler::new();

    MessagingAdapter::new(&mut handler).dispatch(&mut engine, &Event::Delivery { link, delivery });

    assert_notified!(handler, [Notification::DeliverySettle]);
}

#[rstest]
fn decode_slot_is_reused_across_messages(receiver: Topology) {
    let first = Message::new(vec![1_u8; 256]).with_subject("first");
    let second = Message::new(b"two".to_vec());
    let (Topology { mut engine, link, .. }, d1) = incoming_topology(receiver, &first);
    let d2 = engine.incoming(link, encoded(&second));
    let mut handler = RecordingHandler::new();
    let mut adapter = MessagingAdapter::new(&mut handler);

    adapter.dispatch(&mut engine, &Event::Delivery { link, delivery: d1 });
    adapter.dispatch(&mut engine, &Event::Delivery { link, delivery: d2 });

    assert_eq!(adapter.contexts().connection_count(), 1);
    drop(adapter);
    assert_eq!(handler.messages, vec![first, second]);
}

#[rstest]
#[case::accepted(RemoteState::Accepted, Notification::DeliveryAccept)]
#[case::rejected(RemoteState::Rejected, Notification::DeliveryReject)]
#[case::released(RemoteState::Released, Notification::DeliveryRelease)]
#[case::modified(RemoteState::Modified, Notification::DeliveryRelease)]
fn sender_disposition_precedes_settle(
    sender: Topology,
    #[case] remote_state: RemoteState,
    #[case] expected: Notification,
) {
    let Topology {
        mut engine, link, ..
    } = sender;
    let delivery = engine.delivery(link, DeliveryStatus::default(), Vec::new());
    engine.remote_update(delivery, remote_state, true);
    let mut handler = RecordingHandler::new();

    MessagingAdapter::new(&mut handler).dispatch(&mut engine, &Event::Delivery { link, delivery });

    assert_eq!(
        engine.journal(),
        [
            Record::Notified(expected),
            Record::Notified(Notification::DeliverySettle),
            Record::Action(Action::Settle(delivery)),
        ]
    );
}

#[rstest]
fn unsettled_disposition_skips_settle_notification(sender: Topology) {
    let Topology {
        mut engine, link, ..
    } = sender;
    let delivery = engine.delivery(link, DeliveryStatus::default(), Vec::new());
    engine.remote_update(delivery, RemoteState::Accepted, false);
    let mut handler = RecordingHandler::new();
    let mut adapter = MessagingAdapter::new(&mut handler);
    adapter.link_context_mut(link).auto_settle = false;

    adapter.dispatch(&mut engine, &Event::Delivery { link, delivery });

    drop(adapter);
    assert_notified!(handler, [Notification::DeliveryAccept]);
    assert!(engine.actions().is_empty());
}

#[rstest]
fn auto_settle_applies_without_disposition(sender: Topology) {
    let Topology {
        mut engine, link, ..
    } = sender;
    let delivery = engine.delivery(link, DeliveryStatus::default(), Vec::new());
    engine.remote_update(delivery, RemoteState::None, false);
    let mut handler = RecordingHandler::new();

    MessagingAdapter::new(&mut handler).dispatch(&mut engine, &Event::Delivery { link, delivery });

    assert!(handler.calls.is_empty());
    assert_eq!(engine.actions(), vec![Action::Settle(delivery)]);
}

#[rstest]
fn sender_delivery_without_update_is_silent(sender: Topology) {
    let Topology {
        mut engine, link, ..
    } = sender;
    let status = DeliveryStatus {
        settled: true,
        remote_state: RemoteState::Accepted,
        ..DeliveryStatus::default()
    };
    let delivery = engine.delivery(link, status, Vec::new());
    let mut handler = RecordingHandler::new();

    MessagingAdapter::new(&mut handler).dispatch(&mut engine, &Event::Delivery { link, delivery });

    assert!(handler.calls.is_empty());
    assert!(engine.journal().is_empty());
}
