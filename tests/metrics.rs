#![cfg(feature = "metrics")]
//! Tests for the counters recorded while dispatching events.
//!
//! Each test installs a local `metrics_util` debugging recorder, so counters
//! from other tests never leak in.

use amqp_adapter::{
    DeliveryStatus,
    EndpointState,
    Event,
    Message,
    MessagingAdapter,
    RemoteState,
    metrics,
};
use amqp_adapter_testing::{RecordingHandler, capture_metrics, counter_total, encoded};
use rstest::rstest;

mod common;
use common::{Topology, receiver, sender};

#[rstest]
fn notifications_are_counted_by_kind(receiver: Topology) {
    let Topology {
        mut engine,
        connection,
        session,
        ..
    } = receiver;
    let mut handler = RecordingHandler::new();

    let snapshotter = capture_metrics(|| {
        let mut adapter = MessagingAdapter::new(&mut handler);
        adapter.dispatch(&mut engine, &Event::ConnectionRemoteOpen { connection });
        adapter.dispatch(&mut engine, &Event::SessionRemoteOpen { session });
        adapter.dispatch(&mut engine, &Event::SessionRemoteClose { session });
    });

    assert_eq!(counter_total(&snapshotter, metrics::NOTIFICATIONS_TOTAL, None), 3);
    assert_eq!(
        counter_total(
            &snapshotter,
            metrics::NOTIFICATIONS_TOTAL,
            Some(("kind", "session_open"))
        ),
        1
    );
}

#[rstest]
fn credit_counts_only_grants(receiver: Topology) {
    let Topology {
        mut engine, link, ..
    } = receiver;
    engine.set_credit(link, 14);
    let mut handler = RecordingHandler::new();

    let snapshotter = capture_metrics(|| {
        let mut adapter = MessagingAdapter::new(&mut handler);
        adapter.dispatch(&mut engine, &Event::LinkFlow { link: Some(link) });
        adapter.link_context_mut(link).credit_window = 16;
        adapter.dispatch(&mut engine, &Event::LinkFlow { link: Some(link) });
    });

    assert_eq!(counter_total(&snapshotter, metrics::CREDIT_ISSUED_TOTAL, None), 6);
}

#[rstest]
fn automatic_dispositions_are_labelled(receiver: Topology) {
    let Topology {
        mut engine, link, ..
    } = receiver;
    engine.set_link_local(link, EndpointState::LOCAL_ACTIVE);
    let good = engine.incoming(link, encoded(&Message::new(b"ok".to_vec())));
    let bad = engine.incoming(link, vec![0xff; 4]);
    let mut handler = RecordingHandler::new();

    let snapshotter = capture_metrics(|| {
        let mut adapter = MessagingAdapter::new(&mut handler);
        adapter.dispatch(&mut engine, &Event::Delivery { link, delivery: good });
        adapter.dispatch(&mut engine, &Event::Delivery { link, delivery: bad });
    });

    let name = metrics::AUTO_DISPOSITIONS_TOTAL;
    assert_eq!(counter_total(&snapshotter, name, Some(("action", "accept"))), 1);
    assert_eq!(counter_total(&snapshotter, name, Some(("action", "reject"))), 1);
    assert_eq!(counter_total(&snapshotter, metrics::DECODE_ERRORS_TOTAL, None), 1);
}

#[rstest]
fn auto_settle_is_counted(sender: Topology) {
    let Topology {
        mut engine, link, ..
    } = sender;
    let delivery = engine.delivery(link, DeliveryStatus::default(), Vec::new());
    engine.remote_update(delivery, RemoteState::Accepted, true);
    let mut handler = RecordingHandler::new();

    let snapshotter = capture_metrics(|| {
        MessagingAdapter::new(&mut handler).dispatch(&mut engine, &Event::Delivery { link, delivery });
    });

    assert_eq!(
        counter_total(
            &snapshotter,
            metrics::AUTO_DISPOSITIONS_TOTAL,
            Some(("action", "settle"))
        ),
        1
    );
}
