//! Classification of delivery updates.
//!
//! Receiver links raise `on_message` for complete deliveries and
//! `on_delivery_settle` for settled ones, then top up credit. Sender links
//! raise the notification matching the peer's disposition, then
//! `on_delivery_settle` when the update also settled the delivery.

use log::debug;

use super::MessagingAdapter;
use crate::{
    codec::MessageCodec,
    engine::{DeliveryId, Engine, LinkId, RemoteState, Role},
    event::Event,
    handler::Handler,
    metrics::{self, AutoDisposition},
    notification::Notification,
};

impl<H: ?Sized, C: MessageCodec> MessagingAdapter<'_, H, C> {
    pub(super) fn on_delivery<E>(
        &mut self,
        engine: &mut E,
        event: &Event,
        link: LinkId,
        delivery: DeliveryId,
    ) where
        E: Engine + ?Sized,
        H: Handler<E>,
    {
        match engine.link_role(link) {
            Role::Receiver => self.on_receiver_delivery(engine, event, link, delivery),
            Role::Sender => self.on_sender_delivery(engine, event, link, delivery),
        }
    }

    fn on_receiver_delivery<E>(
        &mut self,
        engine: &mut E,
        event: &Event,
        link: LinkId,
        delivery: DeliveryId,
    ) where
        E: Engine + ?Sized,
        H: Handler<E>,
    {
        let status = engine.delivery_status(delivery);
        if !status.partial && status.readable {
            self.on_incoming_message(engine, event, link, delivery);
        } else if status.updated && status.settled {
            self.notify(engine, event, Notification::DeliverySettle, |h, ctx| {
                h.on_delivery_settle(ctx, delivery);
            });
        }
        self.credit_topup(engine, Some(link));
    }

    fn on_incoming_message<E>(
        &mut self,
        engine: &mut E,
        event: &Event,
        link: LinkId,
        delivery: DeliveryId,
    ) where
        E: Engine + ?Sized,
        H: Handler<E>,
    {
        let connection = engine.session_connection(engine.link_session(link));
        // The slot leaves the store while the handler runs so the handler can
        // still reach the link contexts; it goes back afterwards for reuse.
        let mut slot = self.contexts.take_connection(connection);
        let decoded = self
            .codec
            .decode_into(engine.delivery_payload(delivery), &mut slot.message);

        if engine.link_state(link).is_local_closed() {
            debug!("releasing {delivery} received on closed {link}");
            engine.release(delivery);
            metrics::inc_auto_disposition(AutoDisposition::Release);
        } else {
            match decoded {
                Ok(()) => {
                    let message = &slot.message;
                    self.notify(engine, event, Notification::Message, |h, ctx| {
                        h.on_message(ctx, delivery, message);
                    });
                    let auto_accept = self.contexts.link(link).auto_accept;
                    if auto_accept && !engine.delivery_status(delivery).settled {
                        debug!("auto-accepting {delivery} on {link}");
                        engine.accept(delivery);
                        metrics::inc_auto_disposition(AutoDisposition::Accept);
                    }
                }
                Err(error) => {
                    let auto_accept = self.contexts.link(link).auto_accept;
                    tracing::warn!(
                        %error,
                        %delivery,
                        %link,
                        auto_accept,
                        "delivery payload failed to decode"
                    );
                    metrics::inc_decode_errors();
                    // Without auto-accept the application owns the outcome.
                    if auto_accept {
                        engine.reject(delivery);
                        metrics::inc_auto_disposition(AutoDisposition::Reject);
                    }
                }
            }
        }
        self.contexts.restore_connection(connection, slot);
    }

    fn on_sender_delivery<E>(
        &mut self,
        engine: &mut E,
        event: &Event,
        link: LinkId,
        delivery: DeliveryId,
    ) where
        E: Engine + ?Sized,
        H: Handler<E>,
    {
        let status = engine.delivery_status(delivery);
        if !status.updated {
            return;
        }
        match status.remote_state {
            RemoteState::Accepted => {
                self.notify(engine, event, Notification::DeliveryAccept, |h, ctx| {
                    h.on_delivery_accept(ctx, delivery);
                });
            }
            RemoteState::Rejected => {
                self.notify(engine, event, Notification::DeliveryReject, |h, ctx| {
                    h.on_delivery_reject(ctx, delivery);
                });
            }
            RemoteState::Released | RemoteState::Modified => {
                self.notify(engine, event, Notification::DeliveryRelease, |h, ctx| {
                    h.on_delivery_release(ctx, delivery);
                });
            }
            RemoteState::None => {}
        }
        if status.settled {
            self.notify(engine, event, Notification::DeliverySettle, |h, ctx| {
                h.on_delivery_settle(ctx, delivery);
            });
        }
        if self.contexts.link(link).auto_settle {
            debug!("auto-settling {delivery} on {link}");
            engine.settle(delivery);
            metrics::inc_auto_disposition(AutoDisposition::Settle);
        }
    }
}
