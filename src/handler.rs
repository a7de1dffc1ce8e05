//! Application-facing handler trait and the context passed to it.
//!
//! [`Handler`] has one method per [`Notification`], each with a no-op
//! default so applications only implement what they need. Every method
//! receives a [`Context`] giving access to the engine, the link settings and
//! helpers for settling and sending.

use bytes::Bytes;
use log::warn;

use crate::{
    codec::MessageCodec,
    container::Container,
    context::{ContextStore, LinkContext},
    engine::{
        Condition,
        ConnectionId,
        DeliveryId,
        DeliveryStatus,
        Engine,
        LinkId,
        RemoteState,
        Role,
        SessionId,
        TransportId,
    },
    error::SendError,
    event::Event,
    message::Message,
    notification::Notification,
};

/// State available to a handler for the duration of one notification.
pub struct Context<'a, E: ?Sized> {
    kind: Notification,
    event: &'a Event,
    engine: &'a mut E,
    contexts: &'a mut ContextStore,
    container: Option<&'a dyn Container>,
    codec: &'a dyn MessageCodec,
}

impl<'a, E: Engine + ?Sized> Context<'a, E> {
    pub(crate) fn new(
        kind: Notification,
        event: &'a Event,
        engine: &'a mut E,
        contexts: &'a mut ContextStore,
        container: Option<&'a dyn Container>,
        codec: &'a dyn MessageCodec,
    ) -> Self {
        Self {
            kind,
            event,
            engine,
            contexts,
            container,
            codec,
        }
    }

    /// Kind of notification being delivered.
    #[must_use]
    pub fn kind(&self) -> Notification { self.kind }

    /// Raw engine event that triggered the notification.
    #[must_use]
    pub fn event(&self) -> &Event { self.event }

    /// Read access to the engine.
    #[must_use]
    pub fn engine(&self) -> &E { &*self.engine }

    /// Write access to the engine.
    pub fn engine_mut(&mut self) -> &mut E { &mut *self.engine }

    /// The hosting container, if any.
    #[must_use]
    pub fn container(&self) -> Option<&'a dyn Container> { self.container }

    /// Current settings of `link`.
    #[must_use]
    pub fn link_context(&self, link: LinkId) -> LinkContext { self.contexts.link(link) }

    /// Mutable settings of `link`. Changes take effect on the next event
    /// for the link, or immediately for checks made after the callback
    /// returns.
    pub fn link_context_mut(&mut self, link: LinkId) -> &mut LinkContext {
        self.contexts.link_mut(link)
    }

    /// Flags of `delivery`.
    #[must_use]
    pub fn delivery_status(&self, delivery: DeliveryId) -> DeliveryStatus {
        self.engine.delivery_status(delivery)
    }

    /// Outcome the peer reported for `delivery`.
    ///
    /// Useful to tell a released delivery from a modified one, which share
    /// [`Handler::on_delivery_release`].
    #[must_use]
    pub fn remote_state(&self, delivery: DeliveryId) -> RemoteState {
        self.engine.delivery_status(delivery).remote_state
    }

    /// Accept and settle `delivery`.
    pub fn accept(&mut self, delivery: DeliveryId) { self.engine.accept(delivery); }

    /// Reject and settle `delivery`.
    pub fn reject(&mut self, delivery: DeliveryId) { self.engine.reject(delivery); }

    /// Release and settle `delivery`.
    pub fn release(&mut self, delivery: DeliveryId) { self.engine.release(delivery); }

    /// Settle `delivery`.
    pub fn settle(&mut self, delivery: DeliveryId) { self.engine.settle(delivery); }

    /// Encode `message` with the adapter's codec and transfer it on `sender`.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::NotSender`] if `sender` receives, or
    /// [`SendError::Encode`] if the codec rejects the message.
    pub fn send(&mut self, sender: LinkId, message: &Message) -> Result<DeliveryId, SendError> {
        if self.engine.link_role(sender) != Role::Sender {
            return Err(SendError::NotSender(sender));
        }
        let payload = self.codec.encode(message).map_err(SendError::Encode)?;
        Ok(self.engine.send(sender, Bytes::from(payload)))
    }

    /// Condition behind an `*_error` notification.
    ///
    /// Returns `None` for every other kind.
    #[must_use]
    pub fn error_condition(&self) -> Option<&Condition> {
        match (self.kind, *self.event) {
            (Notification::ConnectionError, Event::ConnectionRemoteClose { connection }) => {
                self.engine.connection_remote_condition(connection)
            }
            (Notification::SessionError, Event::SessionRemoteClose { session }) => {
                self.engine.session_remote_condition(session)
            }
            (Notification::LinkError, Event::LinkRemoteClose { link }) => {
                self.engine.link_remote_condition(link)
            }
            (Notification::TransportError, Event::TransportTailClosed { transport, .. }) => {
                self.engine.transport_condition(transport)
            }
            _ => None,
        }
    }
}

/// Application delegate receiving semantic notifications.
///
/// All methods default to doing nothing, except the `*_error` methods, which
/// forward to [`on_error`](Self::on_error). The adapter's default protocol
/// reactions run after the method returns, so a handler can pre-empt them,
/// for example by settling a delivery inside
/// [`on_message`](Self::on_message).
///
/// ```
/// use amqp_adapter::{Context, DeliveryId, Engine, Handler, Message};
///
/// #[derive(Default)]
/// struct Counter {
///     received: usize,
/// }
///
/// impl<E: Engine> Handler<E> for Counter {
///     fn on_message(&mut self, _ctx: &mut Context<'_, E>, _delivery: DeliveryId, _msg: &Message) {
///         self.received += 1;
///     }
/// }
/// ```
#[allow(unused_variables, reason = "default methods ignore their arguments")]
pub trait Handler<E: Engine + ?Sized> {
    /// The container started.
    fn on_container_start(&mut self, ctx: &mut Context<'_, E>, container: &dyn Container) {}

    /// `sender` has credit available.
    fn on_sendable(&mut self, ctx: &mut Context<'_, E>, sender: LinkId) {}

    /// A complete message arrived on `delivery`.
    ///
    /// `message` lives in a per-connection slot that the next message
    /// overwrites; clone it to keep it.
    fn on_message(&mut self, ctx: &mut Context<'_, E>, delivery: DeliveryId, message: &Message) {}

    /// `delivery` was settled.
    fn on_delivery_settle(&mut self, ctx: &mut Context<'_, E>, delivery: DeliveryId) {}

    /// The peer accepted `delivery`.
    fn on_delivery_accept(&mut self, ctx: &mut Context<'_, E>, delivery: DeliveryId) {}

    /// The peer rejected `delivery`.
    fn on_delivery_reject(&mut self, ctx: &mut Context<'_, E>, delivery: DeliveryId) {}

    /// The peer released or modified `delivery`.
    fn on_delivery_release(&mut self, ctx: &mut Context<'_, E>, delivery: DeliveryId) {}

    /// The peer opened `connection`.
    fn on_connection_open(&mut self, ctx: &mut Context<'_, E>, connection: ConnectionId) {}

    /// The peer closed `connection`.
    fn on_connection_close(&mut self, ctx: &mut Context<'_, E>, connection: ConnectionId) {}

    /// The peer closed `connection` with an error condition.
    fn on_connection_error(&mut self, ctx: &mut Context<'_, E>, connection: ConnectionId) {
        self.on_error(ctx);
    }

    /// The peer began `session`.
    fn on_session_open(&mut self, ctx: &mut Context<'_, E>, session: SessionId) {}

    /// The peer ended `session`.
    fn on_session_close(&mut self, ctx: &mut Context<'_, E>, session: SessionId) {}

    /// The peer ended `session` with an error condition.
    fn on_session_error(&mut self, ctx: &mut Context<'_, E>, session: SessionId) {
        self.on_error(ctx);
    }

    /// The peer attached receiver link `receiver`.
    fn on_receiver_open(&mut self, ctx: &mut Context<'_, E>, receiver: LinkId) {}

    /// The peer detached receiver link `receiver`.
    fn on_receiver_close(&mut self, ctx: &mut Context<'_, E>, receiver: LinkId) {}

    /// The peer detached receiver link `receiver` with an error condition.
    fn on_receiver_error(&mut self, ctx: &mut Context<'_, E>, receiver: LinkId) {
        self.on_error(ctx);
    }

    /// The peer attached sender link `sender`.
    fn on_sender_open(&mut self, ctx: &mut Context<'_, E>, sender: LinkId) {}

    /// The peer detached sender link `sender`.
    fn on_sender_close(&mut self, ctx: &mut Context<'_, E>, sender: LinkId) {}

    /// The peer detached sender link `sender` with an error condition.
    fn on_sender_error(&mut self, ctx: &mut Context<'_, E>, sender: LinkId) {
        self.on_error(ctx);
    }

    /// The transport closed.
    fn on_transport_close(&mut self, ctx: &mut Context<'_, E>, transport: TransportId) {}

    /// The transport closed with an error condition.
    fn on_transport_error(&mut self, ctx: &mut Context<'_, E>, transport: TransportId) {
        self.on_error(ctx);
    }

    /// A container timer fired.
    fn on_timer(&mut self, ctx: &mut Context<'_, E>, container: &dyn Container) {}

    /// Fallback for every `*_error` method not overridden.
    fn on_error(&mut self, ctx: &mut Context<'_, E>) {
        if let Some(condition) = ctx.error_condition() {
            warn!("unhandled {}: condition={condition}", ctx.kind());
        }
    }
}
