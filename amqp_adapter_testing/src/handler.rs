//! Handler recording every notification it receives.

use amqp_adapter::{
    Condition,
    ConnectionId,
    Container,
    Context,
    DeliveryId,
    Handler,
    LinkId,
    Message,
    Notification,
    SessionId,
    TransportId,
};

use crate::engine::{MockEngine, Record};

/// What [`RecordingHandler`] does with a delivery inside `on_message`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageReaction {
    /// Leave the delivery alone.
    Ignore,
    /// Accept it.
    Accept,
    /// Reject it.
    Reject,
    /// Release it.
    Release,
    /// Settle it without an outcome.
    Settle,
}

/// A notification together with the identity it concerned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Call {
    /// Notification kind.
    pub kind: Notification,
    /// Raw identity of the object passed to the handler, or the container id
    /// for start and timer notifications.
    pub target: String,
}

/// Handler for [`MockEngine`] that records each call and optionally acts.
///
/// Each notification is also written to the engine journal as
/// [`Record::Notified`], so its position relative to default reactions can
/// be asserted.
#[derive(Debug)]
pub struct RecordingHandler {
    /// Calls received, in order.
    pub calls: Vec<Call>,
    /// Clones of every message received.
    pub messages: Vec<Message>,
    /// Conditions reported through `*_error` notifications.
    pub conditions: Vec<Condition>,
    /// Reaction applied inside `on_message`.
    pub on_message: MessageReaction,
    /// Message sent from `on_sendable`, if any.
    pub reply: Option<Message>,
    /// Credit window assigned to receivers in `on_receiver_open`, if any.
    pub window_on_open: Option<u32>,
}

impl Default for RecordingHandler {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            messages: Vec::new(),
            conditions: Vec::new(),
            on_message: MessageReaction::Ignore,
            reply: None,
            window_on_open: None,
        }
    }
}

impl RecordingHandler {
    /// Create a handler that only records.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Apply `reaction` to every delivery inside `on_message`.
    #[must_use]
    pub fn reacting(mut self, reaction: MessageReaction) -> Self {
        self.on_message = reaction;
        self
    }

    /// Send `message` whenever a sender becomes sendable.
    #[must_use]
    pub fn replying(mut self, message: Message) -> Self {
        self.reply = Some(message);
        self
    }

    /// Assign `window` to receivers when the peer opens them.
    #[must_use]
    pub fn with_window_on_open(mut self, window: u32) -> Self {
        self.window_on_open = Some(window);
        self
    }

    /// Notification kinds received, in order.
    #[must_use]
    pub fn kinds(&self) -> Vec<Notification> { self.calls.iter().map(|call| call.kind).collect() }

    fn record(&mut self, ctx: &mut Context<'_, MockEngine>, target: impl ToString) {
        let kind = ctx.kind();
        if let Some(condition) = ctx.error_condition() {
            self.conditions.push(condition.clone());
        }
        ctx.engine_mut().record(Record::Notified(kind));
        self.calls.push(Call {
            kind,
            target: target.to_string(),
        });
    }
}

impl Handler<MockEngine> for RecordingHandler {
    fn on_container_start(&mut self, ctx: &mut Context<'_, MockEngine>, container: &dyn Container) {
        self.record(ctx, container.id());
    }

    fn on_sendable(&mut self, ctx: &mut Context<'_, MockEngine>, sender: LinkId) {
        self.record(ctx, sender);
        if let Some(reply) = &self.reply {
            ctx.send(sender, reply).expect("reply should encode");
        }
    }

    fn on_message(&mut self, ctx: &mut Context<'_, MockEngine>, delivery: DeliveryId, message: &Message) {
        self.record(ctx, delivery);
        self.messages.push(message.clone());
        match self.on_message {
            MessageReaction::Ignore => {}
            MessageReaction::Accept => ctx.accept(delivery),
            MessageReaction::Reject => ctx.reject(delivery),
            MessageReaction::Release => ctx.release(delivery),
            MessageReaction::Settle => ctx.settle(delivery),
        }
    }

    fn on_delivery_settle(&mut self, ctx: &mut Context<'_, MockEngine>, delivery: DeliveryId) {
        self.record(ctx, delivery);
    }

    fn on_delivery_accept(&mut self, ctx: &mut Context<'_, MockEngine>, delivery: DeliveryId) {
        self.record(ctx, delivery);
    }

    fn on_delivery_reject(&mut self, ctx: &mut Context<'_, MockEngine>, delivery: DeliveryId) {
        self.record(ctx, delivery);
    }

    fn on_delivery_release(&mut self, ctx: &mut Context<'_, MockEngine>, delivery: DeliveryId) {
        self.record(ctx, delivery);
    }

    fn on_connection_open(&mut self, ctx: &mut Context<'_, MockEngine>, connection: ConnectionId) {
        self.record(ctx, connection);
    }

    fn on_connection_close(&mut self, ctx: &mut Context<'_, MockEngine>, connection: ConnectionId) {
        self.record(ctx, connection);
    }

    fn on_connection_error(&mut self, ctx: &mut Context<'_, MockEngine>, connection: ConnectionId) {
        self.record(ctx, connection);
    }

    fn on_session_open(&mut self, ctx: &mut Context<'_, MockEngine>, session: SessionId) {
        self.record(ctx, session);
    }

    fn on_session_close(&mut self, ctx: &mut Context<'_, MockEngine>, session: SessionId) {
        self.record(ctx, session);
    }

    fn on_session_error(&mut self, ctx: &mut Context<'_, MockEngine>, session: SessionId) {
        self.record(ctx, session);
    }

    fn on_receiver_open(&mut self, ctx: &mut Context<'_, MockEngine>, receiver: LinkId) {
        self.record(ctx, receiver);
        if let Some(window) = self.window_on_open {
            ctx.link_context_mut(receiver).credit_window = window;
        }
    }

    fn on_receiver_close(&mut self, ctx: &mut Context<'_, MockEngine>, receiver: LinkId) {
        self.record(ctx, receiver);
    }

    fn on_receiver_error(&mut self, ctx: &mut Context<'_, MockEngine>, receiver: LinkId) {
        self.record(ctx, receiver);
    }

    fn on_sender_open(&mut self, ctx: &mut Context<'_, MockEngine>, sender: LinkId) {
        self.record(ctx, sender);
    }

    fn on_sender_close(&mut self, ctx: &mut Context<'_, MockEngine>, sender: LinkId) {
        self.record(ctx, sender);
    }

    fn on_sender_error(&mut self, ctx: &mut Context<'_, MockEngine>, sender: LinkId) {
        self.record(ctx, sender);
    }

    fn on_transport_close(&mut self, ctx: &mut Context<'_, MockEngine>, transport: TransportId) {
        self.record(ctx, transport);
    }

    fn on_transport_error(&mut self, ctx: &mut Context<'_, MockEngine>, transport: TransportId) {
        self.record(ctx, transport);
    }

    fn on_timer(&mut self, ctx: &mut Context<'_, MockEngine>, container: &dyn Container) {
        self.record(ctx, container.id());
    }
}
