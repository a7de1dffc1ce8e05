//! Event dispatcher turning raw engine events into handler notifications.
//!
//! [`MessagingAdapter`] is the single entry point. Each raw [`Event`] is
//! routed to exactly one routine, which notifies the [`Handler`] and then
//! applies the default protocol reaction for the event: credit top-up,
//! automatic open or close, automatic accept or settle. The handler always
//! observes an event before the adapter reacts to it.
//!
//! Dispatch is synchronous and single-threaded. One event is fully handled,
//! including every handler callback, before the next is considered.

mod credit;
mod delivery;
mod lifecycle;

use log::trace;

use crate::{
    codec::{BincodeCodec, MessageCodec},
    config::AdapterConfig,
    container::Container,
    context::{ContextStore, LinkContext},
    engine::{Engine, EventSource, LinkId, Role},
    event::Event,
    handler::{Context, Handler},
    notification::Notification,
};

/// Adapter between a protocol engine and an application [`Handler`].
///
/// The adapter borrows the handler for its whole lifetime and owns the
/// side tables holding per-link and per-connection state.
///
/// ```
/// use amqp_adapter::{Engine, Handler, MessagingAdapter};
///
/// struct Quiet;
/// impl<E: Engine> Handler<E> for Quiet {}
///
/// let mut handler = Quiet;
/// let adapter = MessagingAdapter::new(&mut handler);
/// assert_eq!(adapter.contexts().link_count(), 0);
/// ```
pub struct MessagingAdapter<'h, H: ?Sized, C = BincodeCodec> {
    delegate: &'h mut H,
    container: Option<&'h dyn Container>,
    contexts: ContextStore,
    codec: C,
}

impl<'h, H: ?Sized> MessagingAdapter<'h, H> {
    /// Create an adapter with default configuration and the bincode codec.
    #[must_use]
    pub fn new(delegate: &'h mut H) -> Self { Self::with_config(delegate, AdapterConfig::default()) }

    /// Create an adapter whose link contexts start from `config`.
    #[must_use]
    pub fn with_config(delegate: &'h mut H, config: AdapterConfig) -> Self {
        Self {
            delegate,
            container: None,
            contexts: ContextStore::new(config),
            codec: BincodeCodec,
        }
    }
}

impl<'h, H: ?Sized, C: MessageCodec> MessagingAdapter<'h, H, C> {
    /// Replace the message codec.
    #[must_use]
    pub fn with_codec<C2: MessageCodec>(self, codec: C2) -> MessagingAdapter<'h, H, C2> {
        MessagingAdapter {
            delegate: self.delegate,
            container: self.container,
            contexts: self.contexts,
            codec,
        }
    }

    /// Attach the hosting container.
    ///
    /// Start and timer events are forwarded only when a container is
    /// attached, and links opened automatically use its link options.
    #[must_use]
    pub fn with_container(mut self, container: &'h dyn Container) -> Self {
        self.container = Some(container);
        self
    }

    /// Side tables held by the adapter.
    #[must_use]
    pub fn contexts(&self) -> &ContextStore { &self.contexts }

    /// Mutable access to the side tables.
    pub fn contexts_mut(&mut self) -> &mut ContextStore { &mut self.contexts }

    /// Settings of `link`, created from the defaults on first use.
    pub fn link_context_mut(&mut self, link: LinkId) -> &mut LinkContext {
        self.contexts.link_mut(link)
    }

    /// Handle one raw engine event.
    pub fn dispatch<E>(&mut self, engine: &mut E, event: &Event)
    where
        E: Engine + ?Sized,
        H: Handler<E>,
    {
        trace!("dispatching {}", event.name());
        match *event {
            Event::ReactorInit => self.on_reactor_init(engine, event),
            Event::LinkFlow { link } => self.on_link_flow(engine, event, link),
            Event::Delivery { link, delivery } => self.on_delivery(engine, event, link, delivery),
            Event::LinkRemoteClose { link } => self.on_link_remote_close(engine, event, link),
            Event::SessionRemoteClose { session } => {
                self.on_session_remote_close(engine, event, session);
            }
            Event::ConnectionRemoteClose { connection } => {
                self.on_connection_remote_close(engine, event, connection);
            }
            Event::ConnectionRemoteOpen { connection } => {
                self.on_connection_remote_open(engine, event, connection);
            }
            Event::SessionRemoteOpen { session } => {
                self.on_session_remote_open(engine, event, session);
            }
            Event::LinkLocalOpen { link } => self.credit_topup(engine, link),
            Event::LinkRemoteOpen { link } => self.on_link_remote_open(engine, event, link),
            Event::TransportTailClosed {
                connection,
                transport,
            } => self.on_transport_tail_closed(engine, event, connection, transport),
            Event::TimerTask => self.on_timer_task(engine, event),
            Event::LinkFinal { link } => {
                self.contexts.remove_link(link);
            }
            Event::ConnectionFinal { connection } => {
                self.contexts.remove_connection(connection);
            }
            Event::ConnectionInit { .. }
            | Event::ConnectionLocalOpen { .. }
            | Event::ConnectionLocalClose { .. }
            | Event::SessionLocalOpen { .. }
            | Event::SessionLocalClose { .. }
            | Event::LinkLocalClose { .. }
            | Event::TransportHeadClosed { .. } => {}
        }
    }

    /// Pull events from `engine` and dispatch them in order until it is idle.
    ///
    /// Returns the number of events handled.
    pub fn run<E>(&mut self, engine: &mut E) -> usize
    where
        E: Engine + EventSource + ?Sized,
        H: Handler<E>,
    {
        let mut handled = 0;
        while let Some(event) = engine.next_event() {
            self.dispatch(engine, &event);
            handled += 1;
        }
        handled
    }

    /// Invoke one handler method with a fresh [`Context`].
    fn notify<E, F>(&mut self, engine: &mut E, event: &Event, kind: Notification, call: F)
    where
        E: Engine + ?Sized,
        H: Handler<E>,
        F: FnOnce(&mut H, &mut Context<'_, E>),
    {
        trace!("notifying {kind} for {}", event.name());
        crate::metrics::inc_notifications(kind);
        let mut ctx = Context::new(
            kind,
            event,
            engine,
            &mut self.contexts,
            self.container,
            &self.codec,
        );
        call(&mut *self.delegate, &mut ctx);
    }

    fn on_reactor_init<E>(&mut self, engine: &mut E, event: &Event)
    where
        E: Engine + ?Sized,
        H: Handler<E>,
    {
        if let Some(container) = self.container {
            self.notify(engine, event, Notification::Start, |h, ctx| {
                h.on_container_start(ctx, container);
            });
        }
    }

    fn on_link_flow<E>(&mut self, engine: &mut E, event: &Event, link: Option<LinkId>)
    where
        E: Engine + ?Sized,
        H: Handler<E>,
    {
        let sendable = link
            .filter(|&l| engine.link_role(l) == Role::Sender && engine.link_credit(l) > 0);
        if let Some(sender) = sendable {
            self.notify(engine, event, Notification::Sendable, |h, ctx| {
                h.on_sendable(ctx, sender);
            });
        }
        self.credit_topup(engine, link);
    }

    fn on_timer_task<E>(&mut self, engine: &mut E, event: &Event)
    where
        E: Engine + ?Sized,
        H: Handler<E>,
    {
        if let Some(container) = self.container {
            self.notify(engine, event, Notification::Timer, |h, ctx| {
                h.on_timer(ctx, container);
            });
        }
    }
}
