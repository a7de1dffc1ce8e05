//! Default open and close handling for connections, sessions and links.
//!
//! A remote open is always reported, then echoed with a local open if the
//! application has not touched the local endpoint. A remote close reports the
//! error condition first when one is set, then the close, and is always
//! echoed with a local close.

use log::debug;

use super::MessagingAdapter;
use crate::{
    codec::MessageCodec,
    engine::{
        ConnectionId,
        EndpointState,
        Engine,
        LinkId,
        Role,
        SessionId,
        TransportId,
        condition_is_set,
    },
    event::Event,
    handler::Handler,
    notification::Notification,
};

/// Whether the adapter should open the local end on the application's behalf.
fn needs_default_open(state: EndpointState) -> bool {
    !state.is_local_open() && state.is_local_uninitialised()
}

impl<H: ?Sized, C: MessageCodec> MessagingAdapter<'_, H, C> {
    pub(super) fn on_connection_remote_open<E>(
        &mut self,
        engine: &mut E,
        event: &Event,
        connection: ConnectionId,
    ) where
        E: Engine + ?Sized,
        H: Handler<E>,
    {
        self.notify(engine, event, Notification::ConnectionOpen, |h, ctx| {
            h.on_connection_open(ctx, connection);
        });
        if needs_default_open(engine.connection_state(connection)) {
            debug!("opening {connection} in response to remote open");
            engine.open_connection(connection);
        }
    }

    pub(super) fn on_session_remote_open<E>(&mut self, engine: &mut E, event: &Event, session: SessionId)
    where
        E: Engine + ?Sized,
        H: Handler<E>,
    {
        self.notify(engine, event, Notification::SessionOpen, |h, ctx| {
            h.on_session_open(ctx, session);
        });
        if needs_default_open(engine.session_state(session)) {
            debug!("opening {session} in response to remote open");
            engine.open_session(session);
        }
    }

    pub(super) fn on_link_remote_open<E>(&mut self, engine: &mut E, event: &Event, link: LinkId)
    where
        E: Engine + ?Sized,
        H: Handler<E>,
    {
        self.credit_topup(engine, Some(link));
        match engine.link_role(link) {
            Role::Receiver => self.notify(engine, event, Notification::LinkOpen, |h, ctx| {
                h.on_receiver_open(ctx, link);
            }),
            Role::Sender => self.notify(engine, event, Notification::LinkOpen, |h, ctx| {
                h.on_sender_open(ctx, link);
            }),
        }
        if needs_default_open(engine.link_state(link)) {
            // Outside a container there are no default link options.
            if let Some(container) = self.container {
                container.link_options().apply(self.contexts.link_mut(link));
            }
            debug!("opening {link} in response to remote open");
            engine.open_link(link);
        }
        self.credit_topup(engine, Some(link));
    }

    pub(super) fn on_connection_remote_close<E>(
        &mut self,
        engine: &mut E,
        event: &Event,
        connection: ConnectionId,
    ) where
        E: Engine + ?Sized,
        H: Handler<E>,
    {
        if condition_is_set(engine.connection_remote_condition(connection)) {
            self.notify(engine, event, Notification::ConnectionError, |h, ctx| {
                h.on_connection_error(ctx, connection);
            });
        }
        self.notify(engine, event, Notification::ConnectionClose, |h, ctx| {
            h.on_connection_close(ctx, connection);
        });
        debug!("closing {connection} in response to remote close");
        engine.close_connection(connection);
    }

    pub(super) fn on_session_remote_close<E>(&mut self, engine: &mut E, event: &Event, session: SessionId)
    where
        E: Engine + ?Sized,
        H: Handler<E>,
    {
        if condition_is_set(engine.session_remote_condition(session)) {
            self.notify(engine, event, Notification::SessionError, |h, ctx| {
                h.on_session_error(ctx, session);
            });
        }
        self.notify(engine, event, Notification::SessionClose, |h, ctx| {
            h.on_session_close(ctx, session);
        });
        debug!("closing {session} in response to remote close");
        engine.close_session(session);
    }

    pub(super) fn on_link_remote_close<E>(&mut self, engine: &mut E, event: &Event, link: LinkId)
    where
        E: Engine + ?Sized,
        H: Handler<E>,
    {
        let failed = condition_is_set(engine.link_remote_condition(link));
        match engine.link_role(link) {
            Role::Receiver => {
                if failed {
                    self.notify(engine, event, Notification::LinkError, |h, ctx| {
                        h.on_receiver_error(ctx, link);
                    });
                }
                self.notify(engine, event, Notification::LinkClose, |h, ctx| {
                    h.on_receiver_close(ctx, link);
                });
            }
            Role::Sender => {
                if failed {
                    self.notify(engine, event, Notification::LinkError, |h, ctx| {
                        h.on_sender_error(ctx, link);
                    });
                }
                self.notify(engine, event, Notification::LinkClose, |h, ctx| {
                    h.on_sender_close(ctx, link);
                });
            }
        }
        debug!("closing {link} in response to remote close");
        engine.close_link(link);
    }

    pub(super) fn on_transport_tail_closed<E>(
        &mut self,
        engine: &mut E,
        event: &Event,
        connection: Option<ConnectionId>,
        transport: TransportId,
    ) where
        E: Engine + ?Sized,
        H: Handler<E>,
    {
        let Some(connection) = connection else {
            return;
        };
        if !engine.connection_state(connection).is_local_open() {
            return;
        }
        if condition_is_set(engine.transport_condition(transport)) {
            self.notify(engine, event, Notification::TransportError, |h, ctx| {
                h.on_transport_error(ctx, transport);
            });
        }
        self.notify(engine, event, Notification::TransportClose, |h, ctx| {
            h.on_transport_close(ctx, transport);
        });
    }
}
