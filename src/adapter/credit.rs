//! Credit replenishment for receiver links.

use log::trace;

use super::MessagingAdapter;
use crate::{
    codec::MessageCodec,
    context::ContextStore,
    engine::{Engine, LinkId, Role},
};

/// Bring `link`'s outstanding credit back up to its configured window.
///
/// Does nothing for absent links, sender links, and links whose window is
/// zero (manual flow control). Otherwise issues `window - credit` through
/// [`Engine::flow`] without clamping, so the delta may be zero or negative.
/// The one exception is overflow: a window above `i32::MAX`, or a delta that
/// would not fit in an `i32`, saturates at the `i32` bounds.
pub(crate) fn top_up<E>(engine: &mut E, contexts: &ContextStore, link: Option<LinkId>)
where
    E: Engine + ?Sized,
{
    let Some(link) = link.filter(|&l| engine.link_role(l) == Role::Receiver) else {
        return;
    };
    let window = contexts.link(link).credit_window;
    if window == 0 {
        return;
    }
    let window = i32::try_from(window).unwrap_or(i32::MAX);
    let delta = window.saturating_sub(engine.link_credit(link));
    trace!("credit top-up: link={link}, window={window}, delta={delta}");
    engine.flow(link, delta);
    crate::metrics::add_credit(delta);
}

impl<H: ?Sized, C: MessageCodec> MessagingAdapter<'_, H, C> {
    pub(super) fn credit_topup<E>(&mut self, engine: &mut E, link: Option<LinkId>)
    where
        E: Engine + ?Sized,
    {
        top_up(engine, &self.contexts, link);
    }
}
