//! The container hosting the adapter.
//!
//! Containers are optional. Without one, start and timer events are not
//! forwarded and links opened on the application's behalf get no default
//! options.

use crate::config::LinkOptions;

/// Process-level owner of connections, as seen by the adapter.
pub trait Container {
    /// Identifier advertised to peers.
    fn id(&self) -> &str;

    /// Options applied to links the adapter opens automatically.
    fn link_options(&self) -> LinkOptions { LinkOptions::default() }
}

/// Container with a fixed identifier and default link options.
///
/// ```
/// use amqp_adapter::{Container, LinkOptions, StaticContainer};
///
/// let container = StaticContainer::new("broker-a")
///     .with_link_options(LinkOptions::default().credit_window(100));
/// assert_eq!(container.id(), "broker-a");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaticContainer {
    id: String,
    link_options: LinkOptions,
}

impl StaticContainer {
    /// Create a container named `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            link_options: LinkOptions::default(),
        }
    }

    /// Set the options applied to automatically opened links.
    #[must_use]
    pub fn with_link_options(mut self, options: LinkOptions) -> Self {
        self.link_options = options;
        self
    }
}

impl Container for StaticContainer {
    fn id(&self) -> &str { &self.id }

    fn link_options(&self) -> LinkOptions { self.link_options }
}
