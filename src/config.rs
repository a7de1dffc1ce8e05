//! Adapter configuration.
//!
//! [`AdapterConfig`] supplies the values used when a link context is created
//! lazily. [`LinkOptions`] overlays individual settings onto a link context,
//! typically as the container-wide defaults applied when the adapter opens a
//! link on the application's behalf.

use serde::{Deserialize, Serialize};

use crate::context::LinkContext;

/// Credit window applied to receiver links unless configured otherwise.
pub const DEFAULT_CREDIT_WINDOW: u32 = 10;

/// Defaults for newly created link contexts.
///
/// ```
/// use amqp_adapter::AdapterConfig;
///
/// let config = AdapterConfig::default().credit_window(0).auto_accept(false);
/// assert_eq!(config.link_defaults().credit_window, 0);
/// assert!(!config.link_defaults().auto_accept);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    credit_window: u32,
    auto_accept: bool,
    auto_settle: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            credit_window: DEFAULT_CREDIT_WINDOW,
            auto_accept: true,
            auto_settle: true,
        }
    }
}

impl AdapterConfig {
    /// Set the credit window for receiver links. Zero disables automatic
    /// flow control.
    #[must_use]
    pub fn credit_window(mut self, window: u32) -> Self {
        self.credit_window = window;
        self
    }

    /// Accept complete incoming messages once the handler returns.
    #[must_use]
    pub fn auto_accept(mut self, enabled: bool) -> Self {
        self.auto_accept = enabled;
        self
    }

    /// Settle outgoing deliveries once the peer reports an outcome.
    #[must_use]
    pub fn auto_settle(mut self, enabled: bool) -> Self {
        self.auto_settle = enabled;
        self
    }

    /// Link context every new link starts with.
    #[must_use]
    pub fn link_defaults(&self) -> LinkContext {
        LinkContext {
            credit_window: self.credit_window,
            auto_accept: self.auto_accept,
            auto_settle: self.auto_settle,
        }
    }
}

/// Optional per-link settings applied when a link is opened.
///
/// Unset fields leave the link context untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkOptions {
    credit_window: Option<u32>,
    auto_accept: Option<bool>,
    auto_settle: Option<bool>,
}

impl LinkOptions {
    /// Override the credit window.
    #[must_use]
    pub fn credit_window(mut self, window: u32) -> Self {
        self.credit_window = Some(window);
        self
    }

    /// Override automatic acceptance.
    #[must_use]
    pub fn auto_accept(mut self, enabled: bool) -> Self {
        self.auto_accept = Some(enabled);
        self
    }

    /// Override automatic settlement.
    #[must_use]
    pub fn auto_settle(mut self, enabled: bool) -> Self {
        self.auto_settle = Some(enabled);
        self
    }

    /// Write every set option into `context`.
    pub fn apply(&self, context: &mut LinkContext) {
        if let Some(window) = self.credit_window {
            context.credit_window = window;
        }
        if let Some(enabled) = self.auto_accept {
            context.auto_accept = enabled;
        }
        if let Some(enabled) = self.auto_settle {
            context.auto_settle = enabled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_automatic_behaviour() {
        let ctx = AdapterConfig::default().link_defaults();
        assert_eq!(ctx.credit_window, DEFAULT_CREDIT_WINDOW);
        assert!(ctx.auto_accept);
        assert!(ctx.auto_settle);
    }

    #[test]
    fn options_only_touch_set_fields() {
        let mut ctx = AdapterConfig::default().link_defaults();
        LinkOptions::default().credit_window(50).apply(&mut ctx);
        assert_eq!(ctx.credit_window, 50);
        assert!(ctx.auto_accept);
        assert!(ctx.auto_settle);

        LinkOptions::default().auto_settle(false).apply(&mut ctx);
        assert_eq!(ctx.credit_window, 50);
        assert!(!ctx.auto_settle);
    }

    #[test]
    fn config_deserialises_with_missing_fields() {
        let config: AdapterConfig =
            serde_json::from_str(r#"{ "credit_window": 0 }"#).expect("valid config");
        assert_eq!(config, AdapterConfig::default().credit_window(0));
    }

    #[test]
    fn link_options_deserialise() {
        let options: LinkOptions =
            serde_json::from_str(r#"{ "auto_accept": false }"#).expect("valid options");
        assert_eq!(options, LinkOptions::default().auto_accept(false));
    }
}
