//! Metric helpers for `amqp_adapter`.
//!
//! This module defines metric names and simple helper functions wrapping the
//! [`metrics`](https://docs.rs/metrics) crate. Without the `metrics` feature
//! the helpers compile to nothing.

#[cfg(feature = "metrics")]
use metrics::counter;

use crate::notification::Notification;

/// Name of the counter tracking notifications raised on handlers.
pub const NOTIFICATIONS_TOTAL: &str = "amqp_adapter_notifications_total";
/// Name of the counter tracking credit granted by automatic top-up.
pub const CREDIT_ISSUED_TOTAL: &str = "amqp_adapter_credit_issued_total";
/// Name of the counter tracking dispositions applied on the handler's behalf.
pub const AUTO_DISPOSITIONS_TOTAL: &str = "amqp_adapter_auto_dispositions_total";
/// Name of the counter tracking payloads that failed to decode.
pub const DECODE_ERRORS_TOTAL: &str = "amqp_adapter_decode_errors_total";

/// Disposition applied automatically by the adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutoDisposition {
    /// A received message was accepted after the handler left it unsettled.
    Accept,
    /// A message arriving on a closed link was released.
    Release,
    /// A message that failed to decode was rejected.
    Reject,
    /// An outgoing delivery was settled.
    Settle,
}

impl AutoDisposition {
    fn as_str(self) -> &'static str {
        match self {
            AutoDisposition::Accept => "accept",
            AutoDisposition::Release => "release",
            AutoDisposition::Reject => "reject",
            AutoDisposition::Settle => "settle",
        }
    }
}

/// Record a notification raised on the handler.
pub fn inc_notifications(kind: Notification) {
    #[cfg(feature = "metrics")]
    counter!(NOTIFICATIONS_TOTAL, "kind" => kind.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = kind;
}

/// Record positive credit granted by a top-up.
pub fn add_credit(delta: i32) {
    #[cfg(feature = "metrics")]
    if let Ok(granted) = u64::try_from(delta) {
        counter!(CREDIT_ISSUED_TOTAL).increment(granted);
    }
    #[cfg(not(feature = "metrics"))]
    let _ = delta;
}

/// Record a disposition applied on the handler's behalf.
pub fn inc_auto_disposition(action: AutoDisposition) {
    #[cfg(feature = "metrics")]
    counter!(AUTO_DISPOSITIONS_TOTAL, "action" => action.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = action.as_str();
}

/// Record a payload that failed to decode.
pub fn inc_decode_errors() {
    #[cfg(feature = "metrics")]
    counter!(DECODE_ERRORS_TOTAL).increment(1);
}
