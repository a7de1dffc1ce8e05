//! Assertion macros shared by integration tests.

/// Assert the notification kinds a [`RecordingHandler`](crate::RecordingHandler)
/// received, reporting the call site on failure.
#[macro_export]
macro_rules! assert_notified {
    ($handler:expr, [$($kind:expr),* $(,)?]) => {{
        let expected: ::std::vec::Vec<::amqp_adapter::Notification> = ::std::vec![$($kind),*];
        assert_eq!(
            $handler.kinds(),
            expected,
            concat!("unexpected notifications at ", file!(), ":", line!())
        );
    }};
}

pub use crate::assert_notified;
