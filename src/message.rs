//! Decoded message value handed to handlers.

/// An application message.
///
/// Incoming messages are decoded into a per-connection instance that is
/// overwritten for every delivery, so handlers that need to keep a message
/// beyond the callback must clone it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Message {
    /// Application-assigned message identifier.
    pub id: Option<u64>,
    /// Identifier of the message this one responds to.
    pub correlation_id: Option<u64>,
    /// Free-form subject line.
    pub subject: Option<String>,
    /// MIME type of the body.
    pub content_type: Option<String>,
    /// Opaque payload.
    pub body: Vec<u8>,
}

impl Message {
    /// Create a message carrying `body`.
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }

    /// Set the message identifier.
    #[must_use]
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the correlation identifier.
    #[must_use]
    pub fn with_correlation_id(mut self, id: u64) -> Self {
        self.correlation_id = Some(id);
        self
    }

    /// Set the subject.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Overwrite `slot` with `value`, reusing its buffer when one exists.
pub(crate) fn assign_text(slot: &mut Option<String>, value: Option<&str>) {
    let Some(value) = value else {
        *slot = None;
        return;
    };
    match slot {
        Some(text) => {
            text.clear();
            text.push_str(value);
        }
        None => *slot = Some(value.to_owned()),
    }
}
