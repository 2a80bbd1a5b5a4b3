use std::fmt;

use bytes::Bytes;

use crate::error::ReadOnlyBodyError;
use crate::summary::ByteLen;

/// Fixed per-message overhead assumed by size estimates, in bytes.
pub const DEFAULT_MINIMUM_MESSAGE_SIZE: usize = 1024;

/// Priority a message carries unless the producer sets one.
pub const DEFAULT_PRIORITY: u8 = 4;

/// Header state shared by every OpenWire message type.
///
/// Carries the identity and routing fields, the marshalled property table,
/// the read-only flags that freeze a message once it has been dispatched,
/// and the cached size estimate. Body representations (see
/// [`TextMessage`](crate::TextMessage)) embed a `Message` and delegate the
/// generic parts of their contract to it.
///
/// A cached size of `0` means "unknown"; body changes reset it through
/// [`invalidate_size`](Self::invalidate_size).
#[derive(Clone, PartialEq, Eq)]
pub struct Message {
    pub command_id: i32,
    pub response_required: bool,
    pub message_id: Option<String>,
    pub destination: Option<String>,
    pub correlation_id: Option<String>,
    pub message_type: Option<String>,
    pub persistent: bool,
    pub priority: u8,
    pub timestamp: i64,
    pub expiration: i64,
    marshalled_properties: Option<Bytes>,
    read_only_body: bool,
    read_only_properties: bool,
    size: usize,
}

impl Default for Message {
    fn default() -> Self {
        Self {
            command_id: 0,
            response_required: false,
            message_id: None,
            destination: None,
            correlation_id: None,
            message_type: None,
            persistent: false,
            priority: DEFAULT_PRIORITY,
            timestamp: 0,
            expiration: 0,
            marshalled_properties: None,
            read_only_body: false,
            read_only_properties: false,
            size: 0,
        }
    }
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marshalled_properties(&self) -> Option<&Bytes> {
        self.marshalled_properties.as_ref()
    }

    pub fn set_marshalled_properties(&mut self, properties: Option<Bytes>) {
        self.marshalled_properties = properties;
        self.invalidate_size();
    }

    pub fn is_read_only_body(&self) -> bool {
        self.read_only_body
    }

    pub fn set_read_only_body(&mut self, read_only: bool) {
        self.read_only_body = read_only;
    }

    pub fn is_read_only_properties(&self) -> bool {
        self.read_only_properties
    }

    pub fn set_read_only_properties(&mut self, read_only: bool) {
        self.read_only_properties = read_only;
    }

    /// Fail if the body has been frozen.
    ///
    /// # Errors
    ///
    /// [`ReadOnlyBodyError`] when the body is read-only.
    pub fn check_read_only_body(&self) -> Result<(), ReadOnlyBodyError> {
        if self.read_only_body {
            return Err(ReadOnlyBodyError);
        }
        Ok(())
    }

    /// Freeze body and properties as the message is handed to a connection.
    pub fn on_send(&mut self) {
        self.read_only_body = true;
        self.read_only_properties = true;
    }

    /// Reset the generic body state: the body becomes writable again.
    pub fn clear_body(&mut self) {
        self.read_only_body = false;
        self.invalidate_size();
    }

    pub fn minimum_message_size(&self) -> usize {
        DEFAULT_MINIMUM_MESSAGE_SIZE
    }

    pub fn cached_size(&self) -> usize {
        self.size
    }

    pub(crate) fn set_cached_size(&mut self, size: usize) {
        self.size = size;
    }

    pub fn invalidate_size(&mut self) {
        self.size = 0;
    }

    /// Estimated on-wire size, computed once and cached.
    ///
    /// When nothing is cached the estimate is the minimum overhead plus
    /// the marshalled properties plus `content_len`.
    pub fn estimated_size(&mut self, content_len: Option<usize>) -> usize {
        if self.size == 0 {
            self.size = self.minimum_message_size()
                + self.marshalled_properties.as_ref().map_or(0, Bytes::len)
                + content_len.unwrap_or(0);
        }
        self.size
    }

    /// Write the header fields into a debug representation.
    ///
    /// Byte-valued fields are rendered as lengths only.
    pub fn debug_fields(&self, s: &mut fmt::DebugStruct<'_, '_>) {
        s.field("command_id", &self.command_id)
            .field("response_required", &self.response_required)
            .field("message_id", &self.message_id)
            .field("destination", &self.destination)
            .field("correlation_id", &self.correlation_id)
            .field("message_type", &self.message_type)
            .field("persistent", &self.persistent)
            .field("priority", &self.priority)
            .field("timestamp", &self.timestamp)
            .field("expiration", &self.expiration)
            .field(
                "marshalled_properties",
                &self.marshalled_properties.as_ref().map(|p| ByteLen(p.len())),
            )
            .field("read_only_body", &self.read_only_body)
            .field("read_only_properties", &self.read_only_properties);
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Message");
        self.debug_fields(&mut s);
        s.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_message_is_writable_with_default_priority() {
        let message = Message::new();
        assert!(!message.is_read_only_body());
        assert!(!message.is_read_only_properties());
        assert_eq!(message.priority, DEFAULT_PRIORITY);
        assert_eq!(message.cached_size(), 0);
    }

    #[test]
    fn on_send_freezes_body_and_properties() {
        let mut message = Message::new();
        message.on_send();
        assert!(message.is_read_only_body());
        assert!(message.is_read_only_properties());
        assert!(message.check_read_only_body().is_err());
    }

    #[test]
    fn clear_body_makes_body_writable() {
        let mut message = Message::new();
        message.on_send();
        message.clear_body();
        assert!(message.check_read_only_body().is_ok());
        assert!(message.is_read_only_properties());
    }

    #[test]
    fn estimated_size_adds_properties_and_content() {
        let mut message = Message::new();
        message.set_marshalled_properties(Some(Bytes::from_static(&[0u8; 10])));
        assert_eq!(
            message.estimated_size(Some(5)),
            DEFAULT_MINIMUM_MESSAGE_SIZE + 15
        );
    }

    #[test]
    fn estimated_size_is_cached_until_invalidated() {
        let mut message = Message::new();
        assert_eq!(message.estimated_size(None), DEFAULT_MINIMUM_MESSAGE_SIZE);
        assert_eq!(message.estimated_size(Some(100)), DEFAULT_MINIMUM_MESSAGE_SIZE);
        message.invalidate_size();
        assert_eq!(
            message.estimated_size(Some(100)),
            DEFAULT_MINIMUM_MESSAGE_SIZE + 100
        );
    }

    #[test]
    fn setting_properties_invalidates_size() {
        let mut message = Message::new();
        message.estimated_size(None);
        message.set_marshalled_properties(Some(Bytes::from_static(b"props")));
        assert_eq!(message.cached_size(), 0);
    }

    #[test]
    fn debug_shows_property_length_not_bytes() {
        let mut message = Message::new();
        message.set_marshalled_properties(Some(Bytes::from_static(b"secret")));
        let rendered = format!("{message:?}");
        assert!(rendered.contains("marshalled_properties: Some(<6 bytes>)"));
        assert!(!rendered.contains("secret"));
    }
}
