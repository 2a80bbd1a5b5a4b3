//! Fixtures shared by the integration tests and benches.

use bytes::Bytes;
use openwire_message::{Message, TextMessage, WireFormat};

pub const PLAIN: WireFormat = WireFormat {
    compression: false,
    compression_level: 6,
};

pub const DEFLATED: WireFormat = WireFormat {
    compression: true,
    compression_level: 6,
};

/// A message that has had `text` set and gone through the pre-marshal hook.
///
/// # Panics
///
/// Panics if encoding fails, which no fixture text should cause.
pub fn sent(text: &str, format: &WireFormat) -> TextMessage {
    let mut message = TextMessage::new();
    message.set_text(text).expect("fresh message is writable");
    message.before_marshal(format).expect("fixture text encodes");
    message
}

/// A message as the transport would build it from received body bytes.
pub fn received(content: impl Into<Bytes>, compressed: bool) -> TextMessage {
    TextMessage::from_wire(Message::new(), content.into(), compressed)
}

/// Body bytes for `text`, produced the same way a sender would.
///
/// # Panics
///
/// Panics if encoding fails.
pub fn body_of(text: &str, format: &WireFormat) -> Bytes {
    sent(text, format)
        .content()
        .cloned()
        .expect("encoded message has content")
}

/// `len` characters cycling through the lowercase alphabet.
pub fn alphabet(len: usize) -> String {
    ('a'..='z').cycle().take(len).collect()
}
