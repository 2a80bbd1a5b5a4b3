use std::fmt;

use bytes::Bytes;
use openwire_wire::CommandType;
use openwire_wire::utf8::{read_utf8, write_utf8};

use crate::config::WireFormat;
use crate::error::{DecodeError, EncodeError, ReadOnlyBodyError};
use crate::message::Message;
use crate::stream::{BodyReader, BodyWriter, MAX_INFLATED_BODY_SIZE};
use crate::summary::{ByteLen, summarize};

/// The payload of a text message, in exactly one representation.
///
/// ```text
///            set_text                 before_marshal
///   Empty ───────────► Decoded(text) ───────────────► Encoded { content, compressed }
///     ▲                    ▲                                   │
///     │ clear_body         └────────── text() ─────────────────┘
///     └──────────────── (from any state)
/// ```
///
/// `compressed` only ever accompanies `content`, so a decoded body can
/// never claim to be compressed.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum TextBody {
    #[default]
    Empty,
    Decoded(String),
    Encoded { content: Bytes, compressed: bool },
}

impl TextBody {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Decoded(text) => Some(text),
            _ => None,
        }
    }

    pub fn content(&self) -> Option<&Bytes> {
        match self {
            Self::Encoded { content, .. } => Some(content),
            _ => None,
        }
    }

    pub fn is_compressed(&self) -> bool {
        matches!(self, Self::Encoded { compressed: true, .. })
    }
}

impl fmt::Debug for TextBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Decoded(text) => f.debug_tuple("Decoded").field(&summarize(text)).finish(),
            Self::Encoded {
                content,
                compressed,
            } => f
                .debug_struct("Encoded")
                .field("content", &ByteLen(content.len()))
                .field("compressed", compressed)
                .finish(),
        }
    }
}

/// An OpenWire text message whose body is materialized lazily.
///
/// The text is kept decoded until the transport calls
/// [`before_marshal`](Self::before_marshal), which encodes it once (deflated
/// when the [`WireFormat`] asks for compression) and drops the string.
/// Bodies received from the wire stay encoded until someone reads them
/// with [`text`](Self::text).
///
/// `Clone` produces an independent copy: the text is cloned by value and
/// the encoded content is an immutable [`Bytes`] handle.
///
/// # Example
///
/// ```rust
/// use openwire_message::{TextMessage, WireFormat};
///
/// let mut message = TextMessage::new();
/// message.set_text("hello").unwrap();
/// message.before_marshal(&WireFormat::default()).unwrap();
/// assert!(message.content().is_some());
///
/// assert_eq!(message.text().unwrap(), Some("hello"));
/// assert!(message.content().is_none());
/// ```
#[derive(Clone, Default)]
pub struct TextMessage {
    message: Message,
    body: TextBody,
}

impl TextMessage {
    /// MIME type reported through `JMSXMimeType`.
    pub const MIME_TYPE: &'static str = "jms/text-message";

    pub fn new() -> Self {
        Self::default()
    }

    /// Build a message from a body received over the wire.
    pub fn from_wire(message: Message, content: Bytes, compressed: bool) -> Self {
        let mut received = Self {
            message,
            body: TextBody::Empty,
        };
        received.set_content(content, compressed);
        received
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn message_mut(&mut self) -> &mut Message {
        &mut self.message
    }

    pub fn body(&self) -> &TextBody {
        &self.body
    }

    pub fn data_structure_type(&self) -> CommandType {
        CommandType::TextMessage
    }

    pub fn jmsx_mime_type(&self) -> &'static str {
        Self::MIME_TYPE
    }

    /// Encoded body bytes, if the body is currently encoded.
    pub fn content(&self) -> Option<&Bytes> {
        self.body.content()
    }

    pub fn is_compressed(&self) -> bool {
        self.body.is_compressed()
    }

    /// Whether the body is currently held as decoded text.
    pub fn has_text(&self) -> bool {
        matches!(self.body, TextBody::Decoded(_))
    }

    /// Replace the payload with `text`, discarding any encoded body.
    ///
    /// # Errors
    ///
    /// [`ReadOnlyBodyError`] once the message has been sent; the message
    /// is not modified.
    pub fn set_text(&mut self, text: impl Into<String>) -> Result<(), ReadOnlyBodyError> {
        self.message.check_read_only_body()?;
        self.replace_body(TextBody::Decoded(text.into()));
        Ok(())
    }

    /// Install an encoded body as received from a peer.
    ///
    /// This is the transport's path in and is not subject to the
    /// read-only check.
    pub fn set_content(&mut self, content: Bytes, compressed: bool) {
        self.replace_body(TextBody::Encoded {
            content,
            compressed,
        });
    }

    /// Return the payload, decoding the body on first access.
    ///
    /// A successful decode replaces the encoded body with the text. A body
    /// that encodes the null string decodes to `None` and leaves the
    /// message empty.
    ///
    /// # Errors
    ///
    /// [`DecodeError`] if the body is truncated, malformed, fails to
    /// inflate or inflates past [`MAX_INFLATED_BODY_SIZE`]. The encoded
    /// body is kept as it was.
    pub fn text(&mut self) -> Result<Option<&str>, DecodeError> {
        self.text_within(MAX_INFLATED_BODY_SIZE)
    }

    /// [`text`](Self::text) with a caller-chosen ceiling on the inflated
    /// body size.
    ///
    /// # Errors
    ///
    /// As for `text`, with [`DecodeError::DecompressionBomb`] once a
    /// compressed body inflates past `limit` bytes.
    pub fn text_within(&mut self, limit: usize) -> Result<Option<&str>, DecodeError> {
        if let TextBody::Encoded {
            content,
            compressed,
        } = &self.body
        {
            let body = match decode_body(content, *compressed, limit)? {
                Some(text) => TextBody::Decoded(text),
                None => TextBody::Empty,
            };
            self.replace_body(body);
        }
        Ok(self.body.text())
    }

    /// Encode the text ahead of marshalling.
    ///
    /// Runs only when the body is decoded text. The text is dropped once
    /// the encoded bytes are in place, so a message sent again unchanged
    /// reuses the same content.
    ///
    /// # Errors
    ///
    /// [`EncodeError`] if the text cannot be encoded or the deflate stream
    /// cannot be finished. The text is kept as it was.
    pub fn before_marshal(&mut self, format: &WireFormat) -> Result<(), EncodeError> {
        self.marshal_with(|text| encode_body(text, format))
    }

    fn marshal_with<F>(&mut self, encode: F) -> Result<(), EncodeError>
    where
        F: FnOnce(&str) -> Result<(Bytes, bool), EncodeError>,
    {
        if let TextBody::Decoded(text) = &self.body {
            let (content, compressed) = encode(text)?;
            self.replace_body(TextBody::Encoded {
                content,
                compressed,
            });
        }
        Ok(())
    }

    /// Drop the payload and make the body writable again.
    pub fn clear_body(&mut self) {
        self.message.clear_body();
        self.body = TextBody::Empty;
    }

    /// Estimated on-wire size of the message.
    ///
    /// While the payload is decoded text and nothing is cached, the
    /// estimate is two bytes per UTF-16 unit of the text; the overhead and
    /// property length are computed first and then replaced by that figure.
    pub fn size(&mut self) -> usize {
        if self.message.cached_size() == 0
            && let TextBody::Decoded(text) = &self.body
        {
            let overhead = self.message.minimum_message_size()
                + self.message.marshalled_properties().map_or(0, Bytes::len);
            self.message.set_cached_size(overhead);
            self.message.set_cached_size(text.encode_utf16().count() * 2);
        }
        self.message.estimated_size(self.body.content().map(Bytes::len))
    }

    /// Debug representation with the payload decoded where possible.
    ///
    /// Long texts are abbreviated to their first 45 and last 12
    /// characters. A body that fails to decode is shown in its encoded
    /// form (as a byte count); this never fails.
    pub fn debug_summary(&mut self) -> String {
        if let Err(error) = self.text() {
            tracing::debug!(%error, "text body not decodable, showing encoded form");
        }
        format!("{self:?}")
    }

    fn replace_body(&mut self, body: TextBody) {
        self.body = body;
        self.message.invalidate_size();
    }
}

impl fmt::Debug for TextMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("TextMessage");
        self.message.debug_fields(&mut s);
        s.field("compressed", &self.body.is_compressed())
            .field("content", &self.body.content().map(|c| ByteLen(c.len())))
            .field("text", &self.body.text().map(summarize))
            .finish()
    }
}

fn decode_body(
    content: &[u8],
    compressed: bool,
    limit: usize,
) -> Result<Option<String>, DecodeError> {
    let mut reader = BodyReader::open(content, compressed, limit);
    let text = match read_utf8(&mut reader) {
        Ok(text) => text,
        Err(_) if reader.limit_exceeded() => return Err(DecodeError::DecompressionBomb { limit }),
        Err(error) => return Err(error.into()),
    };
    reader.close();
    tracing::debug!(len = content.len(), compressed, "decoded text body");
    Ok(text)
}

fn encode_body(text: &str, format: &WireFormat) -> Result<(Bytes, bool), EncodeError> {
    let mut writer = BodyWriter::for_format(format);
    let compressed = writer.is_compressed();
    write_utf8(&mut writer, Some(text))?;
    let content = writer.finish()?;
    tracing::debug!(len = content.len(), compressed, "encoded text body");
    Ok((content, compressed))
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPRESSED: WireFormat = WireFormat {
        compression: true,
        compression_level: 6,
    };

    fn sent(text: &str, format: &WireFormat) -> TextMessage {
        let mut message = TextMessage::new();
        message.set_text(text).unwrap();
        message.before_marshal(format).unwrap();
        message
    }

    #[test]
    fn new_message_is_empty() {
        let mut message = TextMessage::new();
        assert!(message.body().is_empty());
        assert_eq!(message.text().unwrap(), None);
    }

    #[test]
    fn set_text_is_returned_without_encoding() {
        let mut message = TextMessage::new();
        message.set_text("hello").unwrap();
        assert!(message.content().is_none());
        assert_eq!(message.text().unwrap(), Some("hello"));
    }

    #[test]
    fn before_marshal_replaces_text_with_content() {
        let message = sent("hello", &WireFormat::default());
        assert!(!message.has_text());
        assert!(!message.is_compressed());
        assert_eq!(
            &message.content().unwrap()[..],
            b"\x00\x00\x00\x05hello"
        );
    }

    #[test]
    fn hello_scenario() {
        let mut message = TextMessage::new();
        message.set_text("hello").unwrap();
        assert_eq!(message.text().unwrap(), Some("hello"));

        message.before_marshal(&WireFormat::default()).unwrap();
        assert!(message.content().is_some());
        assert!(!message.is_compressed());
        assert!(!message.has_text());

        assert_eq!(message.text().unwrap(), Some("hello"));
        assert!(message.content().is_none());
    }

    #[test]
    fn compressed_roundtrip() {
        let text = "compress me ".repeat(40);
        let mut message = sent(&text, &COMPRESSED);
        assert!(message.is_compressed());
        assert!(message.content().unwrap().len() < text.len());
        assert_eq!(message.text().unwrap(), Some(text.as_str()));
        assert!(!message.is_compressed());
    }

    #[test]
    fn set_text_discards_content() {
        let mut message = sent("old", &WireFormat::default());
        message.set_text("new").unwrap();
        assert!(message.content().is_none());
        assert_eq!(message.text().unwrap(), Some("new"));
    }

    #[test]
    fn read_only_body_rejects_set_text() {
        let mut message = TextMessage::new();
        message.set_text("before").unwrap();
        message.message_mut().on_send();

        assert!(message.set_text("after").is_err());
        assert_eq!(message.text().unwrap(), Some("before"));
    }

    #[test]
    fn before_marshal_is_idempotent() {
        let mut message = sent("again", &WireFormat::default());
        let first = message.content().cloned().unwrap();
        message.before_marshal(&COMPRESSED).unwrap();
        assert_eq!(message.content(), Some(&first));
        assert!(!message.is_compressed());
    }

    #[test]
    fn before_marshal_on_empty_is_noop() {
        let mut message = TextMessage::new();
        message.before_marshal(&COMPRESSED).unwrap();
        assert!(message.body().is_empty());
    }

    #[test]
    fn truncated_content_fails_and_is_kept() {
        let content = Bytes::from_static(b"\x00\x00\x00\x09short");
        let mut message = TextMessage::from_wire(Message::new(), content.clone(), false);
        assert!(message.text().is_err());
        assert_eq!(message.content(), Some(&content));
        assert!(!message.has_text());
    }

    #[test]
    fn corrupt_compressed_content_fails() {
        let content = Bytes::from_static(b"not a deflate stream");
        let mut message = TextMessage::from_wire(Message::new(), content, true);
        assert!(matches!(message.text(), Err(DecodeError::Wire(_))));
        assert!(message.is_compressed());
    }

    #[test]
    fn oversized_inflated_body_is_rejected_and_kept() {
        let text = "z".repeat(10_000);
        let mut message = sent(&text, &COMPRESSED);
        let content = message.content().cloned().unwrap();

        assert!(matches!(
            message.text_within(1024),
            Err(DecodeError::DecompressionBomb { limit: 1024 })
        ));
        assert_eq!(message.content(), Some(&content));
        assert!(message.is_compressed());

        assert_eq!(message.text_within(20_000).unwrap().map(str::len), Some(10_000));
    }

    #[test]
    fn inflate_limit_ignores_plain_bodies() {
        let mut message = sent("plain enough", &WireFormat::default());
        assert_eq!(message.text_within(0).unwrap(), Some("plain enough"));
    }

    #[test]
    fn failed_encode_keeps_text() {
        let mut message = TextMessage::new();
        message.set_text("kept").unwrap();

        let result = message
            .marshal_with(|_| Err(EncodeError::Io(std::io::Error::other("stream closed"))));

        assert!(matches!(result, Err(EncodeError::Io(_))));
        assert!(message.has_text());
        assert!(message.content().is_none());
        assert_eq!(message.text().unwrap(), Some("kept"));
    }

    #[test]
    fn negative_length_prefix_reads_as_null() {
        let content = Bytes::from_static(&[0xFF, 0xFF, 0xFF, 0xFE]);
        let mut message = TextMessage::from_wire(Message::new(), content, false);
        assert_eq!(message.text().unwrap(), None);
        assert!(message.body().is_empty());
    }

    #[test]
    fn null_string_decodes_to_empty() {
        let content = Bytes::from_static(&[0xFF, 0xFF, 0xFF, 0xFF]);
        let mut message = TextMessage::from_wire(Message::new(), content, false);
        assert_eq!(message.text().unwrap(), None);
        assert!(message.body().is_empty());
    }

    #[test]
    fn trailing_bytes_do_not_fail_decode() {
        let content = Bytes::from_static(b"\x00\x00\x00\x02hi!!");
        let mut message = TextMessage::from_wire(Message::new(), content, false);
        assert_eq!(message.text().unwrap(), Some("hi"));
    }

    #[test]
    fn clear_body_empties_and_unfreezes() {
        let mut message = sent("bye", &WireFormat::default());
        message.message_mut().on_send();
        message.clear_body();
        assert!(message.body().is_empty());
        assert!(!message.message().is_read_only_body());
        assert!(message.set_text("again").is_ok());
    }

    #[test]
    fn clone_is_independent() {
        let mut original = TextMessage::new();
        original.set_text("shared").unwrap();
        let mut copy = original.clone();
        copy.set_text("changed").unwrap();
        assert_eq!(original.text().unwrap(), Some("shared"));
        assert_eq!(copy.text().unwrap(), Some("changed"));
    }

    #[test]
    fn size_of_text_is_two_bytes_per_unit() {
        let mut message = TextMessage::new();
        message
            .message_mut()
            .set_marshalled_properties(Some(Bytes::from_static(b"props")));
        message.set_text("hello").unwrap();
        assert_eq!(message.size(), 10);
    }

    #[test]
    fn size_of_content_includes_overhead() {
        let mut message = sent("hello", &WireFormat::default());
        assert_eq!(message.size(), 1024 + 9);
    }

    #[test]
    fn size_is_invalidated_by_body_changes() {
        let mut message = TextMessage::new();
        message.set_text("ab").unwrap();
        assert_eq!(message.size(), 4);
        message.set_text("abcd").unwrap();
        assert_eq!(message.size(), 8);
    }

    #[test]
    fn identifies_as_text_message() {
        let message = TextMessage::new();
        assert_eq!(message.data_structure_type().wire_id(), 28);
        assert_eq!(message.jmsx_mime_type(), "jms/text-message");
    }

    #[test]
    fn debug_never_shows_body_bytes() {
        let message = sent("top secret payload", &WireFormat::default());
        let rendered = format!("{message:?}");
        assert!(rendered.contains("content: Some(<22 bytes>)"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn debug_summary_decodes_and_abbreviates() {
        let text: String = ('a'..='z').cycle().take(100).collect();
        let mut message = sent(&text, &WireFormat::default());
        let rendered = message.debug_summary();
        let expected = format!("text: Some(\"{}...{}\")", &text[..45], &text[88..]);
        assert!(rendered.contains(&expected), "{rendered}");
        assert!(message.has_text());
    }

    #[test]
    fn debug_summary_survives_corrupt_body() {
        let content = Bytes::from_static(b"\x00\x00\x00\x09ab");
        let mut message = TextMessage::from_wire(Message::new(), content, false);
        let rendered = message.debug_summary();
        assert!(rendered.contains("content: Some(<6 bytes>)"));
        assert!(rendered.contains("text: None"));
    }
}
