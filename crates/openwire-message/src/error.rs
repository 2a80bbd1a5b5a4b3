use openwire_wire::WireError;

/// A body mutation was attempted after the message was handed off.
///
/// Raised by [`TextMessage::set_text`](crate::TextMessage::set_text) once
/// [`Message::on_send`](crate::Message::on_send) (or an explicit
/// `set_read_only_body(true)`) has frozen the body. The message is left
/// exactly as it was.
#[derive(Debug, thiserror::Error)]
#[error("message body is read-only")]
pub struct ReadOnlyBodyError;

/// The encoded body could not be turned back into text.
///
/// ```text
///   DecodeError
///   ├── Wire(WireError)     ← truncated/malformed string, bad inflate stream
///   └── DecompressionBomb   ← inflated body grew past the size limit
/// ```
///
/// Inflate failures arrive as `WireError::Io` because the decompressor
/// sits underneath the string reader.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("failed to decode text body: {0}")]
    Wire(#[from] WireError),

    #[error("inflated text body exceeds limit of {limit} bytes")]
    DecompressionBomb { limit: usize },
}

/// The text could not be encoded into a message body.
///
/// ```text
///   EncodeError
///   ├── Wire(WireError)      ← string too long for the length prefix
///   └── Io(std::io::Error)   ← deflate stream failed to finish
/// ```
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("failed to encode text body: {0}")]
    Wire(#[from] WireError),

    #[error("failed to finish body stream: {0}")]
    Io(#[from] std::io::Error),
}

/// Any failure surfaced by the message model.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error(transparent)]
    ReadOnlyBody(#[from] ReadOnlyBodyError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}
