/// Errors raised by the OpenWire string codec.
///
/// Each variant carries enough context to locate the problem inside a
/// message body: the byte offset for malformed sequences, the expected
/// and actual counts for short reads.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// Input ended before the 4-byte length prefix could be read.
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: usize },

    /// The body ended before `expected` string bytes were read.
    #[error("truncated string: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// A lead or continuation byte did not follow modified UTF-8 rules.
    #[error("malformed modified UTF-8 at byte {offset}")]
    MalformedUtf8 { offset: usize },

    /// Decoded code units contain a lone surrogate.
    #[error("decoded string contains an unpaired UTF-16 surrogate")]
    UnpairedSurrogate,

    /// Encoded form does not fit the signed 32-bit length prefix.
    #[error("string too long for wire format: {len} bytes (limit {limit})")]
    StringTooLong { len: usize, limit: usize },

    /// I/O error from the underlying stream (including inflate/deflate).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
