use std::io::{self, Read, Write};

use crate::error::WireError;

/// Length prefix written for a null string.
///
/// Readers treat every negative prefix as null.
pub const NULL_LENGTH: i32 = -1;

/// Size of the big-endian `i32` length prefix.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Largest encoded string the signed length prefix can describe.
pub const MAX_STRING_BYTES: usize = 0x7FFF_FFFF;

/// Upper bound on the buffer reserved up front when reading a string.
///
/// The length prefix is untrusted; beyond this the buffer grows only as
/// bytes actually arrive from the stream.
const INITIAL_CAPACITY_LIMIT: usize = 64 * 1024;

// Strings travel as a length-prefixed "modified UTF-8" byte run, the form
// Java's DataOutput family produces:
//
// ┌──────────────────┬────────┬──────────────────────────────┐
// │ UTF-16 unit      │ Bytes  │ Layout                       │
// ├──────────────────┼────────┼──────────────────────────────┤
// │ 0x0001 ..= 0x007F│ 1      │ 0xxxxxxx                     │
// │ 0x0000           │ 2      │ 11000000 10000000 (C0 80)    │
// │ 0x0080 ..= 0x07FF│ 2      │ 110xxxxx 10xxxxxx            │
// │ everything else  │ 3      │ 1110xxxx 10xxxxxx 10xxxxxx   │
// └──────────────────┴────────┴──────────────────────────────┘
//
// Supplementary characters are written as two 3-byte surrogates, never as
// a 4-byte UTF-8 sequence.

/// Number of bytes `text` occupies in modified UTF-8, excluding the prefix.
///
/// ```rust
/// use openwire_wire::utf8::modified_utf8_len;
///
/// assert_eq!(modified_utf8_len("hello"), 5);
/// assert_eq!(modified_utf8_len("\0"), 2);
/// assert_eq!(modified_utf8_len("😀"), 6);
/// ```
pub fn modified_utf8_len(text: &str) -> usize {
    text.encode_utf16().map(unit_len).sum()
}

fn unit_len(unit: u16) -> usize {
    match unit {
        0x0001..=0x007F => 1,
        0x0000 | 0x0080..=0x07FF => 2,
        _ => 3,
    }
}

fn push_unit(buf: &mut Vec<u8>, unit: u16) {
    match unit {
        0x0001..=0x007F => buf.push(unit as u8),
        0x0000 | 0x0080..=0x07FF => {
            buf.push(0xC0 | ((unit >> 6) & 0x1F) as u8);
            buf.push(0x80 | (unit & 0x3F) as u8);
        }
        _ => {
            buf.push(0xE0 | ((unit >> 12) & 0x0F) as u8);
            buf.push(0x80 | ((unit >> 6) & 0x3F) as u8);
            buf.push(0x80 | (unit & 0x3F) as u8);
        }
    }
}

/// Write `text` as a length-prefixed modified UTF-8 string.
///
/// `None` is written as the null marker (`-1`) with no body.
///
/// # Errors
///
/// - [`WireError::StringTooLong`] if the encoded form exceeds
///   [`MAX_STRING_BYTES`].
/// - [`WireError::Io`] if the underlying writer fails.
pub fn write_utf8<W: Write>(out: &mut W, text: Option<&str>) -> Result<(), WireError> {
    let Some(text) = text else {
        out.write_all(&NULL_LENGTH.to_be_bytes())?;
        return Ok(());
    };

    let len = modified_utf8_len(text);
    let prefix = i32::try_from(len).map_err(|_| WireError::StringTooLong {
        len,
        limit: MAX_STRING_BYTES,
    })?;

    let mut buf = Vec::with_capacity(LENGTH_PREFIX_SIZE + len);
    buf.extend_from_slice(&prefix.to_be_bytes());
    for unit in text.encode_utf16() {
        push_unit(&mut buf, unit);
    }
    out.write_all(&buf)?;
    Ok(())
}

/// Read a length-prefixed modified UTF-8 string.
///
/// Returns `Ok(None)` when the prefix is negative.
///
/// # Errors
///
/// - [`WireError::UnexpectedEof`] if the stream ends inside the prefix.
/// - [`WireError::Truncated`] if fewer bytes than announced are available.
/// - [`WireError::MalformedUtf8`] / [`WireError::UnpairedSurrogate`] for
///   invalid content.
/// - [`WireError::Io`] for reader failures (e.g. a corrupt deflate stream).
pub fn read_utf8<R: Read>(input: &mut R) -> Result<Option<String>, WireError> {
    let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
    let mut filled = 0;
    while filled < LENGTH_PREFIX_SIZE {
        match input.read(&mut prefix[filled..]) {
            Ok(0) => return Err(WireError::UnexpectedEof { offset: filled }),
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }

    let Ok(expected) = usize::try_from(i32::from_be_bytes(prefix)) else {
        return Ok(None);
    };

    let mut bytes = Vec::with_capacity(expected.min(INITIAL_CAPACITY_LIMIT));
    input.by_ref().take(expected as u64).read_to_end(&mut bytes)?;
    if bytes.len() < expected {
        return Err(WireError::Truncated {
            expected,
            actual: bytes.len(),
        });
    }

    decode_modified_utf8(bytes).map(Some)
}

/// Decode a modified UTF-8 byte run (no length prefix).
///
/// Fails with the offset of the first bad lead or continuation byte, or
/// with `UnpairedSurrogate` if the units are not valid UTF-16.
fn decode_modified_utf8(bytes: Vec<u8>) -> Result<String, WireError> {
    // ASCII (including a raw 0x00) decodes to the same bytes.
    if bytes.is_ascii() {
        return String::from_utf8(bytes).map_err(|e| WireError::MalformedUtf8 {
            offset: e.utf8_error().valid_up_to(),
        });
    }

    let mut units = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let lead = bytes[i];
        match lead >> 4 {
            0x0..=0x7 => {
                units.push(u16::from(lead));
                i += 1;
            }
            0xC | 0xD => {
                let b1 = continuation(&bytes, i + 1)?;
                units.push((u16::from(lead & 0x1F) << 6) | u16::from(b1 & 0x3F));
                i += 2;
            }
            0xE => {
                let b1 = continuation(&bytes, i + 1)?;
                let b2 = continuation(&bytes, i + 2)?;
                units.push(
                    (u16::from(lead & 0x0F) << 12)
                        | (u16::from(b1 & 0x3F) << 6)
                        | u16::from(b2 & 0x3F),
                );
                i += 3;
            }
            _ => return Err(WireError::MalformedUtf8 { offset: i }),
        }
    }

    String::from_utf16(&units).map_err(|_| WireError::UnpairedSurrogate)
}

fn continuation(bytes: &[u8], at: usize) -> Result<u8, WireError> {
    match bytes.get(at) {
        Some(&b) if b & 0xC0 == 0x80 => Ok(b),
        _ => Err(WireError::MalformedUtf8 { offset: at }),
    }
}
