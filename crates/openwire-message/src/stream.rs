//! Byte streams layered under the string codec when a body is materialized.
//!
//! Compressed bodies use zlib-wrapped deflate, the framing
//! `java.util.zip.DeflaterOutputStream` / `InflaterInputStream` produce, so
//! bodies stay interchangeable with other OpenWire peers.
//!
//! ```text
//!   encode:  text ──► write_utf8 ──► BodyWriter ──(Plain | Deflate)──► Bytes
//!   decode:  Bytes ──► BodyReader ──(Plain | Inflate)──► read_utf8 ──► text
//! ```
//!
//! Both streams are plain owned values: they are released when they go out
//! of scope, whichever way the surrounding operation exits.

use std::io::{self, Read, Write};

use bytes::Bytes;
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::config::WireFormat;

/// Default ceiling on the bytes an inflated body may expand to.
pub const MAX_INFLATED_BODY_SIZE: usize = 256 * 1024 * 1024;

/// Sink for an encoded body, optionally deflating on the way in.
pub enum BodyWriter {
    Plain(Vec<u8>),
    Deflate(ZlibEncoder<Vec<u8>>),
}

impl BodyWriter {
    pub fn plain() -> Self {
        Self::Plain(Vec::new())
    }

    pub fn deflate(level: u32) -> Self {
        Self::Deflate(ZlibEncoder::new(Vec::new(), Compression::new(level)))
    }

    /// Pick the writer the wire format asks for.
    pub fn for_format(format: &WireFormat) -> Self {
        if format.compression_enabled() {
            Self::deflate(format.compression_level)
        } else {
            Self::plain()
        }
    }

    pub fn is_compressed(&self) -> bool {
        matches!(self, Self::Deflate(_))
    }

    /// Flush any pending compressed output and hand back the body bytes.
    ///
    /// # Errors
    ///
    /// Returns the deflate stream's I/O error if it cannot be finished.
    pub fn finish(self) -> io::Result<Bytes> {
        match self {
            Self::Plain(buf) => Ok(Bytes::from(buf)),
            Self::Deflate(encoder) => encoder.finish().map(Bytes::from),
        }
    }
}

impl Write for BodyWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Plain(out) => out.write(buf),
            Self::Deflate(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(out) => out.flush(),
            Self::Deflate(encoder) => encoder.flush(),
        }
    }
}

/// Source over an encoded body, inflating when the body was compressed.
///
/// An inflating reader fails with `InvalidData` once it has produced more
/// than `limit` bytes; [`limit_exceeded`](Self::limit_exceeded) tells that
/// failure apart from a corrupt stream.
pub enum BodyReader<'a> {
    Plain(&'a [u8]),
    Inflate {
        decoder: ZlibDecoder<&'a [u8]>,
        inflated: usize,
        limit: usize,
    },
}

impl<'a> BodyReader<'a> {
    /// Open `content`; `limit` only applies when it has to be inflated.
    pub fn open(content: &'a [u8], compressed: bool, limit: usize) -> Self {
        if compressed {
            Self::Inflate {
                decoder: ZlibDecoder::new(content),
                inflated: 0,
                limit,
            }
        } else {
            Self::Plain(content)
        }
    }

    pub fn limit_exceeded(&self) -> bool {
        matches!(self, Self::Inflate { inflated, limit, .. } if inflated > limit)
    }

    /// Release the reader after a successful read.
    ///
    /// Checks that the body ended where the string did; for inflated
    /// bodies this also runs the stream to its end so the checksum is
    /// verified. Anything unexpected is logged, never returned.
    pub fn close(self) {
        match self.trailing() {
            Ok(0) => {}
            Ok(extra) => tracing::warn!(extra, "unread bytes after text body"),
            Err(error) => tracing::warn!(%error, "failed to release body reader"),
        }
    }

    fn trailing(self) -> io::Result<usize> {
        match self {
            Self::Plain(rest) => Ok(rest.len()),
            Self::Inflate { mut decoder, .. } => {
                let mut probe = [0u8; 1];
                decoder.read(&mut probe)
            }
        }
    }
}

impl Read for BodyReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Plain(rest) => rest.read(buf),
            Self::Inflate {
                decoder,
                inflated,
                limit,
            } => {
                let n = decoder.read(buf)?;
                *inflated += n;
                if *inflated > *limit {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("inflated body exceeds {limit} bytes"),
                    ));
                }
                Ok(n)
            }
        }
    }
}
