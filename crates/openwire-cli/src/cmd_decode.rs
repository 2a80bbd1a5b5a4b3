//! Implementation of `owtext decode`.
//!
//! Treats the file as a body received over the wire and reads it back
//! through [`TextMessage::text`], writing the text to stdout or `-o`.
use std::fs;
use std::io::{self, Write as _};

use anyhow::{Context, Result};
use bytes::Bytes;
use openwire_message::{Message, TextMessage};

use crate::DecodeArgs;

/// Run the `owtext decode` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the body cannot be
/// decoded, or the output cannot be written.
pub fn run(args: &DecodeArgs) -> Result<()> {
    let bytes =
        fs::read(&args.file).with_context(|| format!("cannot read {}", args.file.display()))?;

    tracing::debug!(
        file = %args.file.display(),
        len = bytes.len(),
        compressed = args.compressed,
        "decoding text body"
    );

    let mut message = TextMessage::from_wire(Message::new(), Bytes::from(bytes), args.compressed);
    let text = message
        .text()
        .with_context(|| format!("failed to decode {}", args.file.display()))?
        .unwrap_or_default();

    if let Some(path) = &args.output {
        fs::write(path, text.as_bytes())
            .with_context(|| format!("cannot write {}", path.display()))?;
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(text.as_bytes())
            .context("cannot write to stdout")?;
        if !text.ends_with('\n') {
            handle.write_all(b"\n").context("cannot write to stdout")?;
        }
    }

    Ok(())
}
