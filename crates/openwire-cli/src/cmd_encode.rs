//! Implementation of `owtext encode`.
//!
//! Puts the text into a fresh [`TextMessage`], runs the pre-marshal hook
//! with the resolved [`WireFormat`], and writes the resulting body bytes.
//!
//! ```text
//!   text ──set_text──► TextMessage ──before_marshal(format)──► body bytes ──► file
//! ```
use std::fs;

use anyhow::{Context, Result, anyhow};
use openwire_message::{TextMessage, WireFormat};

use crate::EncodeArgs;

/// Run the `owtext encode` command.
///
/// # Errors
///
/// Returns an error if the input cannot be read, the text cannot be
/// encoded, or the output file cannot be written.
pub fn run(args: &EncodeArgs) -> Result<()> {
    let text = match (&args.text, &args.input) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?,
        (None, None) => return Err(anyhow!("no text given: pass TEXT or --input FILE")),
    };

    let format = resolve_format(args, WireFormat::from_env());

    tracing::debug!(
        chars = text.chars().count(),
        compression = format.compression,
        level = format.compression_level,
        "encoding text body"
    );

    let mut message = TextMessage::new();
    message.set_text(text)?;
    message
        .before_marshal(&format)
        .context("failed to encode text body")?;

    let content = message
        .content()
        .ok_or_else(|| anyhow!("encoding produced no body"))?;
    fs::write(&args.output, content)
        .with_context(|| format!("cannot write {}", args.output.display()))?;

    println!(
        "Wrote {} bytes to {}{}",
        content.len(),
        args.output.display(),
        if message.is_compressed() { " (deflated)" } else { "" }
    );
    Ok(())
}

/// Apply command-line overrides on top of the environment settings.
fn resolve_format(args: &EncodeArgs, base: WireFormat) -> WireFormat {
    let mut format = base;
    if args.compress {
        format = format.with_compression(true);
    }
    if let Some(level) = args.level {
        format = format.with_compression_level(level);
    }
    if format != base {
        tracing::debug!(?base, ?format, "command-line flags override wire format");
    }
    format
}
