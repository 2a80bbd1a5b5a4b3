//! Implementation of `owtext inspect`.
//!
//! Loads a body file as a received message, takes the size estimate of
//! the encoded form, then asks for the debug summary (which decodes the
//! body when it can).
//!
//! # Output format
//!
//! ```text
//! Body:       27 bytes (plain)
//! Wire size:  1051
//! Characters: 23
//! Summary:    TextMessage { command_id: 0, ..., text: Some("...") }
//! ```
//!
//! With `--json` the same fields are printed as one JSON object. When the
//! body cannot be decoded `characters` is null and the summary shows the
//! encoded form.
use std::fs;

use anyhow::{Context, Result};
use bytes::Bytes;
use openwire_message::{Message, TextMessage};
use serde::Serialize;

use crate::InspectArgs;

#[derive(Debug, Serialize)]
struct Report {
    body_bytes: usize,
    compressed: bool,
    wire_size: usize,
    characters: Option<usize>,
    summary: String,
}

/// Run the `owtext inspect` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the report cannot be
/// serialized. An undecodable body is reported, not treated as an error.
pub fn run(args: &InspectArgs) -> Result<()> {
    let bytes =
        fs::read(&args.file).with_context(|| format!("cannot read {}", args.file.display()))?;

    let report = build_report(Bytes::from(bytes), args.compressed);
    tracing::debug!(?report, "built inspect report");

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("cannot serialize report")?
        );
    } else {
        println!(
            "Body:       {} bytes ({})",
            report.body_bytes,
            if report.compressed { "deflated" } else { "plain" }
        );
        println!("Wire size:  {}", report.wire_size);
        match report.characters {
            Some(n) => println!("Characters: {n}"),
            None => println!("Characters: (undecodable)"),
        }
        println!("Summary:    {}", report.summary);
    }

    Ok(())
}

fn build_report(content: Bytes, compressed: bool) -> Report {
    let body_bytes = content.len();
    let mut message = TextMessage::from_wire(Message::new(), content, compressed);
    let wire_size = message.size();
    let summary = message.debug_summary();
    let characters = message.body().text().map(|t| t.chars().count());

    Report {
        body_bytes,
        compressed,
        wire_size,
        characters,
        summary,
    }
}
