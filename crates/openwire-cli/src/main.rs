//! `owtext`: encode, decode and inspect OpenWire text message bodies.
//!
//! # Command overview
//!
//! ```text
//! owtext <COMMAND> [OPTIONS]
//!
//! Commands:
//!   encode     Encode text into a message body file
//!   decode     Decode a message body file back into text
//!   inspect    Print the debug summary and size estimates of a body file
//!   help       Print help information
//!
//! Global options:
//!   -v, --verbose    Log at debug level (overrides RUST_LOG)
//!   -h, --help       Print help
//!   -V, --version    Print version
//! ```
//!
//! # Exit codes
//!
//! | Code | Meaning                                      |
//! |------|----------------------------------------------|
//! | 0    | Success                                      |
//! | 1    | Error (I/O failure, undecodable body, etc.)  |
//!
//! Logs and error details go to stderr so stdout can be piped cleanly.
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

mod cmd_decode;
mod cmd_encode;
mod cmd_inspect;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// OpenWire text body tool.
#[derive(Parser)]
#[command(name = "owtext", version, about = "OpenWire text message body tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log at debug level regardless of `RUST_LOG`.
    #[arg(short, long, global = true)]
    verbose: bool,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Encode text into a message body file.
    Encode(EncodeArgs),
    /// Decode a message body file back into text.
    Decode(DecodeArgs),
    /// Print the debug summary and size estimates of a body file.
    Inspect(InspectArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Arguments for `owtext encode`.
///
/// The text comes from the positional argument or from `--input`. The
/// compression defaults come from `OPENWIRE_COMPRESSION` and
/// `OPENWIRE_COMPRESSION_LEVEL`; the flags below override them.
///
/// ```text
/// ┌──────────────┬───────────────────────────────────────────────┐
/// │ Flag         │ Effect                                        │
/// ├──────────────┼───────────────────────────────────────────────┤
/// │ --input FILE │ Read the text from FILE (UTF-8)               │
/// │ --compress   │ Deflate the body                              │
/// │ --level N    │ Deflate level 0–9                             │
/// └──────────────┴───────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct EncodeArgs {
    /// Text to encode.
    #[arg(conflicts_with = "input", required_unless_present = "input")]
    pub text: Option<String>,

    /// Read the text from this file instead.
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Output body file.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Deflate the body.
    #[arg(long)]
    pub compress: bool,

    /// Deflate level (0–9).
    #[arg(long)]
    pub level: Option<u32>,
}

/// Arguments for `owtext decode`.
#[derive(clap::Args)]
pub struct DecodeArgs {
    /// Body file to decode.
    pub file: PathBuf,

    /// The body was deflated when it was encoded.
    #[arg(long)]
    pub compressed: bool,

    /// Write the text to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `owtext inspect`.
#[derive(clap::Args)]
pub struct InspectArgs {
    /// Body file to inspect.
    pub file: PathBuf,

    /// The body was deflated when it was encoded.
    #[arg(long)]
    pub compressed: bool,

    /// Emit a JSON object instead of text.
    #[arg(long)]
    pub json: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Encode(args) => cmd_encode::run(&args),
        Commands::Decode(args) => cmd_decode::run(&args),
        Commands::Inspect(args) => cmd_inspect::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
