/// Environment variable that switches body compression on.
pub const COMPRESSION_ENV: &str = "OPENWIRE_COMPRESSION";

/// Environment variable selecting the deflate level (0–9).
pub const COMPRESSION_LEVEL_ENV: &str = "OPENWIRE_COMPRESSION_LEVEL";

/// Default deflate level, the same trade-off zlib picks by default.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Highest level deflate accepts.
pub const MAX_COMPRESSION_LEVEL: u32 = 9;

/// Wire format settings consulted when a message body is marshalled.
///
/// The transport hands a `WireFormat` to
/// [`TextMessage::before_marshal`](crate::TextMessage::before_marshal);
/// nothing in the message model reads process-wide state, so both
/// compression settings can be exercised side by side.
///
/// ```text
/// ┌───────────────────┬──────────────────────────────────────────────┐
/// │ Field             │ Purpose                                      │
/// ├───────────────────┼──────────────────────────────────────────────┤
/// │ compression       │ Deflate text bodies when they are encoded    │
/// │ compression_level │ Deflate level 0–9 (only used when enabled)   │
/// └───────────────────┴──────────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WireFormat {
    pub compression: bool,
    pub compression_level: u32,
}

impl Default for WireFormat {
    /// Compression off, default deflate level.
    fn default() -> Self {
        Self {
            compression: false,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl WireFormat {
    #[must_use]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compression = enabled;
        self
    }

    /// Set the deflate level, clamped to `0..=9`.
    #[must_use]
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.min(MAX_COMPRESSION_LEVEL);
        self
    }

    pub fn compression_enabled(&self) -> bool {
        self.compression
    }

    /// Build settings from [`COMPRESSION_ENV`] and [`COMPRESSION_LEVEL_ENV`].
    ///
    /// Unset variables keep their defaults. Unparseable values are logged
    /// and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a caller-supplied lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut format = Self::default();

        if let Some(raw) = lookup(COMPRESSION_ENV) {
            match parse_flag(&raw) {
                Some(enabled) => format.compression = enabled,
                None => tracing::warn!(
                    var = COMPRESSION_ENV,
                    value = %raw,
                    "ignoring unrecognised compression flag"
                ),
            }
        }

        if let Some(raw) = lookup(COMPRESSION_LEVEL_ENV) {
            match raw.trim().parse::<u32>() {
                Ok(level) => format = format.with_compression_level(level),
                Err(error) => tracing::warn!(
                    var = COMPRESSION_LEVEL_ENV,
                    value = %raw,
                    %error,
                    "ignoring invalid compression level"
                ),
            }
        }

        format
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
