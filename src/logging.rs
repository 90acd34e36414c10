//! Logging bootstrap for the sample programs.
//!
//! Configured through environment variables:
//!
//! - `SIGSEARCH_DEBUG=1` - Enable debug logging
//! - `SIGSEARCH_LOG_LEVEL=trace|debug|info|warn|error|off` - Set log level (default `warn`)
//! - `SIGSEARCH_LOG_FORMAT=pretty|compact|json` - Set output format (default `compact`)
//! - `SIGSEARCH_LOG_COLOR=1|0` - Enable/disable colors
//! - `RUST_LOG` - Full `EnvFilter` directives, overriding the level
//!
//! Logs go to stderr so they never interleave with sample output on stdout.

use std::env;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Multi-line, human oriented.
    Pretty,
    /// Single line per event.
    Compact,
    /// Newline-delimited JSON.
    Json,
}

impl Format {
    /// Parse a format name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Some(Format::Pretty),
            "compact" => Some(Format::Compact),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Output format.
    pub format: Format,
    /// Whether colors are enabled.
    pub color: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: Format::Compact,
            color: false,
        }
    }
}

impl LogConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create config from any key-value source, such as a parsed `.env` file.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |key: &str| lookup(key).map(|v| v == "1" || v.eq_ignore_ascii_case("true"));

        let debug = flag("SIGSEARCH_DEBUG").unwrap_or(false);

        let level = lookup("SIGSEARCH_LOG_LEVEL")
            .map(|s| s.trim().to_lowercase())
            .filter(|s| matches!(s.as_str(), "trace" | "debug" | "info" | "warn" | "error" | "off"))
            .unwrap_or_else(|| if debug { "debug" } else { "warn" }.to_string());

        let format = lookup("SIGSEARCH_LOG_FORMAT")
            .and_then(|s| Format::parse(&s))
            .unwrap_or(Format::Compact);

        let color = flag("SIGSEARCH_LOG_COLOR")
            .unwrap_or_else(|| format != Format::Json && std::io::stderr().is_terminal());

        Self {
            level,
            format,
            color,
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }
}

/// Install the global subscriber from environment configuration.
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    init_with(&LogConfig::from_env());
}

/// Install the global subscriber from an explicit configuration.
pub fn init_with(config: &LogConfig) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.filter())
        .with_writer(std::io::stderr)
        .with_ansi(config.color);

    let result = match config.format {
        Format::Pretty => builder.pretty().try_init(),
        Format::Compact => builder.compact().try_init(),
        Format::Json => builder.json().try_init(),
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
