//! Tracing/logging initialization.
//!
//! Filtering follows `RUST_LOG`; the output format follows
//! `PETSHOP_LOG_FORMAT` (`json` or `text`).

use core::str::FromStr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "PETSHOP_LOG_FORMAT";

/// Filter directive used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_DIRECTIVE: &str = "info";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line, with timestamps.
    #[default]
    Json,
    /// Human-readable single-line output.
    Text,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown log format: {0:?} (expected \"json\" or \"text\")")]
pub struct UnknownLogFormat(String);

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "text" | "pretty" => Ok(LogFormat::Text),
            _ => Err(UnknownLogFormat(s.to_string())),
        }
    }
}

/// Resolved tracing settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    pub default_directive: String,
    pub format: LogFormat,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_directive: DEFAULT_DIRECTIVE.to_string(),
            format: LogFormat::default(),
        }
    }
}

impl TracingConfig {
    /// Read the format from `PETSHOP_LOG_FORMAT`; unset means the default.
    pub fn from_env() -> Result<Self, UnknownLogFormat> {
        Self::from_format_var(std::env::var(LOG_FORMAT_ENV).ok().as_deref())
    }

    fn from_format_var(raw: Option<&str>) -> Result<Self, UnknownLogFormat> {
        let format = match raw {
            Some(raw) => raw.parse()?,
            None => LogFormat::default(),
        };
        Ok(Self {
            format,
            ..Self::default()
        })
    }
}

/// Initialize tracing for the process from the environment.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    init_from_format_var(std::env::var(LOG_FORMAT_ENV).ok().as_deref());
}

/// Returns the config that was actually used.
fn init_from_format_var(raw: Option<&str>) -> TracingConfig {
    match TracingConfig::from_format_var(raw) {
        Ok(config) => {
            init_with(&config);
            config
        }
        Err(err) => {
            let config = TracingConfig::default();
            init_with(&config);
            ::tracing::warn!(error = %err, "ignoring {LOG_FORMAT_ENV}");
            config
        }
    }
}

/// Initialize tracing with explicit settings. `RUST_LOG` still wins over
/// `default_directive` when set.
pub fn init_with(config: &TracingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_directive));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let _ = match config.format {
        LogFormat::Json => builder
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .try_init(),
        LogFormat::Text => builder.try_init(),
    };
}
