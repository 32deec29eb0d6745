//! Structured logging setup.
//!
//! Waypoint logs through `tracing`: one `debug` event per resource, import
//! and route while loading, a `warn` for each overwritten route name and an
//! `info` summary per load and registration pass. This module installs a
//! `tracing-subscriber` for applications that do not bring their own.
//!
//! # Example
//!
//! ```rust,ignore
//! use waypoint::logging::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! ```

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::LoggingError;

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Filter directive (e.g., "info", "waypoint_config=debug").
    pub level: String,

    /// Whether to output JSON format.
    pub json_format: bool,

    /// Whether to include span events (new, close).
    pub span_events: bool,

    /// Whether to include file/line info.
    pub file_line_info: bool,

    /// Whether to include target (module path).
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LogConfig {
    /// Human-readable output with loader internals at `debug`.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
            json_format: false,
            span_events: true,
            file_line_info: true,
            include_target: true,
        }
    }

    /// JSON output at `info`.
    #[must_use]
    pub fn production() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            json_format: true,
            span_events: false,
            file_line_info: false,
            include_target: true,
        }
    }

    /// Sets the filter directive.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }
}

/// Creates an env filter from a directive string.
///
/// # Errors
///
/// Returns [`LoggingError::InvalidFilter`] if the directive is invalid.
pub fn create_env_filter(filter: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(filter).map_err(|e| LoggingError::InvalidFilter {
        filter: filter.to_string(),
        message: e.to_string(),
    })
}

/// Installs the global subscriber.
///
/// Does nothing when `config.enabled` is false.
///
/// # Errors
///
/// Returns [`LoggingError::InvalidFilter`] for a bad level and
/// [`LoggingError::Init`] if a global subscriber is already set.
pub fn init_logging(config: &LogConfig) -> Result<(), LoggingError> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.level)?;
    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_span_events(span_events)
        .with_file(config.file_line_info)
        .with_line_number(config.file_line_info)
        .with_target(config.include_target);

    // The two formatters are distinct layer types.
    let layer = if config.json_format {
        fmt_layer.json().with_filter(filter).boxed()
    } else {
        fmt_layer.pretty().with_filter(filter).boxed()
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))
}
