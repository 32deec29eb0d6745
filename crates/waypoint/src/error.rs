//! Facade error types.

use thiserror::Error;
use waypoint_config::ConfigError;

/// Errors from [`init_logging`](crate::logging::init_logging).
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The level or filter directive could not be parsed.
    #[error("invalid log filter `{filter}`: {message}")]
    InvalidFilter {
        /// The rejected directive.
        filter: String,
        /// Parser message.
        message: String,
    },

    /// A global subscriber is already installed.
    #[error("failed to initialize logging: {0}")]
    Init(String),
}

/// Errors from [`Router::compile_into`](crate::Router::compile_into).
///
/// `E` is the registrar's own error type.
#[derive(Debug, Error)]
pub enum RegisterError<E: std::error::Error + 'static> {
    /// Loading the route configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The registrar rejected a route.
    #[error("registrar rejected route `{route}`")]
    Registrar {
        /// Name of the rejected route.
        route: String,
        /// Registrar error.
        #[source]
        source: E,
    },
}
