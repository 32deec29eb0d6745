//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;
use waypoint_routing::RoutingError;

/// Errors that can occur while loading route configuration.
///
/// Every variant is fatal: [`RouteLoader::load`](crate::RouteLoader::load)
/// never returns a partially loaded collection.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The locator found no file for a resource name.
    #[error("routing resource not found: {resource}")]
    ResourceNotFound {
        /// The logical resource name.
        resource: String,
        /// Directory the lookup started from, if any.
        from: Option<PathBuf>,
    },

    /// Failed to read a configuration file.
    #[error("failed to read routing file: {path}")]
    ReadError {
        /// Path to the file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file content is not valid for its format.
    #[error("failed to parse routing file {path}: {message}")]
    Parse {
        /// Path to the file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// No parser exists for the file's format.
    #[error("unsupported routing file format `{format}` for {path}")]
    UnsupportedFormat {
        /// Path to the file.
        path: PathBuf,
        /// The extension or `type` value that was not recognized.
        format: String,
    },

    /// A route entry uses a key outside the recognized vocabulary.
    #[error(
        "routing loader does not support key `{key}` in route `{route}`; expected one of ({expected})"
    )]
    UnknownKey {
        /// The unrecognized key.
        key: String,
        /// The entry containing it.
        route: String,
        /// The full recognized vocabulary, comma separated.
        expected: String,
    },

    /// A route entry has neither `pattern` nor `resource`.
    #[error("you must define a pattern for the `{route}` route")]
    MissingPattern {
        /// The route name.
        route: String,
    },

    /// An import re-entered a resource that is still being loaded.
    #[error("circular reference detected for {path}")]
    CircularReference {
        /// Resolved path of the re-entered resource.
        path: PathBuf,
    },

    /// A configuration value has the wrong shape.
    #[error("invalid value for `{field}` in route `{route}`: {reason}")]
    InvalidValue {
        /// The route name.
        route: String,
        /// The key holding the value.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Loader options could not be parsed.
    #[error("invalid loader options: {0}")]
    InvalidOptions(#[from] toml::de::Error),

    /// A strict collection rule was violated.
    #[error(transparent)]
    Routing(#[from] RoutingError),
}

impl ConfigError {
    /// Create a new resource not found error.
    pub fn resource_not_found(resource: impl Into<String>, from: Option<PathBuf>) -> Self {
        Self::ResourceNotFound {
            resource: resource.into(),
            from,
        }
    }

    /// Create a new read error.
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Create a new parse error.
    pub fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create a new unsupported format error.
    pub fn unsupported_format(path: impl Into<PathBuf>, format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            path: path.into(),
            format: format.into(),
        }
    }

    /// Create a new unknown key error listing the whole vocabulary.
    pub fn unknown_key(key: impl Into<String>, route: impl Into<String>, vocabulary: &[&str]) -> Self {
        Self::UnknownKey {
            key: key.into(),
            route: route.into(),
            expected: vocabulary.join(", "),
        }
    }

    /// Create a new missing pattern error.
    pub fn missing_pattern(route: impl Into<String>) -> Self {
        Self::MissingPattern {
            route: route.into(),
        }
    }

    /// Create a new circular reference error.
    pub fn circular_reference(path: impl Into<PathBuf>) -> Self {
        Self::CircularReference { path: path.into() }
    }

    /// Create a new invalid value error.
    pub fn invalid_value(
        route: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            route: route.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }
}
