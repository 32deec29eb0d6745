//! Routing file parsing.
//!
//! The loader treats parsing as a pure function from a file to an ordered
//! map of entries. [`Parse`] is that seam; [`ConfigParser`] is the default
//! implementation reading YAML, JSON and TOML from disk.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ConfigError;

/// Ordered entries of one routing file, keyed by entry name.
pub type RawDocument = Map<String, Value>;

/// Supported routing file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// YAML (`.yaml`, `.yml`)
    Yaml,
    /// JSON (`.json`)
    Json,
    /// TOML (`.toml`)
    Toml,
}

impl Format {
    /// Detects the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            other => Err(format!(
                "unsupported format `{other}`; expected one of (yaml, json, toml)"
            )),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
        })
    }
}

/// Turns a routing file into its raw entries.
pub trait Parse {
    /// Parses `path`; `format` overrides extension-based detection.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the file cannot be read, its format is
    /// unknown, or its content is malformed.
    fn parse(&self, path: &Path, format: Option<Format>) -> Result<RawDocument, ConfigError>;
}

/// Reads routing files from disk.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use waypoint_config::{ConfigParser, Parse};
///
/// # fn main() -> Result<(), waypoint_config::ConfigError> {
/// let entries = ConfigParser::new().parse(Path::new("config/routes.yaml"), None)?;
/// for name in entries.keys() {
///     println!("{name}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigParser;

impl ConfigParser {
    /// Creates a parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parses routing content already in memory.
    ///
    /// `path` is only used for error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed content and for a
    /// document whose root is not a map.
    ///
    /// # Example
    ///
    /// ```
    /// use std::path::Path;
    /// use waypoint_config::{ConfigParser, Format};
    ///
    /// let yaml = "home:\n  pattern: /\n";
    /// let entries = ConfigParser::parse_str(yaml, Format::Yaml, Path::new("inline")).unwrap();
    /// assert!(entries.contains_key("home"));
    /// ```
    pub fn parse_str(content: &str, format: Format, path: &Path) -> Result<RawDocument, ConfigError> {
        let value: Value = match format {
            Format::Yaml => serde_yaml::from_str(content).map_err(|e| ConfigError::parse(path, e))?,
            Format::Json => serde_json::from_str(content).map_err(|e| ConfigError::parse(path, e))?,
            Format::Toml => toml::from_str(content).map_err(|e| ConfigError::parse(path, e))?,
        };

        match value {
            Value::Null => Ok(RawDocument::new()),
            Value::Object(entries) => Ok(entries),
            _ => Err(ConfigError::parse(path, "document root must be a map of routes")),
        }
    }
}

impl Parse for ConfigParser {
    fn parse(&self, path: &Path, format: Option<Format>) -> Result<RawDocument, ConfigError> {
        let format = match format.or_else(|| Format::from_path(path)) {
            Some(format) => format,
            None => {
                let extension = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or_default();
                return Err(ConfigError::unsupported_format(path, extension));
            }
        };

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;
        if content.trim().is_empty() {
            return Ok(RawDocument::new());
        }
        Self::parse_str(&content, format, path)
    }
}
