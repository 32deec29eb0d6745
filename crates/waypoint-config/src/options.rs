//! Loader options.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use waypoint_routing::{DuplicatePolicy, PrefixMode};

use crate::{ConfigError, FileLocator};

/// Options controlling how routing files are located and merged.
///
/// Every field has a default, so an empty table is valid. Unknown fields are
/// rejected so that typos in a host application's configuration surface
/// immediately.
///
/// # Example
///
/// ```
/// use waypoint_config::LoaderOptions;
/// use waypoint_routing::{DuplicatePolicy, PrefixMode};
///
/// let options = LoaderOptions::from_toml_str(r#"
///     search_paths = ["config/routes"]
///     prefix_mode = "normalize"
///     duplicate_policy = "reject"
/// "#).unwrap();
///
/// assert_eq!(options.prefix_mode, PrefixMode::Normalize);
/// assert_eq!(options.duplicate_policy, DuplicatePolicy::Reject);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoaderOptions {
    /// Directories searched, in order, for resources not found next to the
    /// importing file.
    #[serde(default)]
    pub search_paths: Vec<PathBuf>,

    /// Treatment of import prefixes ending in `/`.
    #[serde(default)]
    pub prefix_mode: PrefixMode,

    /// Treatment of repeated route names.
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
}

impl LoaderOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options rejecting duplicate names and normalizing prefixes.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            search_paths: Vec::new(),
            prefix_mode: PrefixMode::Normalize,
            duplicate_policy: DuplicatePolicy::Reject,
        }
    }

    /// Parses options from a TOML table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOptions`] for malformed TOML or unknown
    /// fields.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Appends a search directory.
    #[must_use]
    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_paths.push(path.into());
        self
    }

    /// Sets the prefix mode.
    #[must_use]
    pub fn with_prefix_mode(mut self, mode: PrefixMode) -> Self {
        self.prefix_mode = mode;
        self
    }

    /// Sets the duplicate policy.
    #[must_use]
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Builds a [`FileLocator`] over the search paths.
    #[must_use]
    pub fn locator(&self) -> FileLocator {
        FileLocator::with_paths(self.search_paths.iter().cloned())
    }
}
