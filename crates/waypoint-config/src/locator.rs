//! Resource location.
//!
//! Maps a logical resource name (`routes.yaml`, `../admin/routes.yaml`) to
//! concrete files. The loader only ever uses the first candidate.

use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Resolves a logical resource name to candidate files.
pub trait Locate {
    /// Returns every existing file matching `name`, most specific first.
    ///
    /// Relative names are looked up in `from` (the directory of the importing
    /// file) before any configured search path.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a candidate exists but cannot be resolved.
    fn locate(&self, name: &str, from: Option<&Path>) -> Result<Vec<PathBuf>, ConfigError>;

    /// Returns the first candidate for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ResourceNotFound`] when there is no candidate.
    fn locate_first(&self, name: &str, from: Option<&Path>) -> Result<PathBuf, ConfigError> {
        self.locate(name, from)?
            .into_iter()
            .next()
            .ok_or_else(|| ConfigError::resource_not_found(name, from.map(Path::to_path_buf)))
    }
}

/// Filesystem locator over an ordered list of search directories.
///
/// Candidates are canonicalized so that one file reached through different
/// relative paths is recognized as the same resource.
///
/// # Example
///
/// ```no_run
/// use waypoint_config::{FileLocator, Locate};
///
/// # fn main() -> Result<(), waypoint_config::ConfigError> {
/// let locator = FileLocator::new()
///     .with_path("config")
///     .with_path("/etc/myapp");
///
/// let routes = locator.locate_first("routes.yaml", None)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct FileLocator {
    paths: Vec<PathBuf>,
}

impl FileLocator {
    /// Creates a locator with no search directories.
    ///
    /// Relative names are then resolved against the working directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a locator over the given search directories.
    #[must_use]
    pub fn with_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Appends a search directory.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    /// Returns the configured search directories.
    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl Locate for FileLocator {
    fn locate(&self, name: &str, from: Option<&Path>) -> Result<Vec<PathBuf>, ConfigError> {
        let requested = Path::new(name);
        let use_as_is = requested.is_absolute() || (from.is_none() && self.paths.is_empty());
        let candidates: Vec<PathBuf> = if use_as_is {
            vec![requested.to_path_buf()]
        } else {
            from.into_iter()
                .chain(self.paths.iter().map(PathBuf::as_path))
                .map(|dir| dir.join(requested))
                .collect()
        };

        let mut found: Vec<PathBuf> = Vec::new();
        for candidate in candidates.into_iter().filter(|c| c.is_file()) {
            let resolved = candidate
                .canonicalize()
                .map_err(|e| ConfigError::read_error(&candidate, e))?;
            if !found.contains(&resolved) {
                found.push(resolved);
            }
        }
        Ok(found)
    }
}
