//! Recursive routing loader.
//!
//! This module provides the [`RouteLoader`], which resolves a root routing
//! resource and every resource it imports into one [`RouteCollection`].

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use waypoint_routing::RouteCollection;

use crate::parser::{ConfigParser, Format, Parse};
use crate::schema::RouteEntry;
use crate::{ConfigError, FileLocator, LoaderOptions, Locate};

/// Resources currently being resolved by one top-level load.
///
/// Entries are pushed on entry to a resource and popped on exit, whether the
/// load succeeded or not, so a resource may be imported from disjoint
/// branches but never while it is its own ancestor.
#[derive(Debug, Default)]
struct LoadContext {
    stack: Vec<PathBuf>,
}

impl LoadContext {
    fn enter(&mut self, path: &Path) -> Result<(), ConfigError> {
        if self.stack.iter().any(|active| active == path) {
            return Err(ConfigError::circular_reference(path));
        }
        self.stack.push(path.to_path_buf());
        Ok(())
    }

    fn leave(&mut self) {
        self.stack.pop();
    }

    fn depth(&self) -> usize {
        self.stack.len()
    }
}

/// Loads routing files into a single [`RouteCollection`].
///
/// The loader is stateless between calls: cycle detection state lives in a
/// per-call context, so one loader can serve independent loads.
///
/// # Example
///
/// ```no_run
/// use waypoint_config::{LoaderOptions, RouteLoader};
///
/// # fn main() -> Result<(), waypoint_config::ConfigError> {
/// let loader = RouteLoader::from_options(
///     LoaderOptions::new().with_search_path("config"),
/// );
///
/// let routes = loader.load("routes.yaml")?;
/// for (name, route) in routes.iter() {
///     println!("{name}: {}", route.pattern());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RouteLoader<L = FileLocator, P = ConfigParser> {
    locator: L,
    parser: P,
    options: LoaderOptions,
}

impl Default for RouteLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteLoader {
    /// Creates a loader resolving names against the working directory.
    #[must_use]
    pub fn new() -> Self {
        Self::from_options(LoaderOptions::default())
    }

    /// Creates a filesystem loader from options.
    #[must_use]
    pub fn from_options(options: LoaderOptions) -> Self {
        Self {
            locator: options.locator(),
            parser: ConfigParser::new(),
            options,
        }
    }
}

impl<L: Locate, P: Parse> RouteLoader<L, P> {
    /// Creates a loader from custom collaborators.
    ///
    /// `options.search_paths` is ignored here; the locator decides where to
    /// look.
    #[must_use]
    pub fn with_parts(locator: L, parser: P, options: LoaderOptions) -> Self {
        Self {
            locator,
            parser,
            options,
        }
    }

    /// Returns the loader options.
    #[must_use]
    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Returns the locator.
    #[must_use]
    pub fn locator(&self) -> &L {
        &self.locator
    }

    /// Loads `resource` and everything it imports.
    ///
    /// Entries are validated and processed one at a time in document order,
    /// so the first failing entry decides the error even when a later entry
    /// is also malformed. Imports are resolved relative to the importing
    /// file's directory, loaded recursively and merged under their prefix;
    /// every other entry becomes a route.
    ///
    /// # Errors
    ///
    /// Any failure aborts the whole load:
    /// - [`ConfigError::ResourceNotFound`] if a resource cannot be located
    /// - [`ConfigError::UnknownKey`] / [`ConfigError::MissingPattern`] /
    ///   [`ConfigError::InvalidValue`] for malformed entries
    /// - [`ConfigError::CircularReference`] if a resource imports one of its
    ///   ancestors
    /// - [`ConfigError::Routing`] for duplicates under a strict policy
    /// - read and parse errors from the parser
    pub fn load(&self, resource: &str) -> Result<RouteCollection, ConfigError> {
        let path = self.locator.locate_first(resource, None)?;
        let mut context = LoadContext::default();
        let collection = self.load_path(&path, None, &mut context)?;

        info!(
            resource = %resource,
            path = %path.display(),
            routes = collection.len(),
            files = collection.resources().len(),
            "routing loaded"
        );
        Ok(collection)
    }

    fn load_path(
        &self,
        path: &Path,
        format: Option<Format>,
        context: &mut LoadContext,
    ) -> Result<RouteCollection, ConfigError> {
        context.enter(path)?;
        let result = self.load_entries(path, format, context);
        context.leave();
        result
    }

    fn load_entries(
        &self,
        path: &Path,
        format: Option<Format>,
        context: &mut LoadContext,
    ) -> Result<RouteCollection, ConfigError> {
        debug!(path = %path.display(), depth = context.depth(), "loading routing resource");

        let document = self.parser.parse(path, format)?;

        let mut collection = RouteCollection::new();
        collection.add_resource(path);
        let current_dir = path.parent();

        for (name, body) in &document {
            match RouteEntry::from_value(name, body)? {
                RouteEntry::Import(import) => {
                    let resolved = self.locator.locate_first(&import.resource, current_dir)?;
                    debug!(
                        entry = %import.name,
                        resource = %import.resource,
                        resolved = %resolved.display(),
                        prefix = %import.prefix,
                        "importing routing resource"
                    );

                    let mut child = self.load_path(&resolved, import.format, context)?;
                    collection.merge_with(
                        &mut child,
                        &import.prefix,
                        self.options.prefix_mode,
                        self.options.duplicate_policy,
                    )?;
                }
                RouteEntry::Route(definition) => {
                    let name = definition.name.clone();
                    let route = definition.into_route();
                    debug!(route = %name, pattern = %route.raw_pattern(), "route defined");
                    collection.try_add(name, route, self.options.duplicate_policy)?;
                }
            }
        }

        Ok(collection)
    }
}
