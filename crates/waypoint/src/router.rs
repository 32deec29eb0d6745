//! Lazily loaded route table.

use std::path::PathBuf;

use tracing::{debug, info};
use waypoint_config::{
    ConfigError, ConfigParser, FileLocator, LoaderOptions, Locate, Parse, RouteLoader,
};
use waypoint_routing::{RouteCollection, RouteRegistrar};

use crate::error::RegisterError;

/// Owns a loader and a root resource, and loads the routes on first use.
///
/// # Example
///
/// ```no_run
/// use waypoint::{CompiledRoute, LoaderOptions, Router};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut router = Router::from_options("routes.yaml", LoaderOptions::new().with_search_path("config"));
///
/// let mut table: Vec<CompiledRoute> = Vec::new();
/// let count = router.compile_into(&mut table)?;
/// println!("registered {count} routes");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Router<L = FileLocator, P = ConfigParser> {
    loader: RouteLoader<L, P>,
    resource: String,
    collection: Option<RouteCollection>,
}

impl Router {
    /// Creates a router resolving `resource` against the working directory.
    #[must_use]
    pub fn new(resource: impl Into<String>) -> Self {
        Self::with_loader(RouteLoader::new(), resource)
    }

    /// Creates a router with a filesystem loader built from `options`.
    #[must_use]
    pub fn from_options(resource: impl Into<String>, options: LoaderOptions) -> Self {
        Self::with_loader(RouteLoader::from_options(options), resource)
    }
}

impl<L: Locate, P: Parse> Router<L, P> {
    /// Creates a router around an existing loader.
    #[must_use]
    pub fn with_loader(loader: RouteLoader<L, P>, resource: impl Into<String>) -> Self {
        Self {
            loader,
            resource: resource.into(),
            collection: None,
        }
    }

    /// Returns the root resource name.
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Returns the loader.
    #[must_use]
    pub fn loader(&self) -> &RouteLoader<L, P> {
        &self.loader
    }

    /// Returns `true` once the routes have been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.collection.is_some()
    }

    /// Returns the route collection, loading it on first call.
    ///
    /// A failed load leaves the router unloaded; the next call retries.
    ///
    /// # Errors
    ///
    /// Returns any [`ConfigError`] from the loader.
    pub fn collection(&mut self) -> Result<&RouteCollection, ConfigError> {
        let collection = match self.collection.take() {
            Some(collection) => collection,
            None => self.loader.load(&self.resource)?,
        };
        Ok(self.collection.insert(collection))
    }

    /// Discards the loaded routes and loads them again.
    ///
    /// The previous routes are kept if the new load fails.
    ///
    /// # Errors
    ///
    /// Returns any [`ConfigError`] from the loader.
    pub fn reload(&mut self) -> Result<&RouteCollection, ConfigError> {
        debug!(resource = %self.resource, "reloading routes");
        let collection = self.loader.load(&self.resource)?;
        Ok(self.collection.insert(collection))
    }

    /// Files that contributed to the loaded routes, empty before the first
    /// load.
    #[must_use]
    pub fn resources(&self) -> &[PathBuf] {
        self.collection
            .as_ref()
            .map(RouteCollection::resources)
            .unwrap_or_default()
    }

    /// Registers every route with `registrar`, loading first if needed.
    ///
    /// Routes are registered in collection order; the first rejected route
    /// stops the pass. Returns the number of routes registered.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::Config`] if loading fails and
    /// [`RegisterError::Registrar`] naming the first rejected route.
    pub fn compile_into<R>(&mut self, registrar: &mut R) -> Result<usize, RegisterError<R::Error>>
    where
        R: RouteRegistrar,
        R::Error: std::error::Error + 'static,
    {
        let resource = self.resource.clone();
        let collection = self.collection()?;

        let mut count = 0;
        for route in collection.compile() {
            registrar
                .register(&route)
                .map_err(|source| RegisterError::Registrar {
                    route: route.name.clone(),
                    source,
                })?;
            count += 1;
        }

        info!(resource = %resource, routes = count, "routes registered");
        Ok(count)
    }
}
