//! Engine-facing output of the compiler.
//!
//! The matching engine is an external collaborator. This module defines the
//! tuple handed to it per route and the [`RouteRegistrar`] seam through which
//! an engine receives those tuples.

use std::convert::Infallible;

use serde::Serialize;

use crate::route::{Parameters, Route};

/// A route in the form consumed by the matching engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledRoute {
    /// Route name, unique within its collection
    pub name: String,
    /// Compiled path pattern with embedded requirement fragments
    pub pattern: String,
    /// Allowed HTTP methods, in declaration order
    pub methods: Vec<String>,
    /// Allowed URL schemes, in declaration order
    pub schemes: Vec<String>,
    /// Default values (including static metadata such as the handler id)
    pub defaults: Parameters,
    /// Opaque options
    pub options: Parameters,
}

impl CompiledRoute {
    /// Compiles `route` and captures the engine tuple.
    #[must_use]
    pub fn from_route(name: impl Into<String>, route: &Route) -> Self {
        Self {
            name: name.into(),
            pattern: route.pattern().to_string(),
            methods: route.methods().to_vec(),
            schemes: route.schemes().to_vec(),
            defaults: route.defaults().clone(),
            options: route.options().clone(),
        }
    }
}

/// Receives compiled routes, typically a URL-matching engine.
///
/// # Example
///
/// ```
/// use waypoint_routing::{CompiledRoute, Route, RouteCollection, RouteRegistrar};
///
/// struct Names(Vec<String>);
///
/// impl RouteRegistrar for Names {
///     type Error = std::convert::Infallible;
///
///     fn register(&mut self, route: &CompiledRoute) -> Result<(), Self::Error> {
///         self.0.push(route.name.clone());
///         Ok(())
///     }
/// }
///
/// let mut collection = RouteCollection::new();
/// collection.add("home", Route::from_pattern("/"));
///
/// let mut names = Names(Vec::new());
/// for route in collection.compile() {
///     names.register(&route).unwrap();
/// }
/// assert_eq!(names.0, ["home"]);
/// ```
pub trait RouteRegistrar {
    /// Error reported by the engine when it rejects a route.
    type Error;

    /// Registers one compiled route.
    fn register(&mut self, route: &CompiledRoute) -> Result<(), Self::Error>;
}

impl RouteRegistrar for Vec<CompiledRoute> {
    type Error = Infallible;

    fn register(&mut self, route: &CompiledRoute) -> Result<(), Self::Error> {
        self.push(route.clone());
        Ok(())
    }
}
