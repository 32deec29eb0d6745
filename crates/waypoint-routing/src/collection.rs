//! Named route collections.
//!
//! A [`RouteCollection`] is an insertion-ordered set of named routes. Whole
//! collections can be prefixed at once and merged into a parent, which is how
//! imported configuration files are folded into a single table.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::compiled::CompiledRoute;
use crate::error::RoutingError;
use crate::RoutingResult;
use crate::route::Route;

static NEXT_COLLECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a collection.
///
/// Used as the informational parent link after a merge; routes are moved
/// into the parent, so no pointer to the parent is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionId(u64);

impl CollectionId {
    fn next() -> Self {
        Self(NEXT_COLLECTION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// How [`RouteCollection::add_prefix_with`] treats a trailing slash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefixMode {
    /// A prefix ending in `/` is ignored entirely.
    #[default]
    Compatible,
    /// Trailing slashes are trimmed, so `/api/` applies as `/api`.
    Normalize,
}

/// What happens when a route name is added twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The last definition wins.
    #[default]
    Overwrite,
    /// Duplicates and malformed names are errors.
    Reject,
}

/// An insertion-ordered, name-keyed set of routes.
///
/// # Example
///
/// ```
/// use waypoint_routing::{Route, RouteCollection};
///
/// let mut child = RouteCollection::new();
/// child.add("user_list", Route::from_pattern("/users"));
///
/// let mut root = RouteCollection::new();
/// root.add_collection_with_prefix(&mut child, "/admin");
///
/// assert_eq!(root.get("user_list").unwrap().pattern(), "/admin/users");
/// assert_eq!(child.parent(), Some(root.id()));
/// ```
#[derive(Debug)]
pub struct RouteCollection {
    id: CollectionId,
    routes: IndexMap<String, Route>,
    /// Accumulated prefix applied to every route
    prefix: String,
    parent: Option<CollectionId>,
    /// Configuration files that contributed routes, in load order
    resources: Vec<PathBuf>,
}

impl Default for RouteCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: CollectionId::next(),
            routes: IndexMap::new(),
            prefix: String::new(),
            parent: None,
            resources: Vec::new(),
        }
    }

    /// Returns this collection's identity.
    #[must_use]
    pub fn id(&self) -> CollectionId {
        self.id
    }

    /// Returns the collection this one was merged into, if any.
    #[must_use]
    pub fn parent(&self) -> Option<CollectionId> {
        self.parent
    }

    /// Returns the accumulated prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Inserts a route, replacing any route with the same name.
    ///
    /// The name itself is not validated; see [`RouteCollection::try_add`].
    pub fn add(&mut self, name: impl Into<String>, route: Route) {
        let name = name.into();
        if let Some(previous) = self.routes.insert(name.clone(), route) {
            warn!(
                route = %name,
                previous_pattern = %previous.raw_pattern(),
                "route definition overwritten"
            );
        }
    }

    /// Inserts a route under the given duplicate policy.
    ///
    /// # Errors
    ///
    /// With [`DuplicatePolicy::Reject`], returns
    /// [`RoutingError::InvalidRouteName`] for an empty or malformed name and
    /// [`RoutingError::DuplicateRoute`] when the name is already taken.
    pub fn try_add(
        &mut self,
        name: impl Into<String>,
        route: Route,
        policy: DuplicatePolicy,
    ) -> RoutingResult<()> {
        let name = name.into();
        if policy == DuplicatePolicy::Reject {
            validate_name(&name)?;
            if self.routes.contains_key(&name) {
                return Err(RoutingError::duplicate_route(name));
            }
        }
        self.add(name, route);
        Ok(())
    }

    /// Returns a route by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Route> {
        self.routes.get(name)
    }

    /// Returns a mutable route by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Route> {
        self.routes.get_mut(name)
    }

    /// Removes a route, keeping the order of the others.
    pub fn remove(&mut self, name: &str) -> Option<Route> {
        self.routes.shift_remove(name)
    }

    /// Returns true if a route with the name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    /// Returns the number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if the collection holds no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterates over `(name, route)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Route)> {
        self.routes.iter().map(|(name, route)| (name.as_str(), route))
    }

    /// Iterates over route names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    /// Returns the configuration files that contributed routes.
    #[must_use]
    pub fn resources(&self) -> &[PathBuf] {
        &self.resources
    }

    /// Records a configuration file as a source of this collection.
    pub fn add_resource(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        if !self.resources.iter().any(|known| known == path) {
            self.resources.push(path.to_path_buf());
        }
    }

    /// Prefixes every route with `prefix`.
    ///
    /// A prefix that already ends with `/` (or is empty) leaves the
    /// collection untouched. Otherwise a missing leading `/` is added, the
    /// prefix is prepended to the accumulated [`prefix`](Self::prefix), and
    /// each route's compiled pattern is rewritten as `prefix + pattern`.
    ///
    /// ```
    /// use waypoint_routing::{Route, RouteCollection};
    ///
    /// let mut collection = RouteCollection::new();
    /// collection.add("x", Route::from_pattern("/x"));
    ///
    /// collection.add_prefix("/api");
    /// collection.add_prefix("v1");
    /// collection.add_prefix("/ignored/");
    ///
    /// assert_eq!(collection.get("x").unwrap().pattern(), "/v1/api/x");
    /// assert_eq!(collection.prefix(), "/v1/api");
    /// ```
    pub fn add_prefix(&mut self, prefix: &str) {
        self.add_prefix_with(prefix, PrefixMode::Compatible);
    }

    /// Prefixes every route, treating a trailing slash according to `mode`.
    pub fn add_prefix_with(&mut self, prefix: &str, mode: PrefixMode) {
        let prefix = match mode {
            PrefixMode::Compatible => prefix,
            PrefixMode::Normalize => prefix.trim_end_matches('/'),
        };
        if prefix.is_empty() || prefix.ends_with('/') {
            return;
        }

        let prefix = if prefix.starts_with('/') {
            prefix.to_string()
        } else {
            format!("/{prefix}")
        };
        self.prefix = format!("{prefix}{}", self.prefix);

        for route in self.routes.values_mut() {
            let prefixed = format!("{prefix}{}", route.pattern());
            route.set_pattern(&prefixed);
        }
    }

    /// Moves every route of `child` into this collection under `prefix`.
    ///
    /// The child records this collection as its parent and is left empty.
    /// Routes whose names already exist here are overwritten.
    pub fn add_collection_with_prefix(&mut self, child: &mut RouteCollection, prefix: &str) {
        self.absorb(child, prefix, PrefixMode::Compatible);
    }

    /// Merges `child` under explicit prefix and duplicate policies.
    ///
    /// # Errors
    ///
    /// With [`DuplicatePolicy::Reject`], returns
    /// [`RoutingError::DuplicateRoute`] if any child route name is already
    /// present. Nothing is moved in that case.
    pub fn merge_with(
        &mut self,
        child: &mut RouteCollection,
        prefix: &str,
        mode: PrefixMode,
        policy: DuplicatePolicy,
    ) -> RoutingResult<()> {
        if policy == DuplicatePolicy::Reject {
            if let Some(name) = child.names().find(|name| self.contains(name)) {
                return Err(RoutingError::duplicate_route(name));
            }
        }
        self.absorb(child, prefix, mode);
        Ok(())
    }

    /// Captures the engine tuple for every route, in insertion order.
    #[must_use]
    pub fn compile(&self) -> Vec<CompiledRoute> {
        self.iter()
            .map(|(name, route)| CompiledRoute::from_route(name, route))
            .collect()
    }

    fn absorb(&mut self, child: &mut RouteCollection, prefix: &str, mode: PrefixMode) {
        child.parent = Some(self.id);
        child.add_prefix_with(prefix, mode);

        for (name, route) in child.routes.drain(..) {
            self.add(name, route);
        }
        for resource in std::mem::take(&mut child.resources) {
            self.add_resource(resource);
        }
    }
}

fn validate_name(name: &str) -> RoutingResult<()> {
    if name.is_empty() {
        return Err(RoutingError::invalid_route_name(name, "name is empty"));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | ':')))
    {
        return Err(RoutingError::invalid_route_name(
            name,
            format!("unsupported character {c:?}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(routes: &[(&str, &str)]) -> RouteCollection {
        let mut collection = RouteCollection::new();
        for (name, pattern) in routes {
            collection.add(*name, Route::from_pattern(pattern));
        }
        collection
    }

    #[test]
    fn test_new_collection_is_empty() {
        let collection = RouteCollection::new();
        assert!(collection.is_empty());
        assert_eq!(collection.prefix(), "");
        assert_eq!(collection.parent(), None);
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(RouteCollection::new().id(), RouteCollection::new().id());
    }

    #[test]
    fn test_add_overwrites() {
        let mut collection = collection(&[("a", "/one")]);
        collection.add("a", Route::from_pattern("/two"));
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get("a").unwrap().pattern(), "/two");
    }

    #[test]
    fn test_insertion_order_kept() {
        let collection = collection(&[("z", "/z"), ("a", "/a"), ("m", "/m")]);
        let names: Vec<_> = collection.names().collect();
        assert_eq!(names, ["z", "a", "m"]);
    }

    #[test]
    fn test_try_add_reject_duplicate() {
        let mut collection = collection(&[("a", "/a")]);
        let err = collection
            .try_add("a", Route::from_pattern("/b"), DuplicatePolicy::Reject)
            .unwrap_err();
        assert_eq!(err, RoutingError::duplicate_route("a"));
        assert_eq!(collection.get("a").unwrap().pattern(), "/a");
    }

    #[test]
    fn test_try_add_reject_invalid_name() {
        let mut collection = RouteCollection::new();
        let err = collection
            .try_add("bad name", Route::from_pattern("/"), DuplicatePolicy::Reject)
            .unwrap_err();
        assert!(matches!(err, RoutingError::InvalidRouteName { .. }));
        assert!(collection
            .try_add("", Route::from_pattern("/"), DuplicatePolicy::Reject)
            .is_err());
        assert!(collection
            .try_add("blog.post_show", Route::from_pattern("/"), DuplicatePolicy::Reject)
            .is_ok());
    }

    #[test]
    fn test_try_add_overwrite_accepts_anything() {
        let mut collection = collection(&[("a", "/a")]);
        collection
            .try_add("a", Route::from_pattern("/b"), DuplicatePolicy::Overwrite)
            .unwrap();
        collection
            .try_add("with space", Route::from_pattern("/c"), DuplicatePolicy::Overwrite)
            .unwrap();
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_add_prefix() {
        let mut collection = collection(&[("x", "/x")]);
        collection.add_prefix("/api");
        assert_eq!(collection.get("x").unwrap().pattern(), "/api/x");

        collection.add_prefix("/v1");
        assert_eq!(collection.get("x").unwrap().pattern(), "/v1/api/x");
        assert_eq!(collection.prefix(), "/v1/api");
    }

    #[test]
    fn test_add_prefix_composes_like_single_prefix() {
        let mut layered = collection(&[("x", "/x"), ("y", "/y/{id}")]);
        layered.add_prefix("/a");
        layered.add_prefix("/b");

        let mut once = collection(&[("x", "/x"), ("y", "/y/{id}")]);
        once.add_prefix("/b/a");

        for (name, route) in layered.iter() {
            assert_eq!(route.pattern(), once.get(name).unwrap().pattern());
        }
    }

    #[test]
    fn test_add_prefix_trailing_slash_is_noop() {
        let mut collection = collection(&[("x", "/x")]);
        collection.add_prefix("/api/");
        assert_eq!(collection.get("x").unwrap().pattern(), "/x");
        assert_eq!(collection.prefix(), "");
    }

    #[test]
    fn test_add_prefix_empty_is_noop() {
        let mut collection = collection(&[("x", "/x")]);
        collection.add_prefix("");
        assert_eq!(collection.get("x").unwrap().pattern(), "/x");
    }

    #[test]
    fn test_add_prefix_adds_leading_slash() {
        let mut collection = collection(&[("x", "/x")]);
        collection.add_prefix("api");
        assert_eq!(collection.get("x").unwrap().pattern(), "/api/x");
    }

    #[test]
    fn test_add_prefix_normalize_mode() {
        let mut collection = collection(&[("x", "/x")]);
        collection.add_prefix_with("/api/", PrefixMode::Normalize);
        assert_eq!(collection.get("x").unwrap().pattern(), "/api/x");

        collection.add_prefix_with("/", PrefixMode::Normalize);
        assert_eq!(collection.get("x").unwrap().pattern(), "/api/x");
    }

    #[test]
    fn test_add_prefix_builds_on_compiled_pattern() {
        let mut collection = RouteCollection::new();
        let mut route = Route::from_pattern("/users/{id}");
        route.set_requirement("id", "[0-9]+");
        collection.add("user", route);

        collection.add_prefix("/api");
        let route = collection.get("user").unwrap();
        assert_eq!(route.raw_pattern(), "/api/users/{id:[0-9]+}");
        assert_eq!(route.pattern(), "/api/users/{id:[0-9]+}");
    }

    #[test]
    fn test_add_collection_with_prefix() {
        let mut parent = collection(&[("home", "/")]);
        let mut child = collection(&[("users", "/users"), ("user", "/users/{id}")]);

        parent.add_collection_with_prefix(&mut child, "/admin");

        assert_eq!(parent.len(), 3);
        assert_eq!(parent.get("users").unwrap().pattern(), "/admin/users");
        assert_eq!(parent.get("user").unwrap().pattern(), "/admin/users/{id}");
        assert_eq!(parent.get("home").unwrap().pattern(), "/");
        assert_eq!(child.parent(), Some(parent.id()));
        assert!(child.is_empty());
        assert_eq!(child.prefix(), "/admin");
        assert_eq!(parent.prefix(), "");
    }

    #[test]
    fn test_merge_overwrites_on_collision() {
        let mut parent = collection(&[("shared", "/parent")]);
        let mut child = collection(&[("shared", "/child")]);
        parent.add_collection_with_prefix(&mut child, "");
        assert_eq!(parent.get("shared").unwrap().pattern(), "/child");
    }

    #[test]
    fn test_merge_with_reject_leaves_both_untouched() {
        let mut parent = collection(&[("shared", "/parent")]);
        let mut child = collection(&[("other", "/o"), ("shared", "/child")]);
        let err = parent
            .merge_with(&mut child, "/x", PrefixMode::Compatible, DuplicatePolicy::Reject)
            .unwrap_err();
        assert_eq!(err, RoutingError::duplicate_route("shared"));
        assert_eq!(parent.len(), 1);
        assert_eq!(child.len(), 2);
        assert_eq!(child.get("other").unwrap().pattern(), "/o");
    }

    #[test]
    fn test_merge_moves_resources() {
        let mut parent = RouteCollection::new();
        parent.add_resource("/etc/routes.yaml");
        let mut child = RouteCollection::new();
        child.add_resource("/etc/blog.yaml");
        child.add_resource("/etc/routes.yaml");

        parent.add_collection_with_prefix(&mut child, "/blog");
        assert_eq!(
            parent.resources(),
            [PathBuf::from("/etc/routes.yaml"), PathBuf::from("/etc/blog.yaml")]
        );
        assert!(child.resources().is_empty());
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut collection = collection(&[("a", "/a"), ("b", "/b"), ("c", "/c")]);
        assert!(collection.remove("b").is_some());
        let names: Vec<_> = collection.names().collect();
        assert_eq!(names, ["a", "c"]);
    }

    #[test]
    fn test_compile_in_insertion_order() {
        let collection = collection(&[("a", "/a/{id}"), ("b", "/b")]);
        let compiled = collection.compile();
        assert_eq!(compiled.len(), 2);
        assert_eq!(compiled[0].name, "a");
        assert_eq!(compiled[0].pattern, "/a/{id}");
        assert_eq!(compiled[1], CompiledRoute::from_route("b", collection.get("b").unwrap()));
    }

    #[test]
    fn test_strict_operations_return_routing_result() {
        let mut collection = collection(&[("a", "/a")]);
        let added: RoutingResult<()> =
            collection.try_add("b", Route::from_pattern("/b"), DuplicatePolicy::Reject);
        assert!(added.is_ok());

        let mut child = collection_with("a");
        let merged: RoutingResult<()> = collection.merge_with(
            &mut child,
            "/x",
            PrefixMode::Compatible,
            DuplicatePolicy::Reject,
        );
        assert_eq!(merged, Err(RoutingError::duplicate_route("a")));
        assert_eq!(child.len(), 1);
    }

    fn collection_with(name: &str) -> RouteCollection {
        let mut collection = RouteCollection::new();
        collection.add(name, Route::from_pattern("/dup"));
        collection
    }
}
