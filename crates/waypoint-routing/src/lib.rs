//! Route model and path-template compiler for Waypoint.
//!
//! This crate holds the configuration-independent half of Waypoint: the
//! [`Route`] entity with its lazy pattern compiler, and the
//! [`RouteCollection`] used to compose routes from many sources.
//!
//! # Features
//!
//! - **Lazy compilation**: `{name}` placeholders are rewritten to
//!   `{name:regex}` on first access and cached until the next mutation
//! - **Reserved requirements**: `_method` and `_scheme` are always present
//!   and stored as ordered token lists
//! - **Prefix composition**: prefixes stack from the innermost collection
//!   outwards (`/a` then `/b` yields `/b/a/...`)
//! - **Engine seam**: [`RouteRegistrar`] receives one [`CompiledRoute`] per
//!   route; the matching engine itself lives elsewhere
//!
//! # Example
//!
//! ```rust
//! use waypoint_routing::{Route, RouteCollection};
//!
//! let mut blog = RouteCollection::new();
//! let mut show = Route::from_pattern("/{slug}");
//! show.set_requirement("slug", "^[a-z0-9-]+$")
//!     .set_requirement("_method", "GET")
//!     .set_default("_controller", "blog.show");
//! blog.add("blog_show", show);
//!
//! let mut root = RouteCollection::new();
//! root.add_collection_with_prefix(&mut blog, "/blog");
//!
//! let compiled = root.compile();
//! assert_eq!(compiled[0].pattern, "/blog/{slug:[a-z0-9-]+}");
//! assert_eq!(compiled[0].methods, ["GET"]);
//! assert_eq!(compiled[0].schemes, ["HTTP", "HTTPS"]);
//! ```

mod collection;
mod compiled;
mod error;
mod requirement;
mod route;

pub use collection::{CollectionId, DuplicatePolicy, PrefixMode, RouteCollection};
pub use compiled::{CompiledRoute, RouteRegistrar};
pub use error::RoutingError;
pub use requirement::{
    is_reserved, Requirement, DEFAULT_METHODS, DEFAULT_SCHEMES, METHOD_REQUIREMENT,
    SCHEME_REQUIREMENT,
};
pub use route::{Parameters, Requirements, Route};

/// Result type for strict collection operations.
pub type RoutingResult<T> = Result<T, RoutingError>;
