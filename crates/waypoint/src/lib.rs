//! # Waypoint
//!
//! **Declarative route definitions for HTTP services**
//!
//! Waypoint reads route tables from configuration files and compiles them
//! into the form a URL-matching engine consumes:
//!
//! - **Route files** – YAML, JSON or TOML, one entry per route
//! - **Imports** – entries pulling in other files under a path prefix
//! - **Requirements** – per-placeholder regexes embedded in the compiled pattern
//! - **Method and scheme constraints** – reserved `_method` / `_scheme` lists
//! - **Strict validation** – unknown keys, missing patterns and import cycles
//!   are fatal
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use waypoint::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_logging(&LogConfig::development())?;
//!
//!     let mut router = Router::from_options(
//!         "routes.yaml",
//!         LoaderOptions::new().with_search_path("config"),
//!     );
//!
//!     let mut table: Vec<CompiledRoute> = Vec::new();
//!     router.compile_into(&mut table)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! routes.yaml ─┐
//! admin.toml ──┼→ RouteLoader → RouteCollection → CompiledRoute → RouteRegistrar
//! api.json ────┘   (imports,     (prefix, merge)   (pattern,       (matching
//!                  validation)                     methods, ...)    engine)
//! ```

#![doc(html_root_url = "https://docs.rs/waypoint/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;
mod router;

// Re-export the route model
pub use waypoint_routing as routing;

// Re-export the configuration loader
pub use waypoint_config as config;

pub use error::{LoggingError, RegisterError};
pub use router::Router;
pub use waypoint_config::{ConfigError, LoaderOptions, RouteLoader};
pub use waypoint_routing::{
    CompiledRoute, DuplicatePolicy, PrefixMode, Route, RouteCollection, RouteRegistrar,
};

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use waypoint::prelude::*;
///
/// let route = Route::from_pattern("users/{id}");
/// assert_eq!(route.pattern(), "/users/{id}");
/// ```
pub mod prelude {
    pub use crate::error::{LoggingError, RegisterError};
    pub use crate::logging::{init_logging, LogConfig};
    pub use crate::router::Router;

    // Re-export the route model
    pub use waypoint_routing::{
        CompiledRoute, DuplicatePolicy, PrefixMode, Requirement, Route, RouteCollection,
        RouteRegistrar,
    };

    // Re-export the loader
    pub use waypoint_config::{ConfigError, FileLocator, LoaderOptions, Locate, Parse, RouteLoader};
}
