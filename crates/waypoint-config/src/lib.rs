//! Declarative route configuration for Waypoint.
//!
//! This crate turns routing files into a [`RouteCollection`]:
//! - YAML, JSON and TOML routing files
//! - Nested imports resolved relative to the importing file
//! - Import prefixes applied to every imported route
//! - Strict validation (fails on unknown keys)
//! - Circular import detection
//!
//! # Example
//!
//! ```no_run
//! use waypoint_config::{LoaderOptions, RouteLoader};
//!
//! # fn main() -> Result<(), waypoint_config::ConfigError> {
//! let loader = RouteLoader::from_options(LoaderOptions::new().with_search_path("config"));
//! let routes = loader.load("routes.yaml")?;
//!
//! println!("loaded {} routes", routes.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Routing File Format
//!
//! ```yaml
//! home:
//!   pattern: /
//!   defaults: { _controller: home.index }
//!
//! blog_show:
//!   pattern: /blog/{slug}
//!   requirements:
//!     slug: "[a-z0-9-]+"
//!     _method: GET|HEAD
//!
//! admin:
//!   resource: admin/routes.toml
//!   prefix: /admin
//! ```
//!
//! An entry with a `resource` key is an import; every other entry must carry
//! a `pattern`. Accepted keys are listed in [`VOCABULARY`].
//!
//! [`RouteCollection`]: waypoint_routing::RouteCollection

#![warn(missing_docs)]

mod error;
mod loader;
mod locator;
mod options;
mod parser;
mod schema;

pub use error::ConfigError;
pub use loader::RouteLoader;
pub use locator::{FileLocator, Locate};
pub use options::LoaderOptions;
pub use parser::{ConfigParser, Format, Parse, RawDocument};
pub use schema::*;
