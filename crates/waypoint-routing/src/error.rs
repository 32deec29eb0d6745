//! Routing error types.

use thiserror::Error;

/// Errors raised by strict collection operations.
///
/// The permissive operations ([`RouteCollection::add`] and
/// [`RouteCollection::add_collection_with_prefix`]) never fail; these errors
/// only surface when a [`DuplicatePolicy::Reject`] policy is in effect.
///
/// [`RouteCollection::add`]: crate::RouteCollection::add
/// [`RouteCollection::add_collection_with_prefix`]: crate::RouteCollection::add_collection_with_prefix
/// [`DuplicatePolicy::Reject`]: crate::DuplicatePolicy::Reject
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    /// A route with the same name is already registered.
    #[error("a route named `{name}` is already defined")]
    DuplicateRoute {
        /// The colliding route name.
        name: String,
    },

    /// The route name is empty or contains unsupported characters.
    #[error("invalid route name `{name}`: {reason}")]
    InvalidRouteName {
        /// The offending route name.
        name: String,
        /// Why the name was rejected.
        reason: String,
    },
}

impl RoutingError {
    /// Create a new duplicate route error.
    pub fn duplicate_route(name: impl Into<String>) -> Self {
        Self::DuplicateRoute { name: name.into() }
    }

    /// Create a new invalid route name error.
    pub fn invalid_route_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRouteName {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_route_error() {
        let err = RoutingError::duplicate_route("blog_show");
        assert_eq!(err.to_string(), "a route named `blog_show` is already defined");
    }

    #[test]
    fn test_invalid_route_name_error() {
        let err = RoutingError::invalid_route_name("blog show", "contains whitespace");
        assert!(err.to_string().contains("blog show"));
        assert!(err.to_string().contains("contains whitespace"));
    }
}
