//! Route configuration schema.
//!
//! A routing file is a map of entry name to entry body. Each body is
//! validated once, at parse time, into the closed [`RouteEntry`] type: either
//! an import of another resource or a route definition.

use serde_json::{Map, Value};
use tracing::warn;
use waypoint_routing::{Parameters, Requirement, Requirements, Route};

use crate::parser::Format;
use crate::ConfigError;

/// Key naming another resource to import.
pub const KEY_RESOURCE: &str = "resource";
/// Key holding the format hint of an imported resource.
pub const KEY_TYPE: &str = "type";
/// Key holding the prefix applied to an imported resource.
pub const KEY_PREFIX: &str = "prefix";
/// Key holding a route's default values.
pub const KEY_DEFAULTS: &str = "defaults";
/// Key holding a route's requirements.
pub const KEY_REQUIREMENTS: &str = "requirements";
/// Key holding a route's options.
pub const KEY_OPTIONS: &str = "options";
/// Key holding a route's path template.
pub const KEY_PATTERN: &str = "pattern";

/// Every key a route entry may contain, in ascending order.
pub const VOCABULARY: [&str; 7] = [
    KEY_DEFAULTS,
    KEY_OPTIONS,
    KEY_PATTERN,
    KEY_PREFIX,
    KEY_REQUIREMENTS,
    KEY_RESOURCE,
    KEY_TYPE,
];

const ROUTE_ONLY_KEYS: [&str; 4] = [KEY_PATTERN, KEY_DEFAULTS, KEY_REQUIREMENTS, KEY_OPTIONS];

/// A validated entry of a routing file.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteEntry {
    /// Loads another resource and merges it under a prefix.
    Import(ImportEntry),
    /// Defines a single route.
    Route(RouteDefinition),
}

/// An entry carrying a `resource` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
    /// Entry name (not registered as a route).
    pub name: String,
    /// Logical name of the imported resource, relative to the importing file.
    pub resource: String,
    /// Prefix applied to every imported route; empty when absent.
    pub prefix: String,
    /// Explicit format, overriding the file extension.
    pub format: Option<Format>,
}

/// An entry defining a route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDefinition {
    /// Route name.
    pub name: String,
    /// Raw path template.
    pub pattern: String,
    /// Default values.
    pub defaults: Parameters,
    /// Requirements, not yet sanitized.
    pub requirements: Requirements,
    /// Options.
    pub options: Parameters,
}

impl RouteDefinition {
    /// Builds the [`Route`], sanitizing requirements on the way.
    #[must_use]
    pub fn into_route(self) -> Route {
        Route::new(&self.pattern, self.defaults, self.requirements, self.options)
    }
}

impl RouteEntry {
    /// Validates one entry body.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::UnknownKey`] for a key outside [`VOCABULARY`]
    /// - [`ConfigError::MissingPattern`] for a non-import entry without `pattern`
    /// - [`ConfigError::InvalidValue`] for values of the wrong shape
    ///
    /// # Example
    ///
    /// ```
    /// use serde_json::json;
    /// use waypoint_config::RouteEntry;
    ///
    /// let entry = RouteEntry::from_value("blog", &json!({
    ///     "pattern": "/blog/{page}",
    ///     "defaults": { "page": 1 },
    ///     "requirements": { "page": "\\d+" }
    /// })).unwrap();
    ///
    /// assert!(matches!(entry, RouteEntry::Route(_)));
    /// ```
    pub fn from_value(name: &str, value: &Value) -> Result<Self, ConfigError> {
        let Value::Object(body) = value else {
            return Err(ConfigError::invalid_value(
                name,
                name,
                format!("route entry must be a map, found {}", kind_of(value)),
            ));
        };

        if let Some(key) = body.keys().find(|key| !VOCABULARY.contains(&key.as_str())) {
            return Err(ConfigError::unknown_key(key.as_str(), name, &VOCABULARY));
        }

        if let Some(resource) = present(body, KEY_RESOURCE) {
            return Self::import(name, body, resource);
        }

        let pattern = present(body, KEY_PATTERN)
            .ok_or_else(|| ConfigError::missing_pattern(name))
            .and_then(|pattern| scalar_string(name, KEY_PATTERN, pattern))?;

        Ok(Self::Route(RouteDefinition {
            name: name.to_string(),
            pattern,
            defaults: parameters(name, KEY_DEFAULTS, present(body, KEY_DEFAULTS))?,
            requirements: requirements(name, present(body, KEY_REQUIREMENTS))?,
            options: parameters(name, KEY_OPTIONS, present(body, KEY_OPTIONS))?,
        }))
    }

    fn import(name: &str, body: &Map<String, Value>, resource: &Value) -> Result<Self, ConfigError> {
        let ignored: Vec<&str> = ROUTE_ONLY_KEYS
            .into_iter()
            .filter(|key| body.contains_key(*key))
            .collect();
        if !ignored.is_empty() {
            warn!(entry = %name, keys = ?ignored, "route keys ignored on import entry");
        }

        let resource = scalar_string(name, KEY_RESOURCE, resource)?;
        let prefix = present(body, KEY_PREFIX)
            .map(|prefix| scalar_string(name, KEY_PREFIX, prefix))
            .transpose()?
            .unwrap_or_default();
        let format = present(body, KEY_TYPE)
            .map(|kind| {
                let kind = scalar_string(name, KEY_TYPE, kind)?;
                kind.parse::<Format>()
                    .map_err(|reason| ConfigError::invalid_value(name, KEY_TYPE, reason))
            })
            .transpose()?;

        Ok(Self::Import(ImportEntry {
            name: name.to_string(),
            resource,
            prefix,
            format,
        }))
    }
}

// Null values count as absent.
fn present<'a>(body: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    body.get(key).filter(|value| !value.is_null())
}

/// Coerces a scalar to its string form.
fn scalar_string(route: &str, field: &str, value: &Value) -> Result<String, ConfigError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(ConfigError::invalid_value(
            route,
            field,
            format!("expected a string, found {}", kind_of(other)),
        )),
    }
}

fn parameters(route: &str, field: &str, value: Option<&Value>) -> Result<Parameters, ConfigError> {
    match value {
        None => Ok(Parameters::new()),
        Some(Value::Object(map)) => Ok(map
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()),
        Some(other) => Err(ConfigError::invalid_value(
            route,
            field,
            format!("expected a map, found {}", kind_of(other)),
        )),
    }
}

fn requirements(route: &str, value: Option<&Value>) -> Result<Requirements, ConfigError> {
    let map = match value {
        None => return Ok(Requirements::new()),
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(ConfigError::invalid_value(
                route,
                KEY_REQUIREMENTS,
                format!("expected a map, found {}", kind_of(other)),
            ))
        }
    };

    let mut out = Requirements::new();
    for (key, value) in map {
        let field = format!("{KEY_REQUIREMENTS}.{key}");
        let requirement = match value {
            Value::Array(items) => Requirement::List(
                items
                    .iter()
                    .map(|item| scalar_string(route, &field, item))
                    .collect::<Result<_, _>>()?,
            ),
            scalar => Requirement::Pattern(scalar_string(route, &field, scalar)?),
        };
        out.insert(key.clone(), requirement);
    }
    Ok(out)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a map",
    }
}
