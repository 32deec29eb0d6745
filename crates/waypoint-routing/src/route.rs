//! A single route definition and its path-template compiler.
//!
//! This module provides [`Route`], which pairs a path template such as
//! `/blog/{slug}` with default values, requirements and free-form options,
//! and compiles the template into the `{name:regex}` form understood by the
//! matching engine.

use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::{Captures, Regex};
use serde_json::Value;

use crate::requirement::{Requirement, METHOD_REQUIREMENT, SCHEME_REQUIREMENT};

/// Ordered map of default values or options.
pub type Parameters = IndexMap<String, Value>;

/// Ordered map of requirements keyed by placeholder name or reserved key.
pub type Requirements = IndexMap<String, Requirement>;

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{([a-zA-Z0-9_]+)\}").expect("valid regex"))
}

/// A named path template with defaults, requirements and options.
///
/// The compiled pattern is computed lazily on first access and cached.
/// Every mutation of the pattern or of a requirement drops the cache, so the
/// compiled form is always a pure function of the template and the
/// requirements.
///
/// # Example
///
/// ```
/// use waypoint_routing::Route;
///
/// let mut route = Route::from_pattern("users/{id}");
/// route.set_requirement("id", "^[0-9]+$");
///
/// assert_eq!(route.raw_pattern(), "/users/{id}");
/// assert_eq!(route.pattern(), "/users/{id:[0-9]+}");
/// assert_eq!(route.methods(), ["GET", "POST", "PUT", "DELETE"]);
/// ```
#[derive(Debug, Clone)]
pub struct Route {
    /// Normalized, uncompiled template (always starts with `/`)
    pattern: String,
    /// Cached compiled template
    compiled: OnceLock<String>,
    defaults: Parameters,
    requirements: Requirements,
    options: Parameters,
}

impl Route {
    /// Creates a route from its four configuration sections.
    ///
    /// The pattern is normalized, every requirement is sanitized and the
    /// reserved `_method` / `_scheme` requirements are filled in when absent.
    #[must_use]
    pub fn new(
        pattern: &str,
        defaults: Parameters,
        requirements: Requirements,
        options: Parameters,
    ) -> Self {
        let mut route = Self {
            pattern: String::new(),
            compiled: OnceLock::new(),
            defaults: Parameters::new(),
            requirements: Requirements::new(),
            options: Parameters::new(),
        };
        route
            .set_pattern(pattern)
            .set_defaults(defaults)
            .set_requirements(requirements)
            .set_options(options);
        route
    }

    /// Creates a route with no defaults, requirements or options.
    #[must_use]
    pub fn from_pattern(pattern: &str) -> Self {
        Self::new(
            pattern,
            Parameters::new(),
            Requirements::new(),
            Parameters::new(),
        )
    }

    /// Returns the compiled pattern, compiling on first access.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.compiled
            .get_or_init(|| compile_pattern(&self.pattern, &self.requirements))
    }

    /// Returns the normalized template before placeholder rewriting.
    #[must_use]
    pub fn raw_pattern(&self) -> &str {
        &self.pattern
    }

    /// Compiles the pattern if it has not been compiled yet.
    pub fn compile(&self) {
        let _ = self.pattern();
    }

    /// Returns true once the compiled pattern is cached.
    #[must_use]
    pub fn is_compiled(&self) -> bool {
        self.compiled.get().is_some()
    }

    /// Replaces the template.
    ///
    /// Surrounding whitespace is trimmed and a leading `/` is added when
    /// missing.
    pub fn set_pattern(&mut self, pattern: &str) -> &mut Self {
        self.pattern = normalize_pattern(pattern);
        self.invalidate();
        self
    }

    /// Returns the default value for a parameter.
    #[must_use]
    pub fn default(&self, name: &str) -> Option<&Value> {
        self.defaults.get(name)
    }

    /// Returns true if a default exists for the parameter.
    #[must_use]
    pub fn has_default(&self, name: &str) -> bool {
        self.defaults.contains_key(name)
    }

    /// Returns all defaults in declaration order.
    #[must_use]
    pub fn defaults(&self) -> &Parameters {
        &self.defaults
    }

    /// Replaces all defaults.
    pub fn set_defaults(&mut self, defaults: Parameters) -> &mut Self {
        self.defaults = defaults;
        self
    }

    /// Sets a single default value.
    pub fn set_default(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    /// Returns a requirement by name.
    #[must_use]
    pub fn requirement(&self, name: &str) -> Option<&Requirement> {
        self.requirements.get(name)
    }

    /// Returns all requirements, reserved keys included.
    #[must_use]
    pub fn requirements(&self) -> &Requirements {
        &self.requirements
    }

    /// Replaces all requirements.
    ///
    /// Reserved keys missing from `requirements` fall back to
    /// [`DEFAULT_METHODS`](crate::DEFAULT_METHODS) and
    /// [`DEFAULT_SCHEMES`](crate::DEFAULT_SCHEMES).
    pub fn set_requirements(&mut self, requirements: Requirements) -> &mut Self {
        self.requirements = requirements
            .into_iter()
            .map(|(key, requirement)| {
                let requirement = Requirement::normalize_for(&key, requirement);
                (key, requirement)
            })
            .collect();

        if !self.requirements.contains_key(METHOD_REQUIREMENT) {
            self.requirements
                .insert(METHOD_REQUIREMENT.to_string(), Requirement::default_methods());
        }
        if !self.requirements.contains_key(SCHEME_REQUIREMENT) {
            self.requirements
                .insert(SCHEME_REQUIREMENT.to_string(), Requirement::default_schemes());
        }

        self.invalidate();
        self
    }

    /// Sets a single requirement.
    ///
    /// # Example
    ///
    /// ```
    /// use waypoint_routing::Route;
    ///
    /// let mut route = Route::from_pattern("/login");
    /// route.set_requirement("_method", "GET|POST");
    /// assert_eq!(route.methods(), ["GET", "POST"]);
    /// ```
    pub fn set_requirement(
        &mut self,
        name: impl Into<String>,
        requirement: impl Into<Requirement>,
    ) -> &mut Self {
        let name = name.into();
        let requirement = Requirement::normalize_for(&name, requirement.into());
        self.requirements.insert(name, requirement);
        self.invalidate();
        self
    }

    /// Returns an option by name.
    #[must_use]
    pub fn option(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }

    /// Returns all options.
    #[must_use]
    pub fn options(&self) -> &Parameters {
        &self.options
    }

    /// Replaces all options.
    pub fn set_options(&mut self, options: Parameters) -> &mut Self {
        self.options = options;
        self
    }

    /// Sets a single option.
    pub fn set_option(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.options.insert(name.into(), value.into());
        self
    }

    /// Allowed HTTP methods, in declaration order.
    #[must_use]
    pub fn methods(&self) -> &[String] {
        self.token_list(METHOD_REQUIREMENT)
    }

    /// Allowed URL schemes, in declaration order.
    #[must_use]
    pub fn schemes(&self) -> &[String] {
        self.token_list(SCHEME_REQUIREMENT)
    }

    /// Distinct placeholder names in the template, left to right.
    #[must_use]
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for caps in placeholder_regex().captures_iter(&self.pattern) {
            if let Some(name) = caps.get(1).map(|m| m.as_str()) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    fn token_list(&self, key: &str) -> &[String] {
        self.requirements
            .get(key)
            .and_then(Requirement::as_list)
            .unwrap_or(&[])
    }

    fn invalidate(&mut self) {
        self.compiled.take();
    }
}

impl PartialEq for Route {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
            && self.defaults == other.defaults
            && self.requirements == other.requirements
            && self.options == other.options
    }
}

fn normalize_pattern(pattern: &str) -> String {
    let pattern = pattern.trim();
    let mut normalized = if pattern.starts_with('/') {
        pattern.to_string()
    } else {
        format!("/{pattern}")
    };
    while normalized.ends_with("//") {
        normalized.pop();
    }
    normalized
}

// Placeholders without a requirement are left bare for the engine to
// resolve; unbalanced braces never match and pass through literally.
fn compile_pattern(pattern: &str, requirements: &Requirements) -> String {
    placeholder_regex()
        .replace_all(pattern, |caps: &Captures<'_>| {
            let name = &caps[1];
            match requirements.get(name) {
                Some(requirement) => format!("{{{name}:{}}}", requirement.as_fragment()),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
