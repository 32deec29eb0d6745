//! Route requirements.
//!
//! A requirement is either a regex fragment constraining one path
//! placeholder, or an ordered token list. The two reserved keys
//! ([`METHOD_REQUIREMENT`] and [`SCHEME_REQUIREMENT`]) are always stored as
//! token lists.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Reserved requirement key holding the allowed HTTP methods.
pub const METHOD_REQUIREMENT: &str = "_method";

/// Reserved requirement key holding the allowed URL schemes.
pub const SCHEME_REQUIREMENT: &str = "_scheme";

/// Methods allowed when a route does not restrict them.
pub const DEFAULT_METHODS: [&str; 4] = ["GET", "POST", "PUT", "DELETE"];

/// Schemes allowed when a route does not restrict them.
pub const DEFAULT_SCHEMES: [&str; 2] = ["HTTP", "HTTPS"];

/// Separator between alternatives in a delimited requirement (`"GET|POST"`).
const ALTERNATIVE_SEPARATOR: char = '|';

/// Returns true for the requirement keys with engine-level meaning.
#[must_use]
pub fn is_reserved(key: &str) -> bool {
    key == METHOD_REQUIREMENT || key == SCHEME_REQUIREMENT
}

/// A single route requirement.
///
/// # Example
///
/// ```
/// use waypoint_routing::Requirement;
///
/// let id = Requirement::from("^[0-9]+$").sanitized();
/// assert_eq!(id.as_pattern(), Some("[0-9]+"));
///
/// let methods = Requirement::from("GET | POST").into_token_list();
/// assert_eq!(methods.as_list(), Some(&["GET".to_string(), "POST".to_string()][..]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Requirement {
    /// An unanchored regex fragment, or a `|`-delimited list not yet split.
    Pattern(String),
    /// Ordered, distinct tokens.
    List(Vec<String>),
}

impl Requirement {
    /// Returns the regex fragment, if this is a pattern requirement.
    #[must_use]
    pub fn as_pattern(&self) -> Option<&str> {
        match self {
            Self::Pattern(pattern) => Some(pattern),
            Self::List(_) => None,
        }
    }

    /// Returns the tokens, if this is a list requirement.
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::Pattern(_) => None,
            Self::List(tokens) => Some(tokens),
        }
    }

    /// Fragment embedded into a compiled placeholder.
    ///
    /// Lists are rendered as an alternation of their tokens.
    #[must_use]
    pub fn as_fragment(&self) -> Cow<'_, str> {
        match self {
            Self::Pattern(pattern) => Cow::Borrowed(pattern),
            Self::List(tokens) => Cow::Owned(tokens.join("|")),
        }
    }

    /// Strips a single leading `^` and a single trailing `$`.
    ///
    /// List tokens are stripped one by one, then trimmed and de-duplicated.
    ///
    /// Fragments are re-embedded inside a larger pattern, so anchors supplied
    /// by configuration authors would break the surrounding expression.
    #[must_use]
    pub fn sanitized(self) -> Self {
        match self {
            Self::Pattern(pattern) => Self::Pattern(strip_anchors(&pattern).to_string()),
            Self::List(tokens) => Self::List(distinct_tokens(
                tokens.iter().map(|token| strip_anchors(token.trim())),
            )),
        }
    }

    /// Splits a delimited pattern into a token list.
    ///
    /// Idempotent: a list is only re-trimmed and de-duplicated, never split
    /// again.
    #[must_use]
    pub fn into_token_list(self) -> Self {
        match self {
            Self::Pattern(pattern) => {
                Self::List(distinct_tokens(pattern.split(ALTERNATIVE_SEPARATOR)))
            }
            list @ Self::List(_) => list.sanitized(),
        }
    }

    /// Sanitizes a requirement for storage under `key`.
    #[must_use]
    pub fn normalize_for(key: &str, requirement: Self) -> Self {
        let requirement = requirement.sanitized();
        if is_reserved(key) {
            requirement.into_token_list()
        } else {
            requirement
        }
    }

    pub(crate) fn default_methods() -> Self {
        Self::List(DEFAULT_METHODS.iter().map(ToString::to_string).collect())
    }

    pub(crate) fn default_schemes() -> Self {
        Self::List(DEFAULT_SCHEMES.iter().map(ToString::to_string).collect())
    }
}

impl From<&str> for Requirement {
    fn from(value: &str) -> Self {
        Self::Pattern(value.to_string())
    }
}

impl From<String> for Requirement {
    fn from(value: String) -> Self {
        Self::Pattern(value)
    }
}

impl From<Vec<String>> for Requirement {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<&[&str]> for Requirement {
    fn from(value: &[&str]) -> Self {
        Self::List(value.iter().map(ToString::to_string).collect())
    }
}

fn strip_anchors(pattern: &str) -> &str {
    let pattern = pattern.strip_prefix('^').unwrap_or(pattern);
    pattern.strip_suffix('$').unwrap_or(pattern)
}

fn distinct_tokens<'a>(tokens: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for token in tokens.map(str::trim).filter(|t| !t.is_empty()) {
        if !out.iter().any(|existing| existing == token) {
            out.push(token.to_string());
        }
    }
    out
}
