//! Location pattern matching.
//!
//! A [`LocationPattern`] describes which hrefs count as a match: an exact
//! string (with `"*"` as the wildcard), a regular expression, a compiled
//! [`LocationObject`], or an ordered alternation of any of these. Matching
//! is flat: there is no nesting and no merging across alternation arms.

use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

use crate::location::{LocationObject, LocationShape, ParamMap};

/// The exact-string pattern that matches every href.
pub const WILDCARD: &str = "*";

/// A caller-supplied spec describing which hrefs should match.
#[derive(Clone)]
pub enum LocationPattern {
	/// Matches iff the pattern equals the href, or is [`WILDCARD`].
	Exact(String),
	/// Matches via a regular expression; capture groups become params.
	Matches(Regex),
	/// Delegates to an externally compiled location object.
	Object(Arc<dyn LocationObject>),
	/// Tries each arm left to right; the first hit wins.
	AnyOf(Vec<LocationPattern>),
}

// Manual Debug: `Arc<dyn LocationObject>` has no Debug of its own.
impl std::fmt::Debug for LocationPattern {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Exact(s) => f.debug_tuple("Exact").field(s).finish(),
			Self::Matches(re) => f.debug_tuple("Matches").field(&re.as_str()).finish(),
			Self::Object(object) => f.debug_tuple("Object").field(&object.href()).finish(),
			Self::AnyOf(arms) => f.debug_tuple("AnyOf").field(arms).finish(),
		}
	}
}

impl From<&str> for LocationPattern {
	fn from(pattern: &str) -> Self {
		Self::Exact(pattern.to_string())
	}
}

impl From<String> for LocationPattern {
	fn from(pattern: String) -> Self {
		Self::Exact(pattern)
	}
}

impl From<Regex> for LocationPattern {
	fn from(pattern: Regex) -> Self {
		Self::Matches(pattern)
	}
}

impl From<Arc<dyn LocationObject>> for LocationPattern {
	fn from(object: Arc<dyn LocationObject>) -> Self {
		Self::Object(object)
	}
}

impl From<Vec<LocationPattern>> for LocationPattern {
	fn from(arms: Vec<LocationPattern>) -> Self {
		Self::AnyOf(arms)
	}
}

/// Evaluates `pattern` against `href`.
///
/// Returns `None` when the pattern does not match. An exact hit yields the
/// empty shape; a regex hit yields `params` built from its capture groups:
/// group *n* (1-indexed) under the string key `n-1`, with named groups
/// merged afterwards and winning on key collision. Alternation arms are
/// short-circuiting: the first non-`None` result is returned as-is.
pub fn match_pattern(pattern: &LocationPattern, href: &str) -> Option<LocationShape> {
	match pattern {
		LocationPattern::Exact(s) => {
			(s == WILDCARD || s == href).then(LocationShape::default)
		}
		LocationPattern::Matches(re) => {
			let caps = re.captures(href)?;
			let mut params = ParamMap::new();

			for (index, group) in caps.iter().skip(1).enumerate() {
				if let Some(group) = group {
					params.insert(index.to_string(), Value::String(group.as_str().to_string()));
				}
			}
			// Named groups take precedence over their numbered aliases.
			for name in re.capture_names().flatten() {
				if let Some(group) = caps.name(name) {
					params.insert(name.to_string(), Value::String(group.as_str().to_string()));
				}
			}

			Some(LocationShape::with_params(params))
		}
		LocationPattern::Object(object) => object.exec(href),
		LocationPattern::AnyOf(arms) => arms.iter().find_map(|arm| match_pattern(arm, href)),
	}
}
