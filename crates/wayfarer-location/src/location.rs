//! Candidate location values.
//!
//! A [`Location`] is what navigation operations accept: "wherever the
//! browser currently is", a string href, or an externally compiled
//! [`LocationObject`]. The engine never inspects the internals of a
//! compiled object; it only calls its `exec`/`compile`/`href` contract.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

/// Parameter and query mappings extracted from a match.
///
/// Values are [`serde_json::Value`]: plain strings for regex captures and
/// query strings, arbitrary typed values for compiled location objects.
pub type ParamMap = HashMap<String, Value>;

/// The raw payload of a successful match.
///
/// `None` fields mean the pattern carried no params/query semantics of its
/// own; [`crate::get_match_state`] is responsible for filling defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocationShape {
	/// Named or numbered parameters extracted by the pattern.
	pub params: Option<ParamMap>,
	/// Query data extracted by the pattern.
	pub query: Option<ParamMap>,
}

impl LocationShape {
	/// A shape with parameters and no query.
	pub fn with_params(params: ParamMap) -> Self {
		Self {
			params: Some(params),
			query: None,
		}
	}
}

/// An opaque, externally compiled URL builder.
///
/// Implementations are produced by schema-based builders outside this
/// engine. `exec` and `compile` are inverses over the schema the object was
/// compiled from; `href` is the object's own string form, used when the
/// object is dispatched as a navigation target.
pub trait LocationObject: Send + Sync {
	/// Attempts to match `candidate`, returning `None` on failure.
	fn exec(&self, candidate: &str) -> Option<LocationShape>;

	/// Builds an href from structured data; the inverse of [`Self::exec`].
	fn compile(&self, shape: &LocationShape) -> String;

	/// The object's own href string form.
	fn href(&self) -> String;
}

/// A candidate location for matching or navigation.
#[derive(Clone, Default)]
pub enum Location {
	/// Use the current browser location.
	#[default]
	Current,
	/// A string URL, absolute or relative.
	Href(String),
	/// An externally compiled location object.
	Object(Arc<dyn LocationObject>),
}

impl Location {
	/// The href-like string form this location contributes on its own:
	/// `None` for [`Location::Current`], which only the history adapter can
	/// resolve.
	pub fn as_href(&self) -> Option<String> {
		match self {
			Self::Current => None,
			Self::Href(href) => Some(href.clone()),
			Self::Object(object) => Some(object.href()),
		}
	}
}

impl std::fmt::Debug for Location {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Current => f.write_str("Location::Current"),
			Self::Href(href) => f.debug_tuple("Location::Href").field(href).finish(),
			Self::Object(object) => f
				.debug_tuple("Location::Object")
				.field(&object.href())
				.finish(),
		}
	}
}

impl From<&str> for Location {
	fn from(href: &str) -> Self {
		Self::Href(href.to_string())
	}
}

impl From<String> for Location {
	fn from(href: String) -> Self {
		Self::Href(href)
	}
}

impl From<Arc<dyn LocationObject>> for Location {
	fn from(object: Arc<dyn LocationObject>) -> Self {
		Self::Object(object)
	}
}

impl From<Option<Location>> for Location {
	fn from(location: Option<Location>) -> Self {
		location.unwrap_or_default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	struct FixedObject(&'static str);

	impl LocationObject for FixedObject {
		fn exec(&self, candidate: &str) -> Option<LocationShape> {
			(candidate == self.0).then(LocationShape::default)
		}

		fn compile(&self, _shape: &LocationShape) -> String {
			self.0.to_string()
		}

		fn href(&self) -> String {
			self.0.to_string()
		}
	}

	#[test]
	fn current_contributes_no_href() {
		assert_eq!(Location::Current.as_href(), None);
	}

	#[test]
	fn href_and_object_contribute_their_string_forms() {
		assert_eq!(Location::from("/a").as_href(), Some("/a".to_string()));

		let object: Arc<dyn LocationObject> = Arc::new(FixedObject("/compiled"));
		assert_eq!(
			Location::from(object).as_href(),
			Some("/compiled".to_string())
		);
	}

	#[test]
	fn default_is_current() {
		assert!(matches!(Location::default(), Location::Current));
		assert!(matches!(Location::from(None), Location::Current));
	}
}
