//! Minimal URL decomposition.
//!
//! [`SplitUrl`] is a reduced stand-in for a full URL parser: it splits a
//! location string into origin, pathname, search and hash, resolving
//! relative inputs against a base origin. Percent-encoding and IDN handling
//! are deliberately out of scope.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::LocationError;

/// Fixed base origin used to normalize relative locations when no real
/// browser origin is available.
pub const SYNTHETIC_ORIGIN: &str = "http://localhost";

/// Splits `(scheme:)(//authority)(path)(?search)(#hash)`. Every input
/// matches; emptiness of the groups is what carries the information.
static URL_SPLIT: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r"^(([^:/?#]+):)?(//([^/?#]*))?([^?#]*)(\?([^#]*))?(#(.*))?$")
		.expect("url split regex is valid")
});

/// The decomposed form of a location string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitUrl {
	/// Scheme plus authority, e.g. `https://example.com`.
	pub origin: String,
	/// Path component, always starting with `/`.
	pub pathname: String,
	/// Query component including the leading `?`, or empty.
	pub search: String,
	/// Fragment component including the leading `#`, or empty.
	pub hash: String,
}

impl SplitUrl {
	/// Decomposes `location`, resolving against `base` when the input has no
	/// authority of its own.
	///
	/// # Errors
	///
	/// Returns [`LocationError::InvalidLocation`] when neither `location`
	/// nor `base` contributes an authority.
	pub fn parse(location: &str, base: &str) -> Result<Self, LocationError> {
		let loc = Parts::split(location);
		let origin = if loc.host_present {
			loc.origin
		} else {
			let b = Parts::split(base);
			if !b.host_present {
				return Err(LocationError::InvalidLocation {
					location: location.to_string(),
					base: base.to_string(),
				});
			}
			b.origin
		};

		let pathname = if loc.path.starts_with('/') {
			loc.path
		} else {
			format!("/{}", loc.path)
		};

		Ok(Self {
			origin,
			pathname,
			search: loc.search,
			hash: loc.hash,
		})
	}

	/// The absolute string form, `origin + pathname + search + hash`.
	pub fn href(&self) -> String {
		format!("{}{}{}{}", self.origin, self.pathname, self.search, self.hash)
	}

	/// The origin-stripped string form, `pathname + search + hash`.
	pub fn relative_href(&self) -> String {
		format!("{}{}{}", self.pathname, self.search, self.hash)
	}
}

impl std::fmt::Display for SplitUrl {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.href())
	}
}

/// Raw capture groups of one split, before base resolution.
struct Parts {
	origin: String,
	host_present: bool,
	path: String,
	search: String,
	hash: String,
}

impl Parts {
	fn split(input: &str) -> Self {
		// The pattern accepts every string, so a miss can only mean an
		// empty-equivalent input.
		let caps = URL_SPLIT.captures(input);
		let group = |i: usize| -> &str {
			caps.as_ref()
				.and_then(|c| c.get(i))
				.map(|m| m.as_str())
				.unwrap_or("")
		};

		let scheme = group(1);
		let authority = group(3);
		let host = group(4);

		Self {
			origin: format!("{scheme}{authority}"),
			host_present: !host.is_empty(),
			path: group(5).to_string(),
			search: group(6).to_string(),
			hash: group(8).to_string(),
		}
	}
}
