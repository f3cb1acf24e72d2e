//! Normalized match results.
//!
//! [`get_match_state`] wraps [`match_pattern`] into a shape that is always
//! fully defined, so render-time callers never have to branch on missing
//! params or query maps.

use serde::Serialize;
use serde_json::Value;

use crate::location::ParamMap;
use crate::pattern::{LocationPattern, match_pattern};

/// The always-defined result of evaluating a pattern against an href.
///
/// `params` and `query` are never absent: when the underlying match produced
/// nothing they are empty maps, and a failed match (`ok == false`) always
/// carries empty maps rather than stale values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchState {
	/// Whether the pattern matched the href.
	pub ok: bool,
	/// The href the pattern was evaluated against.
	pub href: String,
	/// Extracted parameters, or empty.
	pub params: ParamMap,
	/// Extracted query data, or empty.
	pub query: ParamMap,
}

/// Evaluates `pattern` against `href` and normalizes the result.
///
/// When the match produced no query of its own, the query string is parsed
/// directly off `href` as a convenience — except for compiled
/// [`LocationPattern::Object`] patterns, whose `exec` already owns query
/// extraction and must not be second-guessed.
///
/// Pure and side-effect free; safe to call once per render.
pub fn get_match_state(pattern: &LocationPattern, href: &str) -> MatchState {
	let matched = match_pattern(pattern, href);
	let ok = matched.is_some();
	let shape = matched.unwrap_or_default();

	let query = match shape.query {
		Some(query) => query,
		None if !matches!(pattern, LocationPattern::Object(_)) => parse_query(href),
		None => ParamMap::new(),
	};

	MatchState {
		ok,
		href: href.to_string(),
		params: shape.params.unwrap_or_default(),
		query,
	}
}

/// Parses the query string off a raw href; last occurrence of a repeated key
/// wins. Unparseable input degrades to an empty map.
fn parse_query(href: &str) -> ParamMap {
	let after_path = href.split_once('?').map(|(_, rest)| rest).unwrap_or("");
	let raw = after_path.split_once('#').map_or(after_path, |(q, _)| q);

	serde_urlencoded::from_str::<Vec<(String, String)>>(raw)
		.map(|pairs| {
			pairs
				.into_iter()
				.map(|(k, v)| (k, Value::String(v)))
				.collect()
		})
		.unwrap_or_default()
}
