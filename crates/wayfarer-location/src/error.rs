//! Error types for location parsing.

use thiserror::Error;

/// Errors raised while decomposing or resolving a location string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
	/// The input carries no authority of its own and the base origin is not
	/// usable either, so no absolute form can be produced.
	#[error("invalid location {location:?}: no origin in the input or the base {base:?}")]
	InvalidLocation {
		/// The offending location string.
		location: String,
		/// The base origin it was resolved against.
		base: String,
	},
}
