//! Error types for navigation dispatch.

use thiserror::Error;
use wayfarer_location::LocationError;

/// Errors surfaced by a navigation dispatch.
///
/// A middleware veto is not an error: a vetoed dispatch resolves normally,
/// it just commits nothing. Cross-origin targets and missing history APIs
/// are policy branches inside the transition step, never errors either.
#[derive(Debug, Error)]
pub enum NavigationError {
	/// The requested location could not be resolved to an href.
	#[error(transparent)]
	Location(#[from] LocationError),

	/// A middleware or listener failed. Middleware failures abort the
	/// dispatch before commit; listener failures propagate after the href
	/// has already been committed and are not rolled back.
	#[error("navigation handler failed: {0}")]
	Handler(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl NavigationError {
	/// Wraps an arbitrary handler failure.
	pub fn handler<E>(err: E) -> Self
	where
		E: std::error::Error + Send + Sync + 'static,
	{
		Self::Handler(Box::new(err))
	}

	/// Wraps a plain message as a handler failure.
	pub fn handler_msg(msg: impl Into<String>) -> Self {
		Self::Handler(msg.into().into())
	}
}

/// Result type for navigation operations.
pub type NavigationResult<T> = Result<T, NavigationError>;
