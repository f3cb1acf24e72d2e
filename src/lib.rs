//! Client-side navigation engine for Rust front-ends.
//!
//! This crate is a unified interface over the following internal crates:
//!
//! - `wayfarer-location`: URL decomposition, location values, pattern matching
//! - `wayfarer-route`: history adapter boundary and the navigation route state machine

pub use wayfarer_location as location;
pub use wayfarer_route as route;

/// Re-export of the types most applications need.
pub mod prelude {
	pub use wayfarer_location::{
		Location, LocationError, LocationObject, LocationPattern, LocationShape, MatchState,
		ParamMap, SplitUrl, get_match_state, match_pattern,
	};
	pub use wayfarer_route::{
		Flow, HistoryAdapter, MemoryHistory, NavigationError, NavigationHandler, NavigationMode,
		NoopHistory, Route, Subscription, handler_fn, listener_fn,
	};
}
