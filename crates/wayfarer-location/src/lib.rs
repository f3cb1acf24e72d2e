//! Location values, URL decomposition and pattern matching.
//!
//! This crate is the pure, stateless half of the wayfarer navigation engine:
//!
//! - [`SplitUrl`]: splits an absolute-or-relative location string into
//!   origin, pathname, search and hash components
//! - [`Location`]: a candidate location (current browser location, a string
//!   href, or an externally compiled [`LocationObject`])
//! - [`LocationPattern`] / [`match_pattern`]: decides whether an href matches
//!   a caller-supplied pattern and extracts structured parameters
//! - [`MatchState`] / [`get_match_state`]: the always-defined, normalized
//!   form of a match result
//!
//! Everything here is side-effect free; the stateful dispatch pipeline lives
//! in `wayfarer-route`.

pub mod error;
pub mod location;
pub mod pattern;
pub mod state;
pub mod url;

pub use error::LocationError;
pub use location::{Location, LocationObject, LocationShape, ParamMap};
pub use pattern::{LocationPattern, WILDCARD, match_pattern};
pub use state::{MatchState, get_match_state};
pub use url::{SYNTHETIC_ORIGIN, SplitUrl};

/// Result type for location operations.
pub type LocationResult<T> = Result<T, LocationError>;
