//! Navigation dispatch for the wayfarer engine.
//!
//! This crate is the stateful half of the engine: the [`Route`] state
//! machine that owns the current href, runs navigation requests through an
//! async middleware chain, applies approved transitions to the injected
//! [`HistoryAdapter`], and notifies listeners after the transition commits.
//!
//! Browser globals are never touched directly; everything history-shaped
//! goes through the adapter trait, with [`NoopHistory`] for browserless
//! environments and [`MemoryHistory`] as an in-process stack for tests and
//! embedded hosts.

pub mod error;
pub mod handler;
pub mod history;
pub mod registry;
pub mod route;

pub use error::{NavigationError, NavigationResult};
pub use handler::{
	Flow, NavigationHandler, async_handler_fn, async_listener_fn, handler_fn, listener_fn,
};
pub use history::{HistoryAdapter, MemoryHistory, NavigationMode, NoopHistory, PopStateCallback};
pub use registry::{Registry, Subscription};
pub use route::Route;
