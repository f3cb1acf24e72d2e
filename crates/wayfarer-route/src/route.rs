//! The navigation route state machine.
//!
//! A [`Route`] owns the engine's view of "where we are" (`href`), runs
//! every navigation request through the registered middleware chain,
//! applies approved transitions to the injected [`HistoryAdapter`], and
//! fans the committed transition out to listeners. Matching helpers are
//! available at any time against the current href, independent of the
//! dispatch pipeline.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use wayfarer_location::{
	Location, LocationPattern, LocationShape, MatchState, SYNTHETIC_ORIGIN, SplitUrl,
	get_match_state, match_pattern,
};

use crate::error::NavigationResult;
use crate::handler::{Flow, NavigationHandler};
use crate::history::{HistoryAdapter, NavigationMode};
use crate::registry::{Registry, Subscription};

/// The navigation route state machine.
///
/// Created once per navigation root. Construction performs an implicit
/// dispatch to the current browser location and subscribes to popstate
/// events for the life of the value; [`Route::close`] (or dropping the last
/// reference) releases that subscription, the only owned resource.
///
/// Concurrent dispatches are deliberately not serialized against each
/// other: each captures its own `prev` snapshot at entry, and the href that
/// sticks is whichever dispatch commits last in wall-clock order.
pub struct Route {
	history: Arc<dyn HistoryAdapter>,
	href: RwLock<String>,
	initialized: AtomicBool,
	listeners: Arc<Registry<dyn NavigationHandler>>,
	middleware: Arc<Registry<dyn NavigationHandler>>,
	popstate_token: Mutex<Option<u64>>,
}

impl Route {
	/// Creates a route and dispatches to the environment's current
	/// location.
	///
	/// # Errors
	///
	/// Propagates a failing (not vetoed) initial dispatch; the half-built
	/// route is dropped and its popstate registration released.
	pub async fn new(history: Arc<dyn HistoryAdapter>) -> NavigationResult<Arc<Self>> {
		Self::with_location(history, Location::Current).await
	}

	/// Creates a route and dispatches to an explicit initial location.
	///
	/// The implicit dispatch runs with the route still marked
	/// uninitialized, so a target equal to the environment's current
	/// location does not push a duplicate history entry. `initialized`
	/// flips exactly once, after that dispatch settles — whether it
	/// committed or was vetoed.
	pub async fn with_location(
		history: Arc<dyn HistoryAdapter>,
		location: impl Into<Location>,
	) -> NavigationResult<Arc<Self>> {
		let route = Arc::new(Self {
			history,
			href: RwLock::new(String::new()),
			initialized: AtomicBool::new(false),
			listeners: Registry::new(),
			middleware: Registry::new(),
			popstate_token: Mutex::new(None),
		});

		// Inbound popstate events re-dispatch to wherever the browser
		// already moved; middleware can still veto the internal update,
		// but not the browser's own stack traversal.
		let weak = Arc::downgrade(&route);
		let token = route.history.subscribe(Arc::new(move || {
			let Some(route) = weak.upgrade() else { return };
			let Ok(runtime) = tokio::runtime::Handle::try_current() else {
				return;
			};
			runtime.spawn(async move {
				if let Err(err) = route.dispatch(Location::Current, None).await {
					warn!(error = %err, "popstate re-dispatch failed");
				}
			});
		}));
		*route.popstate_token.lock() = Some(token);

		route.dispatch(location, None).await?;
		route.initialized.store(true, Ordering::SeqCst);

		Ok(route)
	}

	/// The current href.
	pub fn href(&self) -> String {
		self.href.read().clone()
	}

	/// Whether the implicit startup dispatch has settled.
	pub fn initialized(&self) -> bool {
		self.initialized.load(Ordering::SeqCst)
	}

	/// Resolves a location value into the engine's normalized href form.
	///
	/// [`Location::Current`] reads the history adapter (empty string in a
	/// browserless environment). Other values decompose against the
	/// environment's origin when one exists, the synthetic origin
	/// otherwise; same-origin results are origin-stripped, foreign origins
	/// stay absolute so the transition policy can detect them.
	pub fn resolve_href(&self, location: &Location) -> NavigationResult<String> {
		match location.as_href() {
			None => {
				let Some(current) = self.history.current_href() else {
					return Ok(String::new());
				};
				Ok(SplitUrl::parse(&current, SYNTHETIC_ORIGIN)?.relative_href())
			}
			Some(href) => {
				let base = self.environment_origin();
				let url = SplitUrl::parse(&href, &base)?;
				if url.origin == base {
					Ok(url.relative_href())
				} else {
					Ok(url.href())
				}
			}
		}
	}

	/// Registers a navigation-complete listener, invoked after a dispatch
	/// commits.
	pub fn subscribe(&self, listener: Arc<dyn NavigationHandler>) -> Subscription<dyn NavigationHandler> {
		self.listeners.register(listener)
	}

	/// Registers a navigation-start middleware with veto power.
	pub fn use_middleware(
		&self,
		middleware: Arc<dyn NavigationHandler>,
	) -> Subscription<dyn NavigationHandler> {
		self.middleware.register(middleware)
	}

	/// Runs one full navigation attempt.
	///
	/// Middleware run in registration order, each awaited before the next;
	/// a [`Flow::Veto`] aborts silently, leaving href, history and
	/// listeners untouched. On approval the transition is applied to the
	/// history adapter, the href commits, and listeners run in
	/// registration order, each awaited.
	///
	/// # Errors
	///
	/// Middleware errors abort before commit; listener errors propagate
	/// after commit without rolling the href back.
	pub async fn dispatch(
		&self,
		location: impl Into<Location>,
		mode: Option<NavigationMode>,
	) -> NavigationResult<()> {
		let prev = self.href();
		let next = self.resolve_href(&location.into())?;

		debug!(next = %next, prev = %prev, ?mode, "dispatch started");

		for middleware in self.middleware.snapshot() {
			if middleware.handle(&next, &prev, mode).await? == Flow::Veto {
				debug!(next = %next, prev = %prev, "dispatch vetoed");
				return Ok(());
			}
		}

		// The built-in history commit runs after every registered
		// middleware; it cannot veto, only decline to touch the stack.
		self.commit_transition(&next, mode);

		*self.href.write() = next.clone();
		info!(next = %next, prev = %prev, ?mode, "navigation committed");

		for listener in self.listeners.snapshot() {
			listener.handle(&next, &prev, mode).await?;
		}

		Ok(())
	}

	/// The transition policy: how an approved navigation reaches the
	/// environment.
	fn commit_transition(&self, next: &str, mode: Option<NavigationMode>) {
		// Browserless environment: internal state only.
		let Some(current) = self.history.current_href() else {
			return;
		};

		// First-load suppression: the synthetic startup dispatch must not
		// duplicate the entry for the page the user is already on.
		if !self.initialized.load(Ordering::SeqCst)
			&& self
				.resolve_href(&Location::Current)
				.is_ok_and(|resolved| resolved == next)
		{
			debug!(next = %next, "first-load transition suppressed");
			return;
		}

		if !self.is_same_origin(next, &current) || !self.history.has_history() {
			match mode {
				Some(NavigationMode::Assign) => self.history.assign_location(next),
				Some(NavigationMode::Replace) => self.history.replace_location(next),
				None => {}
			}
			return;
		}

		match mode {
			Some(NavigationMode::Assign) => self.history.push_state(next),
			Some(NavigationMode::Replace) => self.history.replace_state(next),
			None => {}
		}
	}

	fn environment_origin(&self) -> String {
		self.history
			.current_href()
			.and_then(|current| SplitUrl::parse(&current, SYNTHETIC_ORIGIN).ok())
			.map(|url| url.origin)
			.unwrap_or_else(|| SYNTHETIC_ORIGIN.to_string())
	}

	fn is_same_origin(&self, href: &str, current: &str) -> bool {
		let Ok(current_url) = SplitUrl::parse(current, SYNTHETIC_ORIGIN) else {
			return false;
		};
		SplitUrl::parse(href, &current_url.origin)
			.map(|url| url.origin == current_url.origin)
			.unwrap_or(false)
	}

	/// Matches the current location against a pattern.
	pub fn match_href(&self, pattern: &LocationPattern) -> Option<LocationShape> {
		match_pattern(pattern, &self.href())
	}

	/// Whether the current location matches a pattern.
	pub fn matches(&self, pattern: &LocationPattern) -> bool {
		self.match_href(pattern).is_some()
	}

	/// The conditional primitive over a match: invokes `on_match` with the
	/// match payload when the pattern matches the current location,
	/// `on_mismatch` otherwise. A constant fallback is spelled
	/// `|_| value` / `|| value`.
	pub fn evaluate<T>(
		&self,
		pattern: &LocationPattern,
		on_match: impl FnOnce(LocationShape) -> T,
		on_mismatch: impl FnOnce() -> T,
	) -> T {
		match self.match_href(pattern) {
			Some(shape) => on_match(shape),
			None => on_mismatch(),
		}
	}

	/// The normalized, always-defined match result against the current
	/// location.
	pub fn match_state(&self, pattern: &LocationPattern) -> MatchState {
		get_match_state(pattern, &self.href())
	}

	/// Dispatches with [`NavigationMode::Assign`]: pushes a history entry.
	pub async fn assign(&self, location: impl Into<Location>) -> NavigationResult<()> {
		self.dispatch(location, Some(NavigationMode::Assign)).await
	}

	/// Dispatches with [`NavigationMode::Replace`]: overwrites the current
	/// history entry.
	pub async fn replace(&self, location: impl Into<Location>) -> NavigationResult<()> {
		self.dispatch(location, Some(NavigationMode::Replace)).await
	}

	/// Re-dispatches to the current location without touching the history
	/// stack.
	pub async fn reload(&self) -> NavigationResult<()> {
		self.dispatch(Location::Current, None).await
	}

	/// Jumps `delta` entries through the history stack; a no-op outside a
	/// browser-like environment.
	pub fn go(&self, delta: i64) {
		self.history.go(delta);
	}

	/// Steps one entry back through the history stack.
	pub fn back(&self) {
		self.go(-1);
	}

	/// Steps one entry forward through the history stack.
	pub fn forward(&self) {
		self.go(1);
	}

	/// The pathname component of the current href.
	pub fn pathname(&self) -> String {
		self.segment(|url| url.pathname)
	}

	/// The search component of the current href, `?`-prefixed or empty.
	pub fn search(&self) -> String {
		self.segment(|url| url.search)
	}

	/// The hash component of the current href, `#`-prefixed or empty.
	pub fn hash(&self) -> String {
		self.segment(|url| url.hash)
	}

	fn segment(&self, pick: impl FnOnce(SplitUrl) -> String) -> String {
		SplitUrl::parse(&self.href(), SYNTHETIC_ORIGIN)
			.map(pick)
			.unwrap_or_default()
	}

	/// Releases the popstate subscription; the route keeps working for
	/// explicit dispatches. Idempotent.
	pub fn close(&self) {
		if let Some(token) = self.popstate_token.lock().take() {
			self.history.unsubscribe(token);
		}
	}
}

impl Drop for Route {
	fn drop(&mut self) {
		self.close();
	}
}

impl std::fmt::Display for Route {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.href())
	}
}

impl std::fmt::Debug for Route {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Route")
			.field("href", &self.href())
			.field("initialized", &self.initialized())
			.field("listeners", &self.listeners.len())
			.field("middleware", &self.middleware.len())
			.finish()
	}
}
