//! The boundary to browser history.
//!
//! The route state machine never touches `window`/`history` globals; it is
//! handed a [`HistoryAdapter`] capability object at construction. Browser
//! bindings implement this trait on top of the real History API;
//! [`NoopHistory`] degrades every operation to a silent no-op for
//! browserless environments, and [`MemoryHistory`] is an in-process history
//! stack with popstate fan-out for tests and embedded hosts.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use wayfarer_location::{SYNTHETIC_ORIGIN, SplitUrl};

/// How a committed transition mutates the history stack.
///
/// An unspecified mode (`Option::None` throughout the engine) mutates
/// nothing: the route updates its internal state only, as for popstate
/// re-syncs and reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
	/// Push a new history entry (`history.pushState` semantics).
	Assign,
	/// Overwrite the current entry (`history.replaceState` semantics).
	Replace,
}

/// Callback invoked when the history position changes behind the engine's
/// back (the popstate-equivalent event).
pub type PopStateCallback = Arc<dyn Fn() + Send + Sync>;

/// Capability object over a browser-like history/location environment.
///
/// Every mutating operation must be a silent no-op when the underlying
/// environment is absent; absence is signalled by [`Self::current_href`]
/// returning `None` and is never an error.
pub trait HistoryAdapter: Send + Sync {
	/// The environment's current absolute href, or `None` outside a
	/// browser-like environment.
	fn current_href(&self) -> Option<String>;

	/// Whether a history API is available for push/replace-state writes.
	fn has_history(&self) -> bool;

	/// Pushes a new history-state entry.
	fn push_state(&self, href: &str);

	/// Replaces the current history-state entry.
	fn replace_state(&self, href: &str);

	/// Full-page navigation that adds a history entry and reloads.
	fn assign_location(&self, href: &str);

	/// Full-page navigation that replaces the current entry and reloads.
	fn replace_location(&self, href: &str);

	/// Jumps `delta` entries through the history stack.
	fn go(&self, delta: i64);

	/// Registers a popstate callback, returning an unsubscribe token.
	fn subscribe(&self, callback: PopStateCallback) -> u64;

	/// Releases a previously registered popstate callback.
	fn unsubscribe(&self, token: u64);
}

/// The browserless adapter: no location, no history, no events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHistory;

impl HistoryAdapter for NoopHistory {
	fn current_href(&self) -> Option<String> {
		None
	}

	fn has_history(&self) -> bool {
		false
	}

	fn push_state(&self, _href: &str) {}

	fn replace_state(&self, _href: &str) {}

	fn assign_location(&self, _href: &str) {}

	fn replace_location(&self, _href: &str) {}

	fn go(&self, _delta: i64) {}

	fn subscribe(&self, _callback: PopStateCallback) -> u64 {
		0
	}

	fn unsubscribe(&self, _token: u64) {}
}

/// Interior stack state of a [`MemoryHistory`].
struct Stack {
	entries: Vec<String>,
	index: usize,
	/// Full-page navigations (cross-origin or history-less fallbacks).
	loads: Vec<(NavigationMode, String)>,
}

/// An in-process history stack.
///
/// Mirrors the browser stack semantics the engine relies on: pushing
/// truncates the forward entries, `go` moves the cursor and fires the
/// popstate callbacks, full-page loads are recorded instead of performed.
pub struct MemoryHistory {
	stack: Mutex<Stack>,
	listeners: RwLock<Vec<(u64, PopStateCallback)>>,
	next_token: AtomicU64,
	history_enabled: AtomicBool,
}

impl MemoryHistory {
	/// Creates a stack seeded with one entry; relative `initial` values
	/// resolve against the synthetic origin.
	pub fn new(initial: &str) -> Self {
		let entry = SplitUrl::parse(initial, SYNTHETIC_ORIGIN)
			.map(|url| url.href())
			.unwrap_or_else(|_| format!("{SYNTHETIC_ORIGIN}/"));

		Self {
			stack: Mutex::new(Stack {
				entries: vec![entry],
				index: 0,
				loads: Vec::new(),
			}),
			listeners: RwLock::new(Vec::new()),
			next_token: AtomicU64::new(1),
			history_enabled: AtomicBool::new(true),
		}
	}

	/// Emulates an environment whose history API is unavailable; the
	/// location read keeps working.
	pub fn disable_history(&self) {
		self.history_enabled.store(false, Ordering::SeqCst);
	}

	/// Snapshot of the stack entries, oldest first.
	pub fn entries(&self) -> Vec<String> {
		self.stack.lock().entries.clone()
	}

	/// Position of the current entry within [`Self::entries`].
	pub fn current_index(&self) -> usize {
		self.stack.lock().index
	}

	/// Full-page navigations recorded so far.
	pub fn full_loads(&self) -> Vec<(NavigationMode, String)> {
		self.stack.lock().loads.clone()
	}

	/// Resolves `href` against the current entry's origin for storage.
	fn absolute(&self, href: &str) -> String {
		let origin = self
			.current_href()
			.and_then(|current| SplitUrl::parse(&current, SYNTHETIC_ORIGIN).ok())
			.map(|url| url.origin)
			.unwrap_or_else(|| SYNTHETIC_ORIGIN.to_string());

		SplitUrl::parse(href, &origin)
			.map(|url| url.href())
			.unwrap_or_else(|_| href.to_string())
	}

	fn fire_popstate(&self) {
		let listeners: Vec<PopStateCallback> = self
			.listeners
			.read()
			.iter()
			.map(|(_, callback)| Arc::clone(callback))
			.collect();
		for listener in listeners {
			listener();
		}
	}
}

impl HistoryAdapter for MemoryHistory {
	fn current_href(&self) -> Option<String> {
		let stack = self.stack.lock();
		stack.entries.get(stack.index).cloned()
	}

	fn has_history(&self) -> bool {
		self.history_enabled.load(Ordering::SeqCst)
	}

	fn push_state(&self, href: &str) {
		let entry = self.absolute(href);
		let mut stack = self.stack.lock();
		let index = stack.index;
		stack.entries.truncate(index + 1);
		stack.entries.push(entry);
		stack.index += 1;
	}

	fn replace_state(&self, href: &str) {
		let entry = self.absolute(href);
		let mut stack = self.stack.lock();
		let index = stack.index;
		stack.entries[index] = entry;
	}

	fn assign_location(&self, href: &str) {
		let entry = self.absolute(href);
		let mut stack = self.stack.lock();
		let index = stack.index;
		stack.entries.truncate(index + 1);
		stack.entries.push(entry.clone());
		stack.index += 1;
		stack.loads.push((NavigationMode::Assign, entry));
	}

	fn replace_location(&self, href: &str) {
		let entry = self.absolute(href);
		let mut stack = self.stack.lock();
		let index = stack.index;
		stack.entries[index] = entry.clone();
		stack.loads.push((NavigationMode::Replace, entry));
	}

	fn go(&self, delta: i64) {
		let moved = {
			let mut stack = self.stack.lock();
			let target = stack.index as i64 + delta;
			if target < 0 || target >= stack.entries.len() as i64 {
				false
			} else {
				stack.index = target as usize;
				true
			}
		};
		// Fire outside the lock; a callback may re-enter the adapter.
		if moved {
			self.fire_popstate();
		}
	}

	fn subscribe(&self, callback: PopStateCallback) -> u64 {
		let token = self.next_token.fetch_add(1, Ordering::SeqCst);
		self.listeners.write().push((token, callback));
		token
	}

	fn unsubscribe(&self, token: u64) {
		self.listeners.write().retain(|(t, _)| *t != token);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::AtomicUsize;

	#[test]
	fn seeds_one_absolute_entry() {
		let history = MemoryHistory::new("/a");
		assert_eq!(history.entries(), vec![format!("{SYNTHETIC_ORIGIN}/a")]);
		assert_eq!(history.current_href(), Some(format!("{SYNTHETIC_ORIGIN}/a")));
	}

	#[test]
	fn push_truncates_forward_entries() {
		let history = MemoryHistory::new("https://x/a");
		history.push_state("/b");
		history.push_state("/c");
		history.go(-2);
		history.push_state("/d");
		assert_eq!(history.entries(), vec!["https://x/a", "https://x/d"]);
		assert_eq!(history.current_index(), 1);
	}

	#[test]
	fn replace_keeps_the_stack_depth() {
		let history = MemoryHistory::new("https://x/a");
		history.replace_state("/b");
		assert_eq!(history.entries(), vec!["https://x/b"]);
	}

	#[test]
	fn go_clamps_at_the_stack_edges() {
		let history = MemoryHistory::new("https://x/a");
		history.push_state("/b");
		history.go(-5);
		assert_eq!(history.current_index(), 1);
		history.go(-1);
		assert_eq!(history.current_index(), 0);
		history.go(7);
		assert_eq!(history.current_index(), 0);
	}

	#[test]
	fn go_fires_popstate_only_when_it_moves() {
		let history = MemoryHistory::new("https://x/a");
		history.push_state("/b");

		let fired = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&fired);
		history.subscribe(Arc::new(move || {
			counter.fetch_add(1, Ordering::SeqCst);
		}));

		history.go(-1);
		history.go(-1); // already at the oldest entry
		assert_eq!(fired.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn unsubscribe_releases_the_callback() {
		let history = MemoryHistory::new("https://x/a");
		history.push_state("/b");

		let fired = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&fired);
		let token = history.subscribe(Arc::new(move || {
			counter.fetch_add(1, Ordering::SeqCst);
		}));
		history.unsubscribe(token);

		history.go(-1);
		assert_eq!(fired.load(Ordering::SeqCst), 0);
	}

	#[test]
	fn full_loads_are_recorded_not_performed() {
		let history = MemoryHistory::new("https://x/a");
		history.assign_location("https://other.example/p");
		assert_eq!(
			history.full_loads(),
			vec![(NavigationMode::Assign, "https://other.example/p".to_string())]
		);
	}
}
