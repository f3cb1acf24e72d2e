//! Ordered subscriber registries.
//!
//! One registry type backs both listener (navigation-complete) and
//! middleware (navigation-start) registrations: an append-ordered list whose
//! iteration order is the registration order, forever. Dispatch passes read
//! a snapshot, so a handler unsubscribing itself (or a peer) mid-pass can
//! never skip or double-invoke the remaining entries of that pass.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

/// An ordered, append-only registry of shared handlers.
///
/// Entries carry a monotonically increasing id; removal is by id, so the
/// same handler value may be registered more than once and each
/// registration is released independently.
pub struct Registry<T: ?Sized> {
	entries: RwLock<Vec<(u64, Arc<T>)>>,
	next_id: AtomicU64,
}

impl<T: ?Sized> Registry<T> {
	/// Creates an empty registry.
	pub fn new() -> Arc<Self> {
		Arc::new(Self {
			entries: RwLock::new(Vec::new()),
			next_id: AtomicU64::new(1),
		})
	}

	/// Appends `item`, preserving call order for future iteration, and
	/// returns a [`Subscription`] releasing exactly this registration.
	pub fn register(self: &Arc<Self>, item: Arc<T>) -> Subscription<T> {
		let id = self.next_id.fetch_add(1, Ordering::SeqCst);
		self.entries.write().push((id, item));

		Subscription {
			registry: Arc::downgrade(self),
			id,
		}
	}

	/// Removes the entry with `id`; `false` when already gone.
	fn remove(&self, id: u64) -> bool {
		let mut entries = self.entries.write();
		let before = entries.len();
		entries.retain(|(entry_id, _)| *entry_id != id);
		entries.len() < before
	}

	/// The entries as of now, in registration order. Dispatch passes
	/// iterate this snapshot so concurrent (un)registration cannot corrupt
	/// the pass.
	pub fn snapshot(&self) -> Vec<Arc<T>> {
		self.entries
			.read()
			.iter()
			.map(|(_, item)| Arc::clone(item))
			.collect()
	}

	/// Number of live registrations.
	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	/// Whether no registrations are live.
	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}
}

/// Handle releasing one registration.
///
/// Dropping the handle does **not** unsubscribe; releasing is always an
/// explicit [`Subscription::unsubscribe`] call, which is idempotent.
pub struct Subscription<T: ?Sized> {
	registry: Weak<Registry<T>>,
	id: u64,
}

impl<T: ?Sized> Subscription<T> {
	/// Removes this registration from its registry. Returns `true` the
	/// first time, `false` on every later call (or after the registry
	/// itself was dropped).
	///
	/// Removal is by registration id, not by handler value: when the same
	/// handler is registered more than once, this releases exactly the
	/// occurrence this handle was issued for, and any duplicate keeps its
	/// own position in the order. Value-based schemes that remove the most
	/// recently added equal occurrence would instead shift a surviving
	/// duplicate toward the released slot.
	pub fn unsubscribe(&self) -> bool {
		self.registry
			.upgrade()
			.map(|registry| registry.remove(self.id))
			.unwrap_or(false)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn snapshot_preserves_registration_order() {
		let registry: Arc<Registry<str>> = Registry::new();
		registry.register(Arc::from("first"));
		registry.register(Arc::from("second"));
		registry.register(Arc::from("third"));

		let snapshot = registry.snapshot();
		let order: Vec<&str> = snapshot.iter().map(|s| &**s).collect();
		assert_eq!(order, ["first", "second", "third"]);
	}

	#[test]
	fn unsubscribe_is_idempotent() {
		let registry: Arc<Registry<str>> = Registry::new();
		let sub = registry.register(Arc::from("only"));

		assert!(sub.unsubscribe());
		assert!(!sub.unsubscribe());
		assert!(registry.is_empty());
	}

	#[test]
	fn duplicate_registrations_release_independently() {
		let registry: Arc<Registry<str>> = Registry::new();
		let item: Arc<str> = Arc::from("dup");
		let first = registry.register(Arc::clone(&item));
		let second = registry.register(Arc::clone(&item));

		assert_eq!(registry.len(), 2);
		assert!(second.unsubscribe());
		assert_eq!(registry.len(), 1);
		assert!(first.unsubscribe());
		assert!(registry.is_empty());
	}

	#[test]
	fn removal_does_not_perturb_relative_order() {
		let registry: Arc<Registry<str>> = Registry::new();
		registry.register(Arc::from("a"));
		let middle = registry.register(Arc::from("b"));
		registry.register(Arc::from("c"));

		middle.unsubscribe();
		let snapshot = registry.snapshot();
		let order: Vec<&str> = snapshot.iter().map(|s| &**s).collect();
		assert_eq!(order, ["a", "c"]);
	}

	#[test]
	fn releasing_an_earlier_duplicate_keeps_the_later_position() {
		let registry: Arc<Registry<str>> = Registry::new();
		let item: Arc<str> = Arc::from("dup");
		let first = registry.register(Arc::clone(&item));
		registry.register(Arc::from("other"));
		registry.register(Arc::clone(&item));

		// The surviving duplicate stays where it was registered, after
		// "other"; it does not slide into the released slot.
		first.unsubscribe();
		let snapshot = registry.snapshot();
		let order: Vec<&str> = snapshot.iter().map(|s| &**s).collect();
		assert_eq!(order, ["other", "dup"]);
	}

	#[test]
	fn snapshot_is_immune_to_later_removal() {
		let registry: Arc<Registry<str>> = Registry::new();
		registry.register(Arc::from("a"));
		let sub = registry.register(Arc::from("b"));

		let snapshot = registry.snapshot();
		sub.unsubscribe();
		assert_eq!(snapshot.len(), 2);
		assert_eq!(registry.len(), 1);
	}

	#[test]
	fn unsubscribe_after_registry_drop_is_a_noop() {
		let registry: Arc<Registry<str>> = Registry::new();
		let sub = registry.register(Arc::from("a"));
		drop(registry);
		assert!(!sub.unsubscribe());
	}
}
