//! Listener and middleware registration semantics as observed through a
//! live route: ordering, idempotent release, and mid-dispatch mutation.

use std::sync::Arc;

use parking_lot::Mutex;
use wayfarer_route::{
	Flow, MemoryHistory, NavigationHandler, Route, Subscription, handler_fn, listener_fn,
};

type SubscriptionSlot = Arc<Mutex<Option<Subscription<dyn NavigationHandler>>>>;

#[tokio::test]
async fn listeners_run_in_registration_order() {
	let history = Arc::new(MemoryHistory::new("https://x/a"));
	let route = Route::new(history).await.unwrap();

	let log: Arc<Mutex<Vec<&str>>> = Arc::new(Mutex::new(Vec::new()));
	for name in ["one", "two", "three"] {
		let log = Arc::clone(&log);
		route.subscribe(listener_fn(move |_, _, _| {
			log.lock().push(name);
		}));
	}

	route.assign("/b").await.unwrap();

	assert_eq!(*log.lock(), ["one", "two", "three"]);
}

#[tokio::test]
async fn unsubscribed_listener_is_never_invoked() {
	let history = Arc::new(MemoryHistory::new("https://x/a"));
	let route = Route::new(history).await.unwrap();

	let fired: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
	let log = Arc::clone(&fired);
	let subscription = route.subscribe(listener_fn(move |next, _, _| {
		log.lock().push(next.to_string());
	}));

	assert!(subscription.unsubscribe());
	assert!(!subscription.unsubscribe());

	route.assign("/b").await.unwrap();

	assert!(fired.lock().is_empty());
}

#[tokio::test]
async fn self_unsubscribe_mid_dispatch_spares_the_running_pass() {
	let history = Arc::new(MemoryHistory::new("https://x/a"));
	let route = Route::new(history).await.unwrap();

	let log: Arc<Mutex<Vec<&str>>> = Arc::new(Mutex::new(Vec::new()));

	let first = Arc::clone(&log);
	route.subscribe(listener_fn(move |_, _, _| {
		first.lock().push("first");
	}));

	// The middle listener releases itself on its first invocation. The
	// pass iterates a snapshot, so the third listener still runs.
	let slot: SubscriptionSlot = Arc::new(Mutex::new(None));
	let own = Arc::clone(&slot);
	let second = Arc::clone(&log);
	let subscription = route.subscribe(listener_fn(move |_, _, _| {
		second.lock().push("second");
		if let Some(subscription) = own.lock().as_ref() {
			subscription.unsubscribe();
		}
	}));
	*slot.lock() = Some(subscription);

	let third = Arc::clone(&log);
	route.subscribe(listener_fn(move |_, _, _| {
		third.lock().push("third");
	}));

	route.assign("/b").await.unwrap();
	assert_eq!(*log.lock(), ["first", "second", "third"]);

	route.assign("/c").await.unwrap();
	assert_eq!(*log.lock(), ["first", "second", "third", "first", "third"]);
}

#[tokio::test]
async fn same_listener_registered_twice_fires_twice() {
	let history = Arc::new(MemoryHistory::new("https://x/a"));
	let route = Route::new(history).await.unwrap();

	let count: Arc<Mutex<usize>> = Arc::new(Mutex::new(0));
	let counter = Arc::clone(&count);
	let listener = listener_fn(move |_, _, _| {
		*counter.lock() += 1;
	});

	let first = route.subscribe(Arc::clone(&listener));
	let _second = route.subscribe(listener);

	route.assign("/b").await.unwrap();
	assert_eq!(*count.lock(), 2);

	// Each registration releases independently.
	first.unsubscribe();
	route.assign("/c").await.unwrap();
	assert_eq!(*count.lock(), 3);
}

#[tokio::test]
async fn released_middleware_loses_its_veto() {
	let history = Arc::new(MemoryHistory::new("https://x/a"));
	let route = Route::new(history).await.unwrap();

	let gate = route.use_middleware(handler_fn(|_, _, _| Flow::Veto));

	route.assign("/b").await.unwrap();
	assert_eq!(route.href(), "/a");

	gate.unsubscribe();

	route.assign("/b").await.unwrap();
	assert_eq!(route.href(), "/b");
}

#[tokio::test]
async fn dropping_a_subscription_keeps_the_registration() {
	let history = Arc::new(MemoryHistory::new("https://x/a"));
	let route = Route::new(history).await.unwrap();

	let count: Arc<Mutex<usize>> = Arc::new(Mutex::new(0));
	let counter = Arc::clone(&count);
	let subscription = route.subscribe(listener_fn(move |_, _, _| {
		*counter.lock() += 1;
	}));
	drop(subscription);

	route.assign("/b").await.unwrap();
	assert_eq!(*count.lock(), 1);
}
