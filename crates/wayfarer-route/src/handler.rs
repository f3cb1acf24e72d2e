//! Navigation handler abstractions.
//!
//! One trait serves both registration points of a [`crate::Route`]:
//! middleware (navigation-start, with veto power) and listeners
//! (navigation-complete, whose [`Flow`] result is ignored). Handlers are
//! invoked strictly in registration order and each is awaited before the
//! next starts.
//!
//! Most call sites want plain closures rather than trait impls; the
//! `*_fn` adapters wrap sync and async closures into `Arc<dyn
//! NavigationHandler>`.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::NavigationError;
use crate::history::NavigationMode;

/// A middleware's verdict on a pending transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
	/// Let the dispatch proceed to the next handler.
	Continue,
	/// Abort the dispatch: nothing commits, no listener runs, no error is
	/// raised.
	Veto,
}

/// A navigation-start or navigation-complete handler.
#[async_trait]
pub trait NavigationHandler: Send + Sync {
	/// Observes (and, as middleware, may veto) a transition from `prev` to
	/// `next`. `mode` is `None` for transitions that leave the history
	/// stack untouched.
	///
	/// # Errors
	///
	/// An error aborts the dispatch and propagates to the dispatch caller;
	/// for listeners this happens after the href has already committed.
	async fn handle(
		&self,
		next: &str,
		prev: &str,
		mode: Option<NavigationMode>,
	) -> Result<Flow, NavigationError>;
}

/// Wraps a synchronous `Fn(next, prev, mode) -> Flow` closure.
struct FnHandler<F> {
	handler: F,
}

#[async_trait]
impl<F> NavigationHandler for FnHandler<F>
where
	F: Fn(&str, &str, Option<NavigationMode>) -> Flow + Send + Sync,
{
	async fn handle(
		&self,
		next: &str,
		prev: &str,
		mode: Option<NavigationMode>,
	) -> Result<Flow, NavigationError> {
		Ok((self.handler)(next, prev, mode))
	}
}

/// Wraps a synchronous observer closure with no verdict.
struct FnListener<F> {
	listener: F,
}

#[async_trait]
impl<F> NavigationHandler for FnListener<F>
where
	F: Fn(&str, &str, Option<NavigationMode>) + Send + Sync,
{
	async fn handle(
		&self,
		next: &str,
		prev: &str,
		mode: Option<NavigationMode>,
	) -> Result<Flow, NavigationError> {
		(self.listener)(next, prev, mode);
		Ok(Flow::Continue)
	}
}

/// Boxed-future form backing the async closure adapters.
type AsyncHandlerFn = Box<
	dyn Fn(String, String, Option<NavigationMode>) -> BoxFuture<'static, Result<Flow, NavigationError>>
		+ Send
		+ Sync,
>;

struct AsyncFnHandler {
	handler: AsyncHandlerFn,
}

#[async_trait]
impl NavigationHandler for AsyncFnHandler {
	async fn handle(
		&self,
		next: &str,
		prev: &str,
		mode: Option<NavigationMode>,
	) -> Result<Flow, NavigationError> {
		(self.handler)(next.to_string(), prev.to_string(), mode).await
	}
}

/// Adapts a synchronous veto-capable closure into a handler.
pub fn handler_fn<F>(handler: F) -> Arc<dyn NavigationHandler>
where
	F: Fn(&str, &str, Option<NavigationMode>) -> Flow + Send + Sync + 'static,
{
	Arc::new(FnHandler { handler })
}

/// Adapts a synchronous observer closure into a listener handler.
pub fn listener_fn<F>(listener: F) -> Arc<dyn NavigationHandler>
where
	F: Fn(&str, &str, Option<NavigationMode>) + Send + Sync + 'static,
{
	Arc::new(FnListener { listener })
}

/// Adapts an async veto-capable closure into a handler.
pub fn async_handler_fn<F, Fut>(handler: F) -> Arc<dyn NavigationHandler>
where
	F: Fn(String, String, Option<NavigationMode>) -> Fut + Send + Sync + 'static,
	Fut: std::future::Future<Output = Result<Flow, NavigationError>> + Send + 'static,
{
	Arc::new(AsyncFnHandler {
		handler: Box::new(move |next, prev, mode| Box::pin(handler(next, prev, mode))),
	})
}

/// Adapts an async observer closure into a listener handler.
pub fn async_listener_fn<F, Fut>(listener: F) -> Arc<dyn NavigationHandler>
where
	F: Fn(String, String, Option<NavigationMode>) -> Fut + Send + Sync + 'static,
	Fut: std::future::Future<Output = Result<(), NavigationError>> + Send + 'static,
{
	Arc::new(AsyncFnHandler {
		handler: Box::new(move |next, prev, mode| {
			let fut = listener(next, prev, mode);
			Box::pin(async move {
				fut.await?;
				Ok(Flow::Continue)
			})
		}),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn sync_handler_passes_its_verdict_through() {
		let veto = handler_fn(|_, _, _| Flow::Veto);
		assert_eq!(veto.handle("/b", "/a", None).await.unwrap(), Flow::Veto);

		let pass = handler_fn(|_, _, _| Flow::Continue);
		assert_eq!(pass.handle("/b", "/a", None).await.unwrap(), Flow::Continue);
	}

	#[test]
	fn listener_always_continues() {
		let listener = listener_fn(|_, _, _| {});
		let verdict = tokio_test::block_on(listener.handle("/b", "/a", None));
		assert_eq!(verdict.unwrap(), Flow::Continue);
	}

	#[tokio::test]
	async fn async_handler_sees_the_transition() {
		let handler = async_handler_fn(|next, prev, mode| async move {
			assert_eq!(next, "/b");
			assert_eq!(prev, "/a");
			assert_eq!(mode, Some(NavigationMode::Assign));
			Ok(Flow::Continue)
		});
		handler
			.handle("/b", "/a", Some(NavigationMode::Assign))
			.await
			.unwrap();
	}

	#[tokio::test]
	async fn async_listener_errors_propagate() {
		let listener =
			async_listener_fn(|_, _, _| async { Err(NavigationError::handler_msg("boom")) });
		let err = listener.handle("/b", "/a", None).await.unwrap_err();
		assert!(err.to_string().contains("boom"));
	}
}
