use std::time::Duration;

use futures_util::future::LocalBoxFuture;

/// Access to the host's single threaded event loop.
pub trait Scheduler {
	/// Runs `task` to completion on the current thread.
	fn spawn_local(&self, task: LocalBoxFuture<'static, ()>);

	/// Completes after `duration` has elapsed.
	fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}
