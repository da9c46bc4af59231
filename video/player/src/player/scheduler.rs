use std::time::Duration;

use futures_util::future::LocalBoxFuture;
use tracing::instrument::WithSubscriber;
use video_playback::Scheduler;

use crate::tracing_wasm::PlayerLogLevel;

/// Runs controller tasks on the browser's microtask queue and timers.
///
/// Tasks log through the player's own level, not the global subscriber.
#[derive(Debug, Default, Clone)]
pub struct BrowserScheduler {
	log_level: PlayerLogLevel,
}

impl BrowserScheduler {
	pub fn new(log_level: PlayerLogLevel) -> Self {
		Self { log_level }
	}
}

impl Scheduler for BrowserScheduler {
	fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
		wasm_bindgen_futures::spawn_local(task.with_subscriber(self.log_level.dispatch()));
	}

	fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
		Box::pin(gloo_timers::future::sleep(duration))
	}
}
