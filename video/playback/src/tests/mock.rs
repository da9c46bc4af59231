use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use futures::channel::oneshot;
use futures::executor::{LocalPool, LocalSpawner};
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;

use crate::{
	EventSink, ListenerGuard, MediaEvent, MediaResource, PlayHandle, PlayRejection, PlaybackController, PlaybackError,
	PlaybackState, PlayerOptions, Scheduler, Subscription, TimeRange,
};

enum PlayOutcome {
	Ready(Result<(), PlayRejection>),
	Pending(oneshot::Receiver<Result<(), PlayRejection>>),
}

#[derive(Debug)]
pub struct MockMedia {
	pub current_time: f64,
	pub duration: f64,
	pub volume: f64,
	pub muted: bool,
	pub playback_rate: f64,
	pub buffered: Vec<TimeRange>,
}

impl Default for MockMedia {
	fn default() -> Self {
		Self {
			current_time: 0.0,
			duration: f64::NAN,
			volume: 1.0,
			muted: false,
			playback_rate: 1.0,
			buffered: Vec::new(),
		}
	}
}

/// In-memory stand-in for a video element. Events are only raised when a
/// test calls `emit`.
#[derive(Default)]
pub struct MockVideo {
	pub media: RefCell<MockMedia>,
	sink: RefCell<Option<EventSink>>,
	listening: Rc<Cell<bool>>,
	outcomes: RefCell<VecDeque<PlayOutcome>>,
	pub play_calls: Cell<usize>,
	pub pause_calls: Cell<usize>,
	pub muted_on_play: RefCell<Vec<bool>>,
	pub loads: RefCell<Vec<String>>,
}

impl MockVideo {
	pub fn new() -> Rc<Self> {
		Rc::new(Self::default())
	}

	pub fn with_duration(duration: f64) -> Rc<Self> {
		let video = Self::new();
		video.media.borrow_mut().duration = duration;
		video
	}

	pub fn queue_play(&self, outcome: Result<(), PlayRejection>) {
		self.outcomes.borrow_mut().push_back(PlayOutcome::Ready(outcome));
	}

	pub fn queue_pending_play(&self) -> oneshot::Sender<Result<(), PlayRejection>> {
		let (tx, rx) = oneshot::channel();
		self.outcomes.borrow_mut().push_back(PlayOutcome::Pending(rx));
		tx
	}

	pub fn is_listening(&self) -> bool {
		self.listening.get()
	}

	pub fn set_time(&self, time: f64) {
		self.media.borrow_mut().current_time = time;
	}

	pub fn set_duration(&self, duration: f64) {
		self.media.borrow_mut().duration = duration;
	}

	pub fn set_buffered(&self, ranges: &[(f64, f64)]) {
		self.media.borrow_mut().buffered = ranges.iter().map(|(s, e)| TimeRange::new(*s, *e)).collect();
	}

	/// Raises an event the way a registered native listener would.
	pub fn emit(&self, event: MediaEvent) {
		if self.listening.get() {
			self.emit_stale(event);
		}
	}

	/// Raises an event through the last sink even if its listener was removed,
	/// like a callback that was already queued by the platform.
	pub fn emit_stale(&self, event: MediaEvent) {
		let sink = self.sink.borrow().clone();
		if let Some(sink) = sink {
			sink(event);
		}
	}
}

impl MediaResource for MockVideo {
	fn load(&self, src: &str) {
		self.loads.borrow_mut().push(src.to_string());
		let mut media = self.media.borrow_mut();
		media.current_time = 0.0;
		media.duration = f64::NAN;
		media.buffered.clear();
	}

	fn play(&self) -> LocalBoxFuture<'static, Result<(), PlayRejection>> {
		self.play_calls.set(self.play_calls.get() + 1);
		self.muted_on_play.borrow_mut().push(self.media.borrow().muted);

		match self.outcomes.borrow_mut().pop_front() {
			Some(PlayOutcome::Pending(rx)) => Box::pin(async move {
				rx.await
					.unwrap_or_else(|_| Err(PlayRejection::Aborted("request dropped".into())))
			}),
			Some(PlayOutcome::Ready(outcome)) => Box::pin(futures::future::ready(outcome)),
			None => Box::pin(futures::future::ready(Ok(()))),
		}
	}

	fn pause(&self) {
		self.pause_calls.set(self.pause_calls.get() + 1);
	}

	fn current_time(&self) -> f64 {
		self.media.borrow().current_time
	}

	fn set_current_time(&self, time: f64) {
		self.media.borrow_mut().current_time = time;
	}

	fn duration(&self) -> f64 {
		self.media.borrow().duration
	}

	fn volume(&self) -> f64 {
		self.media.borrow().volume
	}

	fn set_volume(&self, volume: f64) {
		self.media.borrow_mut().volume = volume;
	}

	fn muted(&self) -> bool {
		self.media.borrow().muted
	}

	fn set_muted(&self, muted: bool) {
		self.media.borrow_mut().muted = muted;
	}

	fn playback_rate(&self) -> f64 {
		self.media.borrow().playback_rate
	}

	fn set_playback_rate(&self, rate: f64) {
		self.media.borrow_mut().playback_rate = rate;
	}

	fn buffered(&self) -> Vec<TimeRange> {
		self.media.borrow().buffered.clone()
	}

	fn listen(&self, sink: EventSink) -> ListenerGuard {
		*self.sink.borrow_mut() = Some(sink);
		self.listening.set(true);

		let listening = self.listening.clone();
		ListenerGuard::new(move || listening.set(false))
	}
}

/// Spawns onto a `LocalPool` and fires timers when the test advances time.
pub struct TestScheduler {
	spawner: LocalSpawner,
	now: Cell<Duration>,
	timers: RefCell<Vec<(Duration, oneshot::Sender<()>)>>,
}

impl TestScheduler {
	pub fn advance(&self, by: Duration) {
		let now = self.now.get() + by;
		self.now.set(now);

		let timers = std::mem::take(&mut *self.timers.borrow_mut());
		let (due, pending): (Vec<_>, Vec<_>) = timers.into_iter().partition(|(deadline, _)| *deadline <= now);
		*self.timers.borrow_mut() = pending;

		for (_, tx) in due {
			tx.send(()).ok();
		}
	}
}

impl Scheduler for TestScheduler {
	fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
		LocalSpawnExt::spawn_local(&self.spawner, task).expect("failed to spawn task");
	}

	fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
		let (tx, rx) = oneshot::channel();
		self.timers.borrow_mut().push((self.now.get() + duration, tx));
		Box::pin(async move {
			rx.await.ok();
		})
	}
}

pub type Seen = Rc<RefCell<Vec<(PlaybackState, Option<PlaybackError>)>>>;

pub struct Harness {
	pub pool: LocalPool,
	pub scheduler: Rc<TestScheduler>,
	pub video: Rc<MockVideo>,
	pub controller: PlaybackController,
	pub seen: Seen,
}

impl Harness {
	pub fn new(video: Rc<MockVideo>) -> Self {
		let pool = LocalPool::new();
		let scheduler = Rc::new(TestScheduler {
			spawner: pool.spawner(),
			now: Cell::new(Duration::ZERO),
			timers: RefCell::new(Vec::new()),
		});
		let controller = PlaybackController::new(scheduler.clone());

		Self {
			pool,
			scheduler,
			video,
			controller,
			seen: Rc::default(),
		}
	}

	pub fn attached(video: Rc<MockVideo>, options: PlayerOptions) -> Self {
		let harness = Self::new(video);
		harness.attach(options);
		harness
	}

	pub fn attach(&self, options: PlayerOptions) {
		self.controller.attach(self.video.clone(), options);
	}

	/// Records every notification from now on.
	pub fn record(&self) -> Subscription {
		let seen = self.seen.clone();
		self.controller
			.subscribe(move |state, error| seen.borrow_mut().push((state.clone(), error.cloned())))
	}

	pub fn run(&mut self) {
		self.pool.run_until_stalled();
	}

	pub fn run_until(&mut self, handle: PlayHandle) -> Result<(), PlaybackError> {
		self.pool.run_until(handle)
	}

	pub fn advance(&mut self, by: Duration) {
		self.scheduler.advance(by);
		self.run();
	}

	pub fn emit(&mut self, event: MediaEvent) {
		self.video.emit(event);
		self.run();
	}

	pub fn seen_count(&self) -> usize {
		self.seen.borrow().len()
	}

	pub fn last_seen(&self) -> (PlaybackState, Option<PlaybackError>) {
		self.seen.borrow().last().cloned().expect("no notifications recorded")
	}

	/// Attached, playing and with the given duration.
	pub fn playing(duration: f64, options: PlayerOptions) -> Self {
		let mut harness = Self::attached(MockVideo::with_duration(duration), options);
		let handle = harness.controller.play();
		harness.run_until(handle).expect("playback should start");
		harness
	}
}
