use std::rc::{Rc, Weak};

use video_player_types::{PlaybackError, PlaybackState, PlaybackStatus};

use self::inner::{Attached, ControllerInner, ControllerInnerCell};
use crate::events::{EventManager, Subscription};
use crate::resource::{EventSink, MediaEvent, MediaResource};
use crate::scheduler::Scheduler;
use crate::settings::{PlayerOptions, PlayerOptionsParsed};
use crate::util::{clamp_time, clamp_unit, snap_playback_rate, Mailbox};

mod handles;
mod inner;
mod play;

pub use self::play::PlayHandle;

struct Shared {
	inner: ControllerInnerCell,
	events: Rc<EventManager>,
	media_events: Mailbox<(u64, MediaEvent)>,
	scheduler: Rc<dyn Scheduler>,
}

/// Single authority over one video resource.
///
/// Every UI surface that touches the video goes through the same controller:
/// commands mutate the resource, native events flow back in and are the only
/// source of derived state. Subscribers are called synchronously on every
/// state change.
///
/// The controller never holds its internal borrow while calling into the
/// resource or a subscriber, so both may call back into it.
#[derive(Clone)]
pub struct PlaybackController {
	shared: Rc<Shared>,
}

impl PlaybackController {
	pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
		Self {
			shared: Rc::new(Shared {
				inner: ControllerInnerCell::new(ControllerInner::default()),
				events: Rc::new(EventManager::new()),
				media_events: Mailbox::default(),
				scheduler,
			}),
		}
	}

	fn upgrade(weak: &Weak<Shared>) -> Option<Self> {
		weak.upgrade().map(|shared| Self { shared })
	}

	/// Binds the controller to `resource`, replacing any resource attached
	/// before. Subscribers are kept when a resource is replaced.
	pub fn attach(&self, resource: Rc<dyn MediaResource>, options: PlayerOptions) {
		if let Some(previous) = self.release_resource() {
			tracing::debug!("replacing attached resource");
			previous.listeners.release();
			previous.resource.pause();
		}

		let options = PlayerOptionsParsed::from(options);

		resource.set_volume(options.volume);
		resource.set_muted(options.muted);
		resource.set_playback_rate(options.playback_rate);

		let generation = {
			let mut inner = self.shared.inner.borrow_mut();
			inner.generation += 1;
			inner.generation
		};

		let sink: EventSink = {
			let weak = Rc::downgrade(&self.shared);
			Rc::new(move |event| {
				if let Some(controller) = Self::upgrade(&weak) {
					controller.dispatch_media_event(generation, event);
				}
			})
		};

		let listeners = resource.listen(sink);
		let duration = resource.duration();
		let current_time = resource.current_time();
		let auto_play = options.auto_play;

		{
			let mut inner = self.shared.inner.borrow_mut();
			inner.reset_media();
			if duration.is_finite() && duration > 0.0 {
				inner.duration = duration;
				inner.current_time = clamp_time(current_time, duration);
				inner.status = PlaybackStatus::Ready;
			} else {
				inner.status = PlaybackStatus::Loading;
			}
			inner.volume = options.volume;
			inner.muted = options.muted;
			inner.playback_rate = options.playback_rate;
			inner.options = options;
			inner.attached = Some(Attached {
				resource,
				listeners,
				source: None,
			});

			tracing::debug!(generation, status = ?inner.status, "attached resource");
		}

		self.publish(None);

		if auto_play {
			drop(self.play());
		}
	}

	/// Releases the resource: listeners are removed, playback is paused and
	/// every subscription is dropped. Pending play requests resolve without
	/// touching the state.
	pub fn detach(&self) {
		self.shared.events.clear();
		self.shared.media_events.clear();

		if let Some(attached) = self.release_resource() {
			attached.listeners.release();
			attached.resource.pause();
			tracing::debug!("detached resource");
		}
	}

	fn release_resource(&self) -> Option<Attached> {
		let mut inner = self.shared.inner.borrow_mut();
		let attached = inner.attached.take()?;

		let generation = inner.generation + 1;
		let play_epoch = inner.play_epoch + 1;
		let buffering_epoch = inner.buffering_epoch + 1;
		*inner = ControllerInner {
			generation,
			play_epoch,
			buffering_epoch,
			..Default::default()
		};

		Some(attached)
	}

	pub fn is_attached(&self) -> bool {
		self.shared.inner.borrow().attached.is_some()
	}

	pub fn options(&self) -> PlayerOptionsParsed {
		self.shared.inner.borrow().options.clone()
	}

	/// The source most recently loaded through [`Self::load`].
	pub fn source(&self) -> Option<String> {
		self.shared
			.inner
			.borrow()
			.attached
			.as_ref()
			.and_then(|a| a.source.clone())
	}

	pub fn state(&self) -> PlaybackState {
		self.shared.inner.borrow().snapshot()
	}

	pub fn subscribe(&self, f: impl Fn(&PlaybackState, Option<&PlaybackError>) + 'static) -> Subscription {
		let id = self.shared.events.add_listener(Rc::new(f));
		Subscription::new(id, &self.shared.events)
	}

	pub fn subscriber_count(&self) -> usize {
		self.shared.events.len()
	}

	pub fn pause(&self) {
		let resource = {
			let mut inner = self.shared.inner.borrow_mut();
			inner.play_epoch += 1;
			inner.resource()
		};

		let Some(resource) = resource else {
			tracing::warn!("pause ignored, no resource attached");
			return;
		};

		tracing::debug!("requesting pause");
		resource.pause();
	}

	/// Pauses when playing, otherwise requests playback.
	pub fn toggle_play(&self) -> Option<PlayHandle> {
		if self.shared.inner.borrow().status == PlaybackStatus::Playing {
			self.pause();
			None
		} else {
			Some(self.play())
		}
	}

	/// Moves playback to `time`, clamped to `[0, duration]`. Before the duration
	/// is known every seek lands on zero. NaN is ignored.
	pub fn seek(&self, time: f64) {
		if time.is_nan() {
			tracing::warn!("ignoring NaN seek");
			return;
		}

		let (resource, target) = {
			let mut inner = self.shared.inner.borrow_mut();
			let Some(resource) = inner.resource() else {
				tracing::warn!(time, "seek ignored, no resource attached");
				return;
			};

			if inner.status.is_errored() {
				tracing::warn!(time, "seek ignored while errored");
				return;
			}

			if !inner.has_duration() {
				tracing::debug!(time, "seek before the duration is known, clamping to 0");
			}

			let target = clamp_time(time, inner.duration);
			inner.current_time = target;
			inner.seek_pending = true;
			inner.buffer_reset = true;
			if inner.status == PlaybackStatus::Ended && target < inner.duration {
				inner.status = PlaybackStatus::Paused;
			}

			(resource, target)
		};

		tracing::debug!(target, "seeking");
		resource.set_current_time(target);
		self.publish(None);
	}

	/// Seeks to the start and requests playback.
	pub fn restart(&self) -> PlayHandle {
		self.seek(0.0);
		self.play()
	}

	pub fn toggle_mute(&self) {
		let muted = !self.shared.inner.borrow().muted;
		self.apply_muted(muted);
	}

	fn apply_muted(&self, muted: bool) {
		let resource = {
			let mut inner = self.shared.inner.borrow_mut();
			let Some(resource) = inner.resource() else {
				tracing::warn!("mute ignored, no resource attached");
				return;
			};
			inner.muted = muted;
			resource
		};

		resource.set_muted(muted);
		self.publish(None);
	}

	/// Stores `volume` clamped to `[0, 1]`. A volume of zero mutes, any other
	/// volume unmutes.
	pub fn set_volume(&self, volume: f64) {
		if volume.is_nan() {
			tracing::warn!("ignoring NaN volume");
			return;
		}

		let volume = clamp_unit(volume);
		let resource = {
			let mut inner = self.shared.inner.borrow_mut();
			let Some(resource) = inner.resource() else {
				tracing::warn!(volume, "volume ignored, no resource attached");
				return;
			};
			inner.volume = volume;
			inner.muted = volume == 0.0;
			resource
		};

		resource.set_volume(volume);
		resource.set_muted(volume == 0.0);
		self.publish(None);
	}

	/// Stores the allowed rate nearest to `rate`.
	pub fn set_playback_rate(&self, rate: f64) {
		let rate = snap_playback_rate(rate);
		let resource = {
			let mut inner = self.shared.inner.borrow_mut();
			let Some(resource) = inner.resource() else {
				tracing::warn!(rate, "playback rate ignored, no resource attached");
				return;
			};
			inner.playback_rate = rate;
			resource
		};

		resource.set_playback_rate(rate);
		self.publish(None);
	}

	/// Points the attached resource at a new source. Time, duration and
	/// buffering progress start over and any error is cleared.
	pub fn load(&self, src: &str) {
		let (resource, auto_play) = {
			let mut inner = self.shared.inner.borrow_mut();
			let Some(resource) = inner.resource() else {
				tracing::warn!(src, "load ignored, no resource attached");
				return;
			};

			inner.play_epoch += 1;
			inner.reset_media();
			inner.status = PlaybackStatus::Loading;
			if let Some(attached) = inner.attached.as_mut() {
				attached.source = Some(src.to_string());
			}

			(resource, inner.options.auto_play)
		};

		tracing::debug!(src, "loading source");
		resource.load(src);
		self.publish(None);

		if auto_play {
			drop(self.play());
		}
	}

	/// Reloads after an error. The resource stays attached across errors so it
	/// is reused here.
	pub fn retry_load(&self, src: &str) {
		tracing::info!(src, error = ?self.shared.inner.borrow().error, "retrying load");
		self.load(src);
	}

	/// Notifies subscribers if the derived state changed or an error is being
	/// reported.
	fn publish(&self, error: Option<PlaybackError>) {
		let state = {
			let mut inner = self.shared.inner.borrow_mut();
			let state = inner.snapshot();
			if error.is_none() && inner.published.as_ref() == Some(&state) {
				return;
			}
			inner.published = Some(state.clone());
			state
		};

		if let Some(error) = &error {
			tracing::error!(kind = %error.kind, "{}", error.message);
		} else {
			tracing::trace!(status = ?state.status, time = state.current_time, "state changed");
		}

		self.shared.events.emit(state, error);
	}
}

impl std::fmt::Debug for PlaybackController {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PlaybackController")
			.field("state", &self.state())
			.field("events", &self.shared.events)
			.finish()
	}
}
