use std::cell::{Cell, RefCell};
use std::rc::Rc;

use video_player_types::{ErrorKind, PlaybackState, PlaybackStatus};

use crate::resource::{ListenerGuard, MediaResource};
use crate::settings::PlayerOptionsParsed;
use crate::util::progress_percent;

/// `RefCell` that remembers where it was last borrowed, so a conflicting
/// borrow can be traced back to its origin.
pub(crate) struct ControllerInnerCell {
	inner: RefCell<ControllerInner>,
	location: Cell<Option<&'static std::panic::Location<'static>>>,
}

impl ControllerInnerCell {
	pub fn new(inner: ControllerInner) -> Self {
		Self {
			inner: RefCell::new(inner),
			location: Cell::new(None),
		}
	}

	#[track_caller]
	pub fn borrow(&self) -> std::cell::Ref<'_, ControllerInner> {
		let borrow = self
			.inner
			.try_borrow()
			.map_err(|err| {
				tracing::error!(
					"Failed to borrow controller inner\nPrevious borrow location: {:?}\nNew Location: {:?}",
					self.location.get(),
					std::panic::Location::caller()
				);
				err
			})
			.expect("failed to borrow controller inner");

		self.location.set(Some(std::panic::Location::caller()));

		borrow
	}

	#[track_caller]
	pub fn borrow_mut(&self) -> std::cell::RefMut<'_, ControllerInner> {
		let borrow = self
			.inner
			.try_borrow_mut()
			.map_err(|err| {
				tracing::error!(
					"Failed to borrow controller inner\nPrevious borrow location: {:?}\nNew Location: {:?}",
					self.location.get(),
					std::panic::Location::caller()
				);
				err
			})
			.expect("failed to borrow controller inner");

		self.location.set(Some(std::panic::Location::caller()));

		borrow
	}
}

pub(crate) struct Attached {
	pub resource: Rc<dyn MediaResource>,
	pub listeners: ListenerGuard,
	pub source: Option<String>,
}

/// Playback state owned by one controller.
///
/// Counters:
/// - `generation` changes on every attach and detach. Listeners and tasks
///   created for an older generation are ignored.
/// - `play_epoch` changes on pause and load, a play request resolving in a
///   later epoch does not touch the state.
/// - `buffering_epoch` changes whenever the buffering flag flips, the stall
///   watchdog only fires for the epoch it was armed in.
pub(crate) struct ControllerInner {
	pub attached: Option<Attached>,
	pub options: PlayerOptionsParsed,
	pub status: PlaybackStatus,
	pub buffering: bool,
	pub current_time: f64,
	pub duration: f64,
	pub volume: f64,
	pub muted: bool,
	pub playback_rate: f64,
	pub buffered_fraction: f64,
	pub error: Option<ErrorKind>,
	pub generation: u64,
	pub play_epoch: u64,
	pub buffering_epoch: u64,
	pub seek_pending: bool,
	pub buffer_reset: bool,
	pub published: Option<PlaybackState>,
}

impl Default for ControllerInner {
	fn default() -> Self {
		let options = PlayerOptionsParsed::default();

		Self {
			attached: None,
			status: PlaybackStatus::Idle,
			buffering: false,
			current_time: 0.0,
			duration: 0.0,
			volume: options.volume,
			muted: options.muted,
			playback_rate: options.playback_rate,
			buffered_fraction: 0.0,
			error: None,
			generation: 0,
			play_epoch: 0,
			buffering_epoch: 0,
			seek_pending: false,
			buffer_reset: false,
			published: None,
			options,
		}
	}
}

impl ControllerInner {
	pub fn resource(&self) -> Option<Rc<dyn MediaResource>> {
		self.attached.as_ref().map(|a| a.resource.clone())
	}

	pub fn has_duration(&self) -> bool {
		self.duration.is_finite() && self.duration > 0.0
	}

	pub fn is_playing(&self) -> bool {
		self.status == PlaybackStatus::Playing && !self.buffering
	}

	pub fn set_buffering(&mut self, buffering: bool) {
		if self.buffering != buffering {
			self.buffering = buffering;
			self.buffering_epoch += 1;
		}
	}

	/// Clears everything that belongs to the previous source.
	pub fn reset_media(&mut self) {
		self.set_buffering(false);
		self.current_time = 0.0;
		self.duration = 0.0;
		self.buffered_fraction = 0.0;
		self.error = None;
		self.seek_pending = false;
		self.buffer_reset = false;
	}

	pub fn snapshot(&self) -> PlaybackState {
		PlaybackState {
			status: self.status,
			current_time: self.current_time,
			duration: self.duration,
			progress: progress_percent(self.current_time, self.duration),
			is_playing: self.is_playing(),
			is_buffering: self.buffering,
			volume: self.volume,
			muted: self.muted,
			playback_rate: self.playback_rate,
			buffered_fraction: self.buffered_fraction,
			error: self.error,
		}
	}
}
