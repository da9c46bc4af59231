use std::rc::Rc;

use futures_util::future::LocalBoxFuture;

/// Native events a media resource reports to its controller.
///
/// Events carry no data, the controller reads the resource when it handles one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEvent {
	LoadStart,
	MetadataLoaded,
	DurationChange,
	TimeUpdate,
	Progress,
	Waiting,
	Stalled,
	CanPlay,
	Play,
	Playing,
	Pause,
	Seeking,
	Seeked,
	Ended,
	VolumeChange,
	RateChange,
	Error(MediaErrorCode),
}

/// Error codes of the platform media element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaErrorCode {
	Aborted,
	Network,
	Decode,
	SourceNotSupported,
	Unknown,
}

/// Why the platform refused a `play()` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayRejection {
	/// Autoplay policy, playback with sound needs a user gesture.
	NotAllowed(String),
	/// A pause or a new load interrupted the request.
	Aborted(String),
	/// There is no playable source.
	NotSupported(String),
	Other(String),
}

impl PlayRejection {
	pub fn message(&self) -> &str {
		match self {
			Self::NotAllowed(msg) | Self::Aborted(msg) | Self::NotSupported(msg) | Self::Other(msg) => msg,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
	pub start: f64,
	pub end: f64,
}

impl TimeRange {
	pub fn new(start: f64, end: f64) -> Self {
		Self { start, end }
	}
}

pub type EventSink = Rc<dyn Fn(MediaEvent)>;

/// Scoped listener registration. Dropping the guard removes every native
/// listener that was installed with it.
#[must_use = "listeners are removed as soon as the guard is dropped"]
pub struct ListenerGuard {
	cleanup: Option<Box<dyn FnOnce()>>,
}

impl ListenerGuard {
	pub fn new(cleanup: impl FnOnce() + 'static) -> Self {
		Self {
			cleanup: Some(Box::new(cleanup)),
		}
	}

	pub fn release(mut self) {
		if let Some(cleanup) = self.cleanup.take() {
			cleanup();
		}
	}
}

impl Drop for ListenerGuard {
	fn drop(&mut self) {
		if let Some(cleanup) = self.cleanup.take() {
			cleanup();
		}
	}
}

impl std::fmt::Debug for ListenerGuard {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ListenerGuard")
			.field("active", &self.cleanup.is_some())
			.finish()
	}
}

/// Capabilities of a platform video element.
///
/// Only the playback controller that owns a resource may call the setters.
pub trait MediaResource {
	fn load(&self, src: &str);

	/// Starts playback. The returned future resolves once the platform accepted
	/// or refused the request.
	fn play(&self) -> LocalBoxFuture<'static, Result<(), PlayRejection>>;

	fn pause(&self);

	fn current_time(&self) -> f64;
	fn set_current_time(&self, time: f64);

	/// NaN or zero while metadata is unknown.
	fn duration(&self) -> f64;

	fn volume(&self) -> f64;
	fn set_volume(&self, volume: f64);

	fn muted(&self) -> bool;
	fn set_muted(&self, muted: bool);

	fn playback_rate(&self) -> f64;
	fn set_playback_rate(&self, rate: f64);

	fn buffered(&self) -> Vec<TimeRange>;

	fn listen(&self, sink: EventSink) -> ListenerGuard;
}
