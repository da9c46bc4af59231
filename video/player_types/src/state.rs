use crate::ErrorKind;

/// Lifecycle of a single attached video resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
	/// No resource is attached.
	#[default]
	Idle,
	/// A source is attached but its metadata (duration) is not known yet.
	Loading,
	/// Metadata is known and playback has not started.
	Ready,
	Playing,
	Paused,
	/// Playback reached the end and `loop` is disabled.
	Ended,
	/// Terminal until the source is reloaded.
	Errored,
}

impl PlaybackStatus {
	pub fn is_errored(&self) -> bool {
		matches!(self, Self::Errored)
	}

	/// True once the resource reported its duration.
	pub fn has_metadata(&self) -> bool {
		matches!(self, Self::Ready | Self::Playing | Self::Paused | Self::Ended)
	}
}

/// Snapshot of everything a UI surface may render about one video.
///
/// Produced exclusively by the playback controller. `duration` is `0.0` while
/// metadata is unknown, so `progress` is `0.0` as well.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
	pub status: PlaybackStatus,
	/// Seconds, within `[0, duration]` once the duration is known.
	pub current_time: f64,
	/// Seconds.
	pub duration: f64,
	/// Percentage in `[0, 100]`.
	pub progress: f64,
	pub is_playing: bool,
	pub is_buffering: bool,
	pub volume: f64,
	pub muted: bool,
	pub playback_rate: f64,
	/// Fraction of the duration available contiguously from the start.
	pub buffered_fraction: f64,
	/// Kind of the error that moved the player into [`PlaybackStatus::Errored`].
	pub error: Option<ErrorKind>,
}

impl Default for PlaybackState {
	fn default() -> Self {
		Self {
			status: PlaybackStatus::Idle,
			current_time: 0.0,
			duration: 0.0,
			progress: 0.0,
			is_playing: false,
			is_buffering: false,
			volume: 1.0,
			muted: false,
			playback_rate: 1.0,
			buffered_fraction: 0.0,
			error: None,
		}
	}
}

impl PlaybackState {
	pub fn remaining(&self) -> f64 {
		(self.duration - self.current_time).max(0.0)
	}

	pub fn has_duration(&self) -> bool {
		self.duration.is_finite() && self.duration > 0.0
	}
}
