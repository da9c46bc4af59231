use crate::util::{clamp_unit, snap_playback_rate};

#[derive(Debug, Default, serde::Deserialize, serde::Serialize, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "tsify", derive(tsify::Tsify))]
#[serde(rename_all = "lowercase")]
pub enum LoggingLevel {
	#[default]
	Info,
	Trace,
	Debug,
	Warn,
	Error,
}

/// Options accepted when a resource is attached.
///
/// Every field is optional and unknown keys are ignored.
#[derive(Debug, Default, Clone, serde::Deserialize)]
#[cfg_attr(feature = "tsify", derive(tsify::Tsify))]
#[serde(rename_all = "camelCase")]
pub struct PlayerOptions {
	/// Restart from the beginning when playback ends.
	/// Defaults to false.
	#[cfg_attr(feature = "tsify", tsify(optional))]
	#[serde(default, rename = "loop")]
	pub looping: Option<bool>,

	/// Start muted.
	/// Defaults to false.
	#[cfg_attr(feature = "tsify", tsify(optional))]
	#[serde(default)]
	pub muted: Option<bool>,

	/// Initial volume, clamped to [0, 1].
	/// Defaults to 1.0
	#[cfg_attr(feature = "tsify", tsify(optional))]
	#[serde(default)]
	pub volume: Option<f64>,

	/// Initial playback rate, snapped to the nearest allowed rate.
	/// Defaults to 1.0
	#[cfg_attr(feature = "tsify", tsify(optional))]
	#[serde(default)]
	pub playback_rate: Option<f64>,

	/// Request playback as soon as the resource is attached.
	/// Defaults to false.
	#[cfg_attr(feature = "tsify", tsify(optional))]
	#[serde(default)]
	pub auto_play: Option<bool>,

	/// The max time that the player can be buffering before a network stall is reported.
	/// Defaults to 8000ms
	#[cfg_attr(feature = "tsify", tsify(optional))]
	#[serde(default)]
	pub buffering_timeout_ms: Option<f64>,

	/// The logging level to use for the player.
	/// Defaults to "info"
	#[cfg_attr(feature = "tsify", tsify(optional))]
	#[serde(default)]
	pub logging_level: Option<LoggingLevel>,
}

macro_rules! if_set {
	($value:ident => $target:ident { $($i:ident),* }) => {
		{
			$(
				if let Some($i) = $value.$i {
					$target.$i = $i;
				}
			)*
		}
	};
}

impl From<PlayerOptions> for PlayerOptionsParsed {
	fn from(value: PlayerOptions) -> Self {
		let mut target = Self::default();

		if_set!(value => target {
			looping,
			muted,
			volume,
			playback_rate,
			auto_play,
			buffering_timeout_ms,
			logging_level
		});

		target.normalize()
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerOptionsParsed {
	pub looping: bool,
	pub muted: bool,
	pub volume: f64,
	pub playback_rate: f64,
	pub auto_play: bool,
	pub buffering_timeout_ms: f64,
	pub logging_level: LoggingLevel,
}

impl Default for PlayerOptionsParsed {
	fn default() -> Self {
		Self {
			looping: false,
			muted: false,
			volume: 1.0,
			playback_rate: 1.0,
			auto_play: false,
			buffering_timeout_ms: 8000.0,
			logging_level: LoggingLevel::Info,
		}
	}
}

impl PlayerOptionsParsed {
	/// Brings user supplied values into the ranges the controller maintains.
	fn normalize(mut self) -> Self {
		self.volume = if self.volume.is_nan() { 1.0 } else { clamp_unit(self.volume) };
		self.playback_rate = snap_playback_rate(self.playback_rate);
		if !(self.buffering_timeout_ms.is_finite() && self.buffering_timeout_ms > 0.0) {
			self.buffering_timeout_ms = Self::default().buffering_timeout_ms;
		}
		// A silent start is a muted start.
		self.muted |= self.volume == 0.0;
		self
	}

	pub fn buffering_timeout(&self) -> std::time::Duration {
		std::time::Duration::from_secs_f64(self.buffering_timeout_ms / 1000.0)
	}

	pub fn logging_level(&self) -> tracing::Level {
		match self.logging_level {
			LoggingLevel::Info => tracing::Level::INFO,
			LoggingLevel::Trace => tracing::Level::TRACE,
			LoggingLevel::Debug => tracing::Level::DEBUG,
			LoggingLevel::Warn => tracing::Level::WARN,
			LoggingLevel::Error => tracing::Level::ERROR,
		}
	}
}
