use std::collections::HashSet;

use video_player_types::AnnotationWindow;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WindowError {
	#[error("duplicate window id: {0}")]
	DuplicateId(String),
	#[error("window {id} has non-finite bounds")]
	NonFinite { id: String },
	#[error("window {id} ends at {time_out} which is not after its start {time_in}")]
	Inverted { id: String, time_in: f64, time_out: f64 },
}

/// Every window whose closed interval contains `time`, in input order.
///
/// Negative or NaN times happen before metadata is loaded and match nothing.
pub fn active_at<P>(time: f64, windows: &[AnnotationWindow<P>]) -> Vec<&AnnotationWindow<P>> {
	if time.is_nan() || time < 0.0 {
		return Vec::new();
	}

	windows.iter().filter(|window| window.contains(time)).collect()
}

/// A validated set of annotation windows over one video.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeWindowIndex<P = ()> {
	windows: Vec<AnnotationWindow<P>>,
}

impl<P> TimeWindowIndex<P> {
	pub fn new(windows: Vec<AnnotationWindow<P>>) -> Result<Self, WindowError> {
		let mut ids = HashSet::with_capacity(windows.len());

		for window in &windows {
			if !window.time_in.is_finite() || !window.time_out.is_finite() {
				return Err(WindowError::NonFinite { id: window.id.clone() });
			}

			if window.time_out <= window.time_in {
				return Err(WindowError::Inverted {
					id: window.id.clone(),
					time_in: window.time_in,
					time_out: window.time_out,
				});
			}

			if !ids.insert(window.id.as_str()) {
				return Err(WindowError::DuplicateId(window.id.clone()));
			}
		}

		Ok(Self { windows })
	}

	pub fn active_at(&self, time: f64) -> Vec<&AnnotationWindow<P>> {
		active_at(time, &self.windows)
	}

	pub fn active_ids(&self, time: f64) -> Vec<&str> {
		self.active_at(time).into_iter().map(|w| w.id.as_str()).collect()
	}

	pub fn get(&self, id: &str) -> Option<&AnnotationWindow<P>> {
		self.windows.iter().find(|w| w.id == id)
	}

	/// Where to seek so the window `id` becomes visible.
	pub fn seek_target(&self, id: &str) -> Option<f64> {
		self.get(id).map(|w| w.time_in)
	}

	pub fn windows(&self) -> &[AnnotationWindow<P>] {
		&self.windows
	}

	pub fn len(&self) -> usize {
		self.windows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.windows.is_empty()
	}
}

/// Tracks the active window set across playback ticks so overlays only
/// re-render when it changes.
#[derive(Debug, Default, Clone)]
pub struct WindowCursor {
	active: Vec<String>,
}

impl WindowCursor {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns true if the active set at `time` differs from the previous call.
	pub fn advance<P>(&mut self, index: &TimeWindowIndex<P>, time: f64) -> bool {
		let active = index.active_ids(time);
		if active.iter().copied().eq(self.active.iter().map(String::as_str)) {
			return false;
		}

		self.active = active.into_iter().map(str::to_string).collect();
		true
	}

	pub fn active(&self) -> &[String] {
		&self.active
	}
}
