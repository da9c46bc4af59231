use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use crate::resource::TimeRange;

/// Playback rates a user may pick from.
pub const ALLOWED_PLAYBACK_RATES: [f64; 8] = [0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 1.75, 2.0];

/// Ranges starting within this many seconds of zero count as starting at zero.
const BUFFERED_START_TOLERANCE: f64 = 0.25;

pub fn clamp_unit(value: f64) -> f64 {
	value.clamp(0.0, 1.0)
}

/// Clamps a time to `[0, duration]`. An unknown duration (zero, negative or
/// NaN) clamps everything to zero.
pub fn clamp_time(time: f64, duration: f64) -> f64 {
	if !(duration.is_finite() && duration > 0.0) || time.is_nan() {
		return 0.0;
	}

	time.clamp(0.0, duration)
}

/// Nearest allowed rate, ties go to the lower rate.
pub fn snap_playback_rate(rate: f64) -> f64 {
	if !rate.is_finite() {
		return 1.0;
	}

	ALLOWED_PLAYBACK_RATES
		.iter()
		.copied()
		.fold(ALLOWED_PLAYBACK_RATES[0], |best, candidate| {
			if (candidate - rate).abs() < (best - rate).abs() {
				candidate
			} else {
				best
			}
		})
}

pub fn progress_percent(time: f64, duration: f64) -> f64 {
	if !(duration.is_finite() && duration > 0.0) {
		return 0.0;
	}

	(clamp_time(time, duration) / duration) * 100.0
}

/// Fraction of `duration` covered by buffered data that is contiguous from the
/// start of the media.
pub fn contiguous_buffered_fraction(ranges: &[TimeRange], duration: f64) -> f64 {
	if !(duration.is_finite() && duration > 0.0) {
		return 0.0;
	}

	let mut ranges = ranges
		.iter()
		.filter(|r| r.end > r.start && r.start.is_finite() && r.end.is_finite())
		.collect::<Vec<_>>();
	ranges.sort_by(|a, b| a.start.total_cmp(&b.start));

	let mut end = 0.0_f64;
	for range in ranges {
		if range.start > end + BUFFERED_START_TOLERANCE {
			break;
		}
		end = end.max(range.end);
	}

	clamp_unit(end / duration)
}

/// `m:ss`, the way the scrub bar labels time.
pub fn format_time(seconds: f64) -> String {
	let seconds = if seconds.is_finite() && seconds > 0.0 {
		seconds.floor() as u64
	} else {
		0
	};

	format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Serialises delivery of items that may be produced while a previous item is
/// still being handled. Items queued during delivery are handled by the
/// outermost caller, in order.
pub(crate) struct Mailbox<T> {
	queue: RefCell<VecDeque<T>>,
	busy: Cell<bool>,
}

impl<T> Default for Mailbox<T> {
	fn default() -> Self {
		Self {
			queue: RefCell::new(VecDeque::new()),
			busy: Cell::new(false),
		}
	}
}

impl<T> Mailbox<T> {
	pub fn deliver(&self, item: T, mut handle: impl FnMut(T)) {
		self.queue.borrow_mut().push_back(item);

		if self.busy.replace(true) {
			return;
		}

		loop {
			let next = self.queue.borrow_mut().pop_front();
			match next {
				Some(item) => handle(item),
				None => break,
			}
		}

		self.busy.set(false);
	}

	pub fn clear(&self) {
		self.queue.borrow_mut().clear();
	}
}
