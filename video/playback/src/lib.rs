mod annotations;
mod controller;
mod events;
mod resource;
mod scheduler;
mod settings;
mod util;

pub use annotations::{active_at, TimeWindowIndex, WindowCursor, WindowError};
pub use controller::{PlayHandle, PlaybackController};
pub use events::{Listener, Subscription};
pub use resource::{EventSink, ListenerGuard, MediaErrorCode, MediaEvent, MediaResource, PlayRejection, TimeRange};
pub use scheduler::Scheduler;
pub use settings::{LoggingLevel, PlayerOptions, PlayerOptionsParsed};
pub use util::{
	clamp_time, clamp_unit, contiguous_buffered_fraction, format_time, progress_percent, snap_playback_rate,
	ALLOWED_PLAYBACK_RATES,
};
pub use video_player_types::{AnnotationWindow, ErrorKind, PlaybackError, PlaybackState, PlaybackStatus};

#[cfg(test)]
mod tests;
