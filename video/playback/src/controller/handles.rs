use std::rc::Rc;
use std::time::Duration;

use video_player_types::{ErrorKind, PlaybackError, PlaybackStatus};

use super::inner::ControllerInner;
use super::PlaybackController;
use crate::resource::{MediaErrorCode, MediaEvent, MediaResource};
use crate::util::{clamp_time, clamp_unit, contiguous_buffered_fraction, snap_playback_rate};

/// Work left over after an event was applied to the state, performed once
/// the state borrow is released.
enum Followup {
	Nothing,
	LoopRestart,
	WatchStall { epoch: u64, timeout: Duration },
	Failed(PlaybackError),
}

fn media_error(code: MediaErrorCode) -> Option<PlaybackError> {
	match code {
		MediaErrorCode::Aborted => None,
		MediaErrorCode::Network => Some(PlaybackError::new(
			ErrorKind::NetworkStalled,
			"a network error interrupted loading",
		)),
		MediaErrorCode::Decode => Some(PlaybackError::new(ErrorKind::DecodeFailed, "the media could not be decoded")),
		MediaErrorCode::SourceNotSupported => Some(PlaybackError::new(
			ErrorKind::NotFound,
			"the source is missing or not supported",
		)),
		MediaErrorCode::Unknown => Some(PlaybackError::new(ErrorKind::DecodeFailed, "unknown media error")),
	}
}

impl PlaybackController {
	pub(super) fn dispatch_media_event(&self, generation: u64, event: MediaEvent) {
		self.shared
			.media_events
			.deliver((generation, event), |(generation, event)| {
				self.handle_media_event(generation, event)
			});
	}

	fn handle_media_event(&self, generation: u64, event: MediaEvent) {
		let (resource, followup) = {
			let mut inner = self.shared.inner.borrow_mut();
			if inner.generation != generation {
				tracing::trace!(?event, "dropping event from a previous attachment");
				return;
			}

			let Some(resource) = inner.resource() else {
				return;
			};

			if inner.status.is_errored() {
				tracing::trace!(?event, "ignoring event while errored");
				return;
			}

			let followup = inner.apply_event(event, resource.as_ref());
			(resource, followup)
		};

		match followup {
			Followup::Nothing => self.publish(None),
			Followup::LoopRestart => {
				tracing::debug!("looping back to the start");
				resource.set_current_time(0.0);
				self.publish(None);
				drop(self.play());
			}
			Followup::WatchStall { epoch, timeout } => {
				self.publish(None);
				self.watch_stall(generation, epoch, timeout);
			}
			Followup::Failed(error) => self.publish(Some(error)),
		}
	}

	fn watch_stall(&self, generation: u64, epoch: u64, timeout: Duration) {
		let sleep = self.shared.scheduler.sleep(timeout);
		let weak = Rc::downgrade(&self.shared);

		self.shared.scheduler.spawn_local(Box::pin(async move {
			sleep.await;
			if let Some(controller) = PlaybackController::upgrade(&weak) {
				controller.check_stall(generation, epoch, timeout);
			}
		}));
	}

	fn check_stall(&self, generation: u64, epoch: u64, timeout: Duration) {
		let error = {
			let mut inner = self.shared.inner.borrow_mut();
			if inner.generation != generation
				|| inner.buffering_epoch != epoch
				|| !inner.buffering
				|| inner.status != PlaybackStatus::Playing
			{
				return;
			}

			inner.set_buffering(false);
			inner.status = PlaybackStatus::Errored;
			inner.error = Some(ErrorKind::NetworkStalled);

			PlaybackError::new(
				ErrorKind::NetworkStalled,
				format!("buffering for longer than {}ms", timeout.as_millis()),
			)
		};

		self.publish(Some(error));
	}
}

impl ControllerInner {
	fn apply_event(&mut self, event: MediaEvent, resource: &dyn MediaResource) -> Followup {
		match event {
			MediaEvent::LoadStart | MediaEvent::Play => {
				tracing::trace!(?event, "no state change");
			}
			MediaEvent::MetadataLoaded | MediaEvent::DurationChange => {
				self.update_duration(resource.duration());
				if self.status == PlaybackStatus::Loading && self.has_duration() {
					tracing::debug!(duration = self.duration, "metadata loaded");
					self.status = PlaybackStatus::Ready;
				}
			}
			MediaEvent::TimeUpdate => self.update_time(resource.current_time()),
			MediaEvent::Progress => self.update_buffered(resource),
			MediaEvent::Waiting | MediaEvent::Stalled => {
				if self.status == PlaybackStatus::Playing && !self.buffering {
					tracing::debug!(?event, time = self.current_time, "buffering");
					self.set_buffering(true);
					return Followup::WatchStall {
						epoch: self.buffering_epoch,
						timeout: self.options.buffering_timeout(),
					};
				}
			}
			MediaEvent::CanPlay => {
				self.set_buffering(false);
				if self.status == PlaybackStatus::Loading {
					self.update_duration(resource.duration());
					if self.has_duration() {
						self.status = PlaybackStatus::Ready;
					}
				}
			}
			MediaEvent::Playing => {
				self.status = PlaybackStatus::Playing;
				self.set_buffering(false);
			}
			MediaEvent::Pause => {
				if self.status == PlaybackStatus::Playing {
					self.status = PlaybackStatus::Paused;
				}
				self.set_buffering(false);
			}
			MediaEvent::Seeking => self.seek_pending = true,
			MediaEvent::Seeked => {
				self.seek_pending = false;
				self.current_time = if self.has_duration() {
					clamp_time(resource.current_time(), self.duration)
				} else {
					0.0
				};
			}
			MediaEvent::Ended => {
				self.set_buffering(false);
				if self.options.looping {
					self.current_time = 0.0;
					self.seek_pending = true;
					self.status = PlaybackStatus::Playing;
					return Followup::LoopRestart;
				}

				tracing::debug!("playback ended");
				self.status = PlaybackStatus::Ended;
				if self.has_duration() {
					self.current_time = self.duration;
				}
			}
			MediaEvent::VolumeChange => {
				let volume = resource.volume();
				if !volume.is_nan() {
					self.volume = clamp_unit(volume);
				}
				self.muted = resource.muted();
			}
			MediaEvent::RateChange => self.playback_rate = snap_playback_rate(resource.playback_rate()),
			MediaEvent::Error(code) => {
				let Some(error) = media_error(code) else {
					tracing::trace!("loading was aborted");
					return Followup::Nothing;
				};

				self.set_buffering(false);
				self.status = PlaybackStatus::Errored;
				self.error = Some(error.kind);
				return Followup::Failed(error);
			}
		}

		Followup::Nothing
	}

	fn update_duration(&mut self, duration: f64) {
		if duration.is_finite() && duration > 0.0 {
			self.duration = duration;
			self.current_time = clamp_time(self.current_time, duration);
		}
	}

	/// Time only moves backwards after a seek or a loop wrap.
	fn update_time(&mut self, time: f64) {
		let time = if self.has_duration() {
			clamp_time(time, self.duration)
		} else if time.is_finite() {
			time.max(0.0)
		} else {
			0.0
		};

		if time < self.current_time && !self.seek_pending {
			tracing::trace!(time, current = self.current_time, "ignoring regressing time update");
			return;
		}

		let advanced = time > self.current_time;
		self.current_time = time;
		self.seek_pending = false;

		if advanced && self.buffering {
			tracing::debug!(time, "buffering finished");
			self.set_buffering(false);
		}
	}

	fn update_buffered(&mut self, resource: &dyn MediaResource) {
		let fraction = contiguous_buffered_fraction(&resource.buffered(), self.duration);

		if self.buffer_reset {
			self.buffered_fraction = fraction;
			self.buffer_reset = false;
		} else {
			self.buffered_fraction = self.buffered_fraction.max(fraction);
		}
	}
}
