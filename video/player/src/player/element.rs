use futures_util::future::{self, LocalBoxFuture};
use video_playback::{EventSink, ListenerGuard, MediaErrorCode, MediaEvent, MediaResource, PlayRejection, TimeRange};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlVideoElement;

use super::util::register_events;
use crate::tracing_wasm::PlayerLogLevel;

/// Classifies a rejected `play()` promise by its `DOMException` name.
pub fn rejection_from_name(name: &str, message: String) -> PlayRejection {
	match name {
		"NotAllowedError" => PlayRejection::NotAllowed(message),
		"AbortError" => PlayRejection::Aborted(message),
		"NotSupportedError" => PlayRejection::NotSupported(message),
		_ => PlayRejection::Other(message),
	}
}

fn play_rejection(err: JsValue) -> PlayRejection {
	match err.dyn_ref::<web_sys::DomException>() {
		Some(exception) => rejection_from_name(&exception.name(), exception.message()),
		None => PlayRejection::Other(format!("{err:?}")),
	}
}

/// Maps `MediaError.code`.
pub fn media_error_code(code: u16) -> MediaErrorCode {
	match code {
		1 => MediaErrorCode::Aborted,
		2 => MediaErrorCode::Network,
		3 => MediaErrorCode::Decode,
		4 => MediaErrorCode::SourceNotSupported,
		_ => MediaErrorCode::Unknown,
	}
}

/// A `<video>` element driven by the playback controller.
pub struct VideoElement {
	element: HtmlVideoElement,
	log_level: PlayerLogLevel,
}

impl VideoElement {
	pub fn new(element: HtmlVideoElement, log_level: PlayerLogLevel) -> Self {
		Self { element, log_level }
	}
}

impl MediaResource for VideoElement {
	fn load(&self, src: &str) {
		self.element.set_src(src);
		self.element.load();
	}

	fn play(&self) -> LocalBoxFuture<'static, Result<(), PlayRejection>> {
		match self.element.play() {
			Ok(promise) => Box::pin(async move { JsFuture::from(promise).await.map(|_| ()).map_err(play_rejection) }),
			Err(err) => Box::pin(future::ready(Err(play_rejection(err)))),
		}
	}

	fn pause(&self) {
		if let Err(err) = self.element.pause() {
			tracing::warn!("failed to pause video element: {err:?}");
		}
	}

	fn current_time(&self) -> f64 {
		self.element.current_time()
	}

	fn set_current_time(&self, time: f64) {
		self.element.set_current_time(time);
	}

	fn duration(&self) -> f64 {
		self.element.duration()
	}

	fn volume(&self) -> f64 {
		self.element.volume()
	}

	fn set_volume(&self, volume: f64) {
		self.element.set_volume(volume);
	}

	fn muted(&self) -> bool {
		self.element.muted()
	}

	fn set_muted(&self, muted: bool) {
		self.element.set_muted(muted);
	}

	fn playback_rate(&self) -> f64 {
		self.element.playback_rate()
	}

	fn set_playback_rate(&self, rate: f64) {
		self.element.set_playback_rate(rate);
	}

	fn buffered(&self) -> Vec<TimeRange> {
		let ranges = self.element.buffered();

		(0..ranges.length())
			.filter_map(|i| match (ranges.start(i), ranges.end(i)) {
				(Ok(start), Ok(end)) => Some(TimeRange::new(start, end)),
				_ => None,
			})
			.collect()
	}

	/// Every listener handles its event under the player's log level.
	fn listen(&self, sink: EventSink) -> ListenerGuard {
		let dispatch = self.log_level.dispatch();

		macro_rules! forward {
			($event:expr) => {{
				let sink = sink.clone();
				let dispatch = dispatch.clone();
				move |_| {
					let _guard = tracing::dispatcher::set_default(&dispatch);
					sink($event)
				}
			}};
		}

		register_events!(self.element, {
			"loadstart" => forward!(MediaEvent::LoadStart),
			"loadedmetadata" => forward!(MediaEvent::MetadataLoaded),
			"durationchange" => forward!(MediaEvent::DurationChange),
			"timeupdate" => forward!(MediaEvent::TimeUpdate),
			"progress" => forward!(MediaEvent::Progress),
			"waiting" => forward!(MediaEvent::Waiting),
			"stalled" => forward!(MediaEvent::Stalled),
			"canplay" | "canplaythrough" => forward!(MediaEvent::CanPlay),
			"play" => forward!(MediaEvent::Play),
			"playing" => forward!(MediaEvent::Playing),
			"pause" => forward!(MediaEvent::Pause),
			"seeking" => forward!(MediaEvent::Seeking),
			"seeked" => forward!(MediaEvent::Seeked),
			"ended" => forward!(MediaEvent::Ended),
			"volumechange" => forward!(MediaEvent::VolumeChange),
			"ratechange" => forward!(MediaEvent::RateChange),
			"error" => {
				let sink = sink.clone();
				let dispatch = dispatch.clone();
				let element = self.element.clone();
				move |_| {
					let _guard = tracing::dispatcher::set_default(&dispatch);
					let code = element.error().map(|err| err.code()).unwrap_or_default();
					tracing::debug!(code, "video element error");
					sink(MediaEvent::Error(media_error_code(code)))
				}
			},
		})
	}
}
