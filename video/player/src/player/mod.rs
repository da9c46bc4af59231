use std::cell::RefCell;
use std::rc::Rc;

use video_playback::{PlayHandle, PlaybackController};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::HtmlVideoElement;

use self::element::VideoElement;
use self::errors::{error_to_js, to_js};
use self::scheduler::BrowserScheduler;
use self::settings::parse_settings;
use crate::tracing_wasm::{scope, PlayerLogLevel};

pub(crate) mod element;
mod errors;
mod scheduler;
pub(crate) mod settings;
mod util;
mod windows;

#[wasm_bindgen(typescript_custom_section)]
const _: &'static str = r#"
type ErrorKind = "autoplayBlocked" | "notFound" | "decodeFailed" | "networkStalled" | "invalidOperation";

type PlaybackStatus = "idle" | "loading" | "ready" | "playing" | "paused" | "ended" | "errored";

interface PlaybackState {
    status: PlaybackStatus;
    currentTime: number;
    duration: number;
    progress: number;
    isPlaying: boolean;
    isBuffering: boolean;
    volume: number;
    muted: boolean;
    playbackRate: number;
    bufferedFraction: number;
    error: ErrorKind | null;
}

interface AnnotationWindow {
    id: string;
    timeIn: number;
    timeOut: number;
}

function activeAt<W extends AnnotationWindow>(time: number, windows: W[]): W[];

class Player {
    constructor();

    attach(el: HTMLVideoElement | null, settings?: PlayerOptions): void;
    detach(): void;

    play(): Promise<void>;
    pause(): void;
    togglePlay(): Promise<void>;
    restart(): Promise<void>;
    seek(time: number): void;
    toggleMute(): void;
    setVolume(volume: number): void;
    setPlaybackRate(rate: number): void;
    load(src: string): void;
    retryLoad(src: string): void;

    subscribe(f: (state: PlaybackState, error: EventError | null) => void): () => void;

    readonly state: PlaybackState;
    readonly attached: boolean;
}
"#;

/// One video on the page. Every UI surface that controls the video should share
/// the same `Player`.
#[wasm_bindgen(inspectable, skip_typescript)]
pub struct Player {
	controller: PlaybackController,
	element: RefCell<Option<HtmlVideoElement>>,
	log_level: PlayerLogLevel,
}

impl Default for Player {
	fn default() -> Self {
		Self::new()
	}
}

#[wasm_bindgen]
impl Player {
	#[wasm_bindgen(constructor)]
	pub fn new() -> Self {
		let log_level = PlayerLogLevel::default();

		Self {
			controller: PlaybackController::new(Rc::new(BrowserScheduler::new(log_level.clone()))),
			element: RefCell::new(None),
			log_level,
		}
	}

	/// Commands may be issued from subscribers, so the element slot is never
	/// borrowed while the controller runs.
	pub fn attach(&self, el: Option<HtmlVideoElement>, settings: JsValue) -> Result<(), JsValue> {
		let options = parse_settings(settings)?;
		self.log_level
			.set(video_playback::PlayerOptionsParsed::from(options.clone()).logging_level());
		scope!(self.logging_level());

		let Some(element) = el else {
			tracing::warn!("attach called without a video element");
			return Ok(());
		};

		let already_attached = self
			.element
			.borrow()
			.as_ref()
			.is_some_and(|current| current.is_same_node(Some(&element)));
		if already_attached {
			tracing::warn!("element is already attached");
			return Ok(());
		}

		self.element.replace(Some(element.clone()));
		self.controller
			.attach(Rc::new(VideoElement::new(element, self.log_level.clone())), options);

		Ok(())
	}

	pub fn detach(&self) {
		scope!(self.logging_level());

		self.element.replace(None);
		self.controller.detach();
	}

	pub fn play(&self) -> js_sys::Promise {
		scope!(self.logging_level());

		settle(self.controller.play())
	}

	pub fn pause(&self) {
		scope!(self.logging_level());

		self.controller.pause();
	}

	#[wasm_bindgen(js_name = togglePlay)]
	pub fn toggle_play(&self) -> js_sys::Promise {
		scope!(self.logging_level());

		match self.controller.toggle_play() {
			Some(handle) => settle(handle),
			None => js_sys::Promise::resolve(&JsValue::UNDEFINED),
		}
	}

	pub fn restart(&self) -> js_sys::Promise {
		scope!(self.logging_level());

		settle(self.controller.restart())
	}

	pub fn seek(&self, time: f64) {
		scope!(self.logging_level());

		self.controller.seek(time);
	}

	#[wasm_bindgen(js_name = toggleMute)]
	pub fn toggle_mute(&self) {
		scope!(self.logging_level());

		self.controller.toggle_mute();
	}

	#[wasm_bindgen(js_name = setVolume)]
	pub fn set_volume(&self, volume: f64) {
		scope!(self.logging_level());

		self.controller.set_volume(volume);
	}

	#[wasm_bindgen(js_name = setPlaybackRate)]
	pub fn set_playback_rate(&self, rate: f64) {
		scope!(self.logging_level());

		self.controller.set_playback_rate(rate);
	}

	pub fn load(&self, src: &str) {
		scope!(self.logging_level());

		self.controller.load(src);
	}

	#[wasm_bindgen(js_name = retryLoad)]
	pub fn retry_load(&self, src: &str) {
		scope!(self.logging_level());

		self.controller.retry_load(src);
	}

	/// Calls `f` with the state and, when one is being reported, the error on
	/// every change. Returns a function that removes the subscription.
	pub fn subscribe(&self, f: js_sys::Function) -> js_sys::Function {
		let subscription = self.controller.subscribe(move |state, error| {
			let error = error.map(error_to_js).unwrap_or(JsValue::NULL);
			if let Err(err) = f.call2(&JsValue::undefined(), &to_js(state), &error) {
				tracing::error!("subscriber raised exception: {:?}", err);
			}
		});

		Closure::<dyn FnMut()>::new(move || {
			subscription.unsubscribe();
		})
		.into_js_value()
		.unchecked_into()
	}

	#[wasm_bindgen(getter = state)]
	pub fn state(&self) -> JsValue {
		to_js(&self.controller.state())
	}

	#[wasm_bindgen(getter = attached)]
	pub fn attached(&self) -> bool {
		self.controller.is_attached()
	}
}

impl Player {
	fn logging_level(&self) -> tracing::Level {
		self.log_level.get()
	}
}

/// Turns a play request into a promise that rejects with an `EventError`.
fn settle(handle: PlayHandle) -> js_sys::Promise {
	future_to_promise(async move {
		handle
			.await
			.map(|()| JsValue::UNDEFINED)
			.map_err(|err| error_to_js(&err))
	})
}
