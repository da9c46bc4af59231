use video_player_types::{ErrorKind, PlaybackError};
use wasm_bindgen::prelude::*;

/// The error object handed to subscribers and to rejected play promises.
#[derive(Debug, Clone, serde::Serialize, tsify::Tsify)]
pub struct EventError {
	#[tsify(type = "ErrorKind")]
	pub kind: ErrorKind,
	pub message: String,
	/// False when the player state was not affected.
	pub fatal: bool,
}

impl From<&PlaybackError> for EventError {
	fn from(error: &PlaybackError) -> Self {
		Self {
			kind: error.kind,
			message: error.message.clone(),
			fatal: error.is_fatal(),
		}
	}
}

/// Serializes `value` the way JSON would, with `None` as `null`.
pub fn to_js<T: serde::Serialize>(value: &T) -> JsValue {
	value
		.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
		.unwrap_or_else(|err| {
			tracing::error!("failed to serialize value: {err}");
			JsValue::NULL
		})
}

pub fn error_to_js(error: &PlaybackError) -> JsValue {
	to_js(&EventError::from(error))
}
