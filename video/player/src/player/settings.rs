use video_playback::PlayerOptions;
use wasm_bindgen::prelude::*;

/// Reads the options object passed from JS. `undefined` and `null` select the
/// defaults.
pub fn parse_settings(value: JsValue) -> Result<PlayerOptions, JsValue> {
	if value.is_undefined() || value.is_null() {
		return Ok(PlayerOptions::default());
	}

	let deserializer = serde_wasm_bindgen::Deserializer::from(value);
	serde_path_to_error::deserialize(deserializer).map_err(|err| {
		JsValue::from(JsError::new(&format!(
			"failed to deserialize settings ({}): {}",
			err.path(),
			err.inner()
		)))
	})
}
