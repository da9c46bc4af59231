use video_playback::{active_at, format_time, AnnotationWindow};
use wasm_bindgen::prelude::*;

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct WindowBounds {
	id: String,
	time_in: f64,
	time_out: f64,
}

/// Returns the windows whose closed `[timeIn, timeOut]` range contains `time`,
/// in input order. The returned entries are the objects that were passed in.
#[wasm_bindgen(js_name = activeAt, skip_typescript)]
pub fn active_at_js(time: f64, windows: js_sys::Array) -> Result<js_sys::Array, JsValue> {
	let bounds = windows
		.iter()
		.enumerate()
		.map(|(idx, window)| {
			let deserializer = serde_wasm_bindgen::Deserializer::from(window);
			serde_path_to_error::deserialize::<_, WindowBounds>(deserializer)
				.map(|w| AnnotationWindow::with_payload(w.id, w.time_in, w.time_out, idx as u32))
				.map_err(|err| JsError::new(&format!("invalid window at index {idx} ({}): {}", err.path(), err.inner())))
		})
		.collect::<Result<Vec<_>, _>>()?;

	Ok(active_at(time, &bounds)
		.into_iter()
		.map(|window| windows.get(window.payload))
		.collect())
}

/// `m:ss` label for a time in seconds.
#[wasm_bindgen(js_name = formatTime)]
pub fn format_time_js(seconds: f64) -> String {
	format_time(seconds)
}
