use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_test::*;
use web_sys::HtmlVideoElement;

use crate::player::Player;

wasm_bindgen_test_configure!(run_in_browser);

fn video_element() -> HtmlVideoElement {
	web_sys::window()
		.and_then(|window| window.document())
		.expect("no document")
		.create_element("video")
		.expect("failed to create video element")
		.unchecked_into()
}

#[wasm_bindgen_test]
fn test_attach_same_element_again_is_ignored() {
	let player = Player::new();
	let element = video_element();

	player.attach(Some(element.clone()), JsValue::UNDEFINED).unwrap();
	player.attach(Some(element), JsValue::UNDEFINED).unwrap();
	assert!(player.attached());

	player.attach(Some(video_element()), JsValue::UNDEFINED).unwrap();
	assert!(player.attached());

	player.detach();
	assert!(!player.attached());
}

#[wasm_bindgen_test]
fn test_subscriber_reads_state_during_attach() {
	let player = Rc::new(Player::new());
	let calls = Rc::new(Cell::new(0));

	let callback = Closure::<dyn Fn()>::new({
		let player = player.clone();
		let calls = calls.clone();
		move || {
			assert!(!player.state().is_undefined());
			calls.set(calls.get() + 1);
		}
	});
	let _unsubscribe = player.subscribe(callback.as_ref().unchecked_ref::<js_sys::Function>().clone());

	player.attach(Some(video_element()), JsValue::UNDEFINED).unwrap();
	assert!(calls.get() > 0);
	assert!(player.attached());
}
