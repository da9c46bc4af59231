/// Adds a listener for every named event on `$target` and returns a
/// [`ListenerGuard`](video_playback::ListenerGuard) that removes them again.
///
/// Several events may share one handler: `"waiting" | "stalled" => ...`.
macro_rules! register_events {
	($target:expr, {
		$(
			$($evt:literal)|+ => $body:expr
		),* $(,)?
	}) => {
		{
			let target: web_sys::EventTarget = $target.clone().into();
			let mut handlers = Vec::new();
			$(
				let events: &'static [&'static str] = &[$($evt),+];
				let callback = Closure::<dyn FnMut(web_sys::Event)>::new($body);
				for evt in events {
					if let Err(err) = target.add_event_listener_with_callback(evt, callback.as_ref().unchecked_ref()) {
						tracing::warn!("failed to add {evt} listener: {err:?}");
					}
				}
				handlers.push((events, callback));
			)*

			video_playback::ListenerGuard::new(move || {
				for (events, callback) in handlers {
					for evt in events {
						if let Err(err) = target.remove_event_listener_with_callback(evt, callback.as_ref().unchecked_ref()) {
							tracing::warn!("failed to remove {evt} listener: {err:?}");
						}
					}
				}
			})
		}
	};
}

pub(crate) use register_events;
