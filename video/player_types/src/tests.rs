use crate::{AnnotationWindow, ErrorKind, PlaybackError, PlaybackState, PlaybackStatus};

#[test]
fn test_window_bounds_are_inclusive() {
	let window = AnnotationWindow::new("crown", 1.5, 6.5);

	assert!(window.contains(1.5));
	assert!(window.contains(6.5));
	assert!(window.contains(3.0));
	assert!(!window.contains(1.49));
	assert!(!window.contains(6.51));
	assert!(!window.contains(f64::NAN));
	assert_eq!(window.length(), 5.0);
}

#[test]
fn test_window_deserialize_camel_case() {
	let window: AnnotationWindow<serde_json::Value> = serde_json::from_str(
		r#"{"id":"dial","timeIn":1.2,"timeOut":6.8,"payload":{"name":"Dial"}}"#,
	)
	.unwrap();

	assert_eq!(window.id, "dial");
	assert_eq!(window.time_in, 1.2);
	assert_eq!(window.time_out, 6.8);
	assert_eq!(window.payload["name"], "Dial");
}

#[test]
fn test_state_serializes_for_ui() {
	let state = PlaybackState {
		status: PlaybackStatus::Errored,
		error: Some(ErrorKind::NetworkStalled),
		..Default::default()
	};

	let value = serde_json::to_value(&state).unwrap();
	assert_eq!(value["status"], "errored");
	assert_eq!(value["error"], "networkStalled");
	assert_eq!(value["isPlaying"], false);
	assert_eq!(value["bufferedFraction"], 0.0);
}

#[test]
fn test_state_remaining() {
	let state = PlaybackState {
		current_time: 4.0,
		duration: 10.0,
		..Default::default()
	};
	assert_eq!(state.remaining(), 6.0);
	assert!(state.has_duration());
	assert!(!PlaybackState::default().has_duration());
}

#[test]
fn test_error_display() {
	let err = PlaybackError::new(ErrorKind::AutoplayBlocked, "muted retry was rejected");
	assert_eq!(err.to_string(), "autoplay blocked: muted retry was rejected");
	assert!(err.is_fatal());
	assert!(!PlaybackError::invalid_operation("nothing attached").is_fatal());
}

#[test]
fn test_status_metadata() {
	assert!(!PlaybackStatus::Loading.has_metadata());
	assert!(PlaybackStatus::Paused.has_metadata());
	assert!(PlaybackStatus::Errored.is_errored());
}
