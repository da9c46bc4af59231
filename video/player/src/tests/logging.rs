use tracing::Level;

use crate::tracing_wasm::PlayerLogLevel;

#[test]
fn test_player_level_filters_background_logs() {
	let level = PlayerLogLevel::default();
	let shared = level.clone();

	shared.set(Level::WARN);
	tracing::dispatcher::with_default(&level.dispatch(), || {
		assert!(!tracing::enabled!(Level::INFO));
		assert!(!tracing::enabled!(Level::DEBUG));
		assert!(tracing::enabled!(Level::WARN));
	});

	shared.set(Level::DEBUG);
	assert_eq!(level.get(), Level::DEBUG);
	tracing::dispatcher::with_default(&level.dispatch(), || {
		assert!(tracing::enabled!(Level::DEBUG));
		assert!(!tracing::enabled!(Level::TRACE));
	});
}
