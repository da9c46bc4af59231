use tsify::Tsify;
use video_playback::{LoggingLevel, PlayerOptions};

#[test]
fn test_options_typescript_declaration() {
	let decl = PlayerOptions::DECL;

	assert!(decl.contains("interface PlayerOptions"));
	for key in ["loop?", "muted?", "volume?", "playbackRate?", "autoPlay?", "bufferingTimeoutMs?", "loggingLevel?"] {
		assert!(decl.contains(key), "missing {key} in {decl}");
	}

	assert!(LoggingLevel::DECL.contains("\"debug\""));
}
