#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
	/// The platform refused to start playback with sound.
	AutoplayBlocked,
	/// The source url is missing or points at nothing playable.
	NotFound,
	/// The codec is unsupported or the file is corrupt.
	DecodeFailed,
	/// Buffering exceeded the configured timeout.
	NetworkStalled,
	/// A command was issued in a state where it cannot do anything.
	InvalidOperation,
}

impl ErrorKind {
	pub const fn as_str(&self) -> &'static str {
		match self {
			Self::AutoplayBlocked => "autoplay blocked",
			Self::NotFound => "not found",
			Self::DecodeFailed => "decode failed",
			Self::NetworkStalled => "network stalled",
			Self::InvalidOperation => "invalid operation",
		}
	}
}

impl std::fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, serde::Serialize, serde::Deserialize)]
#[error("{kind}: {message}")]
pub struct PlaybackError {
	pub kind: ErrorKind,
	pub message: String,
}

impl PlaybackError {
	pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
		Self {
			kind,
			message: message.into(),
		}
	}

	pub fn invalid_operation(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::InvalidOperation, message)
	}

	/// Errors that move the player into the errored state.
	pub fn is_fatal(&self) -> bool {
		!matches!(self.kind, ErrorKind::InvalidOperation)
	}
}
