mod annotation;
mod error;
mod state;

pub use annotation::AnnotationWindow;
pub use error::{ErrorKind, PlaybackError};
pub use state::{PlaybackState, PlaybackStatus};

#[cfg(test)]
mod tests;
