use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};
use std::task::{Context, Poll};

use futures_util::future::LocalBoxFuture;
use tokio::sync::oneshot;
use video_player_types::{ErrorKind, PlaybackError, PlaybackStatus};

use super::{PlaybackController, Shared};
use crate::resource::{MediaResource, PlayRejection};

type PlayResult = Result<(), PlaybackError>;

/// Outcome of a play request.
///
/// Awaiting the handle is optional, dropping it does not cancel the request.
#[derive(Debug)]
#[must_use = "the play request runs regardless, await the handle to observe its outcome"]
pub struct PlayHandle {
	rx: oneshot::Receiver<PlayResult>,
}

impl PlayHandle {
	fn channel() -> (oneshot::Sender<PlayResult>, Self) {
		let (tx, rx) = oneshot::channel();
		(tx, Self { rx })
	}

	/// The outcome if the request already settled.
	pub fn try_result(&mut self) -> Option<PlayResult> {
		self.rx.try_recv().ok()
	}
}

impl Future for PlayHandle {
	type Output = PlayResult;

	fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		Pin::new(&mut self.rx)
			.poll(cx)
			.map(|result| result.unwrap_or_else(|_| Err(PlaybackError::invalid_operation("play request was dropped"))))
	}
}

fn detached() -> PlaybackError {
	PlaybackError::invalid_operation("controller was detached before playback started")
}

fn superseded() -> PlaybackError {
	PlaybackError::invalid_operation("play request was superseded by a pause or load")
}

enum RequestState {
	Current,
	Detached,
	Superseded,
}

impl RequestState {
	fn ensure_current(self) -> PlayResult {
		match self {
			Self::Current => Ok(()),
			Self::Detached => Err(detached()),
			Self::Superseded => Err(superseded()),
		}
	}
}

fn rejection_error(rejection: PlayRejection) -> PlaybackError {
	match rejection {
		PlayRejection::NotAllowed(reason) => PlaybackError::new(ErrorKind::AutoplayBlocked, reason),
		PlayRejection::NotSupported(reason) => PlaybackError::new(ErrorKind::NotFound, reason),
		PlayRejection::Aborted(reason) => PlaybackError::invalid_operation(format!("play request was interrupted: {reason}")),
		PlayRejection::Other(reason) => PlaybackError::new(ErrorKind::DecodeFailed, reason),
	}
}

impl PlaybackController {
	/// Requests playback.
	///
	/// The state only turns to playing once the platform accepts the request.
	/// If the request is refused by the autoplay policy the controller mutes
	/// the resource and tries exactly once more before reporting
	/// [`ErrorKind::AutoplayBlocked`].
	pub fn play(&self) -> PlayHandle {
		let (tx, handle) = PlayHandle::channel();

		let request = {
			let inner = self.shared.inner.borrow();
			match inner.resource() {
				None => Err("no resource attached"),
				Some(_) if inner.status.is_errored() => Err("player is errored, reload the source first"),
				Some(resource) => Ok((resource, inner.generation, inner.play_epoch)),
			}
		};

		let (resource, generation, epoch) = match request {
			Ok(request) => request,
			Err(reason) => {
				tracing::warn!("play ignored, {reason}");
				tx.send(Err(PlaybackError::invalid_operation(reason))).ok();
				return handle;
			}
		};

		tracing::debug!("requesting playback");
		let first = resource.play();
		let weak = Rc::downgrade(&self.shared);

		self.shared.scheduler.spawn_local(Box::pin(async move {
			let result = drive_play(weak, resource, first, generation, epoch).await;
			tx.send(result).ok();
		}));

		handle
	}

	fn request_state(&self, generation: u64, epoch: u64) -> RequestState {
		let inner = self.shared.inner.borrow();
		if inner.generation != generation {
			RequestState::Detached
		} else if inner.play_epoch != epoch {
			RequestState::Superseded
		} else {
			RequestState::Current
		}
	}

	fn confirm_playing(&self, generation: u64, epoch: u64) -> PlayResult {
		match self.request_state(generation, epoch) {
			RequestState::Current => {}
			RequestState::Detached => return Err(detached()),
			RequestState::Superseded => {
				tracing::trace!("play request settled after a pause or load");
				return Ok(());
			}
		}

		{
			let mut inner = self.shared.inner.borrow_mut();
			if inner.status.is_errored() {
				return Err(PlaybackError::invalid_operation("player errored while playback was starting"));
			}
			inner.status = PlaybackStatus::Playing;
		}

		self.publish(None);
		Ok(())
	}

	fn fail_play(&self, generation: u64, epoch: u64, error: PlaybackError) -> PlayResult {
		self.request_state(generation, epoch).ensure_current()?;

		if !error.is_fatal() {
			tracing::debug!("{error}");
			return Err(error);
		}

		{
			let mut inner = self.shared.inner.borrow_mut();
			inner.set_buffering(false);
			inner.status = PlaybackStatus::Errored;
			inner.error = Some(error.kind);
		}

		self.publish(Some(error.clone()));
		Err(error)
	}
}

async fn drive_play(
	weak: Weak<Shared>,
	resource: Rc<dyn MediaResource>,
	first: LocalBoxFuture<'static, Result<(), PlayRejection>>,
	generation: u64,
	epoch: u64,
) -> PlayResult {
	let rejection = match first.await {
		Ok(()) => {
			let controller = PlaybackController::upgrade(&weak).ok_or_else(detached)?;
			return controller.confirm_playing(generation, epoch);
		}
		Err(rejection) => rejection,
	};

	let PlayRejection::NotAllowed(reason) = rejection else {
		let controller = PlaybackController::upgrade(&weak).ok_or_else(detached)?;
		return controller.fail_play(generation, epoch, rejection_error(rejection));
	};

	// Muted playback is allowed without a user gesture.
	let retry = {
		let controller = PlaybackController::upgrade(&weak).ok_or_else(detached)?;
		controller.request_state(generation, epoch).ensure_current()?;

		tracing::warn!("playback with sound was blocked ({reason}), retrying muted");
		controller.apply_muted(true);
		resource.play()
	};

	let outcome = retry.await;
	let controller = PlaybackController::upgrade(&weak).ok_or_else(detached)?;

	match outcome {
		Ok(()) => controller.confirm_playing(generation, epoch),
		Err(PlayRejection::NotAllowed(reason)) => controller.fail_play(
			generation,
			epoch,
			PlaybackError::new(ErrorKind::AutoplayBlocked, format!("muted playback was blocked too: {reason}")),
		),
		Err(rejection) => controller.fail_play(generation, epoch, rejection_error(rejection)),
	}
}
