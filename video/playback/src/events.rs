use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use video_player_types::{PlaybackError, PlaybackState};

use crate::util::Mailbox;

pub type Listener = Rc<dyn Fn(&PlaybackState, Option<&PlaybackError>)>;

struct Notification {
	state: PlaybackState,
	error: Option<PlaybackError>,
}

/// Fans state changes out to subscribers.
///
/// Notifications raised by a subscriber while another notification is being
/// delivered are queued, so every subscriber sees the same order.
pub(crate) struct EventManager {
	listeners: RefCell<Vec<(u64, Listener)>>,
	next_id: Cell<u64>,
	epoch: Cell<u64>,
	outbox: Mailbox<Notification>,
}

impl EventManager {
	pub fn new() -> Self {
		Self {
			listeners: RefCell::new(Vec::new()),
			next_id: Cell::new(0),
			epoch: Cell::new(0),
			outbox: Mailbox::default(),
		}
	}

	pub fn add_listener(&self, f: Listener) -> u64 {
		let id = self.next_id.get();
		self.next_id.set(id + 1);
		self.listeners.borrow_mut().push((id, f));
		id
	}

	pub fn remove_listener(&self, id: u64) -> bool {
		let mut listeners = self.listeners.borrow_mut();
		let len = listeners.len();
		listeners.retain(|(x, _)| *x != id);
		listeners.len() != len
	}

	pub fn len(&self) -> usize {
		self.listeners.borrow().len()
	}

	/// Drops every listener and every queued notification. A delivery that is
	/// in progress stops before the next listener.
	pub fn clear(&self) {
		self.listeners.borrow_mut().clear();
		self.outbox.clear();
		self.epoch.set(self.epoch.get() + 1);
	}

	pub fn emit(&self, state: PlaybackState, error: Option<PlaybackError>) {
		self.outbox.deliver(Notification { state, error }, |notification| {
			self.dispatch(notification)
		});
	}

	fn dispatch(&self, notification: Notification) {
		let epoch = self.epoch.get();
		let listeners = self.listeners.borrow().clone();

		for (id, listener) in listeners {
			if self.epoch.get() != epoch {
				tracing::trace!("listeners cleared during dispatch");
				return;
			}

			// skip listeners removed by an earlier listener of this round
			if !self.listeners.borrow().iter().any(|(x, _)| *x == id) {
				continue;
			}

			listener(&notification.state, notification.error.as_ref());
		}
	}
}

/// Handle returned by `subscribe`.
#[derive(Debug, Clone)]
pub struct Subscription {
	id: u64,
	events: Weak<EventManager>,
}

impl Subscription {
	pub(crate) fn new(id: u64, events: &Rc<EventManager>) -> Self {
		Self {
			id,
			events: Rc::downgrade(events),
		}
	}

	/// Stops notifications to this subscriber. Returns false if it was already
	/// released, either by an earlier call or by the controller detaching.
	pub fn unsubscribe(&self) -> bool {
		self.events
			.upgrade()
			.map(|events| events.remove_listener(self.id))
			.unwrap_or_default()
	}
}

impl std::fmt::Debug for EventManager {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EventManager").field("listeners", &self.len()).finish()
	}
}
