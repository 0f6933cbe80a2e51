//! Event bus for reconciliation notifications.
//!
//! Settlement failures are not retried; publishing them here is how an
//! operator-facing subscriber gets to hear about them.

use payex_types::ReconcileEvent;
use tokio::sync::broadcast;

/// Broadcast channel for [`ReconcileEvent`]s.
#[derive(Clone)]
pub struct EventBus {
	sender: broadcast::Sender<ReconcileEvent>,
}

impl EventBus {
	/// Creates a new EventBus with the specified channel capacity.
	///
	/// Subscribers that fall more than `capacity` events behind lose the
	/// oldest ones.
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	pub fn subscribe(&self) -> broadcast::Receiver<ReconcileEvent> {
		self.sender.subscribe()
	}

	/// Publishes an event to all current subscribers.
	///
	/// Having no subscribers is not an error for the reconciler, so the
	/// send result is reduced to the number of receivers reached.
	pub fn publish(&self, event: ReconcileEvent) -> usize {
		self.sender.send(event).unwrap_or(0)
	}
}
