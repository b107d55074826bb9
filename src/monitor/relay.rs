//! Dispatch relay between the update worker and the consumer.
//!
//! The worker posts value-copied [`InterfaceEvent`]s into an [`EventRelay`];
//! the consumer drains the paired [`EventInbox`] on its own task, either by
//! awaiting events directly, by treating the inbox as a [`Stream`], or by
//! routing them to an [`InterfaceObserver`].
//!
//! Events from one update cycle arrive in the order they were produced.

use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError};
use tokio_stream::Stream;

use super::event::InterfaceEvent;
use crate::network::InterfaceRecord;

/// Creates a connected relay/inbox pair.
#[must_use]
pub fn channel() -> (EventRelay, EventInbox) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (EventRelay { sender }, EventInbox { receiver })
}

/// Sending half, owned by the update worker.
#[derive(Debug, Clone)]
pub struct EventRelay {
    sender: UnboundedSender<InterfaceEvent>,
}

impl EventRelay {
    /// Posts an event. Never blocks.
    ///
    /// Events posted after the inbox is dropped are discarded.
    pub fn post(&self, event: InterfaceEvent) {
        if let Err(rejected) = self.sender.send(event) {
            tracing::trace!("Dropping notification, inbox closed: {:?}", rejected.0);
        }
    }

    /// Posts a batch of events in order.
    pub fn post_all(&self, events: impl IntoIterator<Item = InterfaceEvent>) {
        for event in events {
            self.post(event);
        }
    }

    /// Returns true if the consumer has dropped its inbox.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Receiving half, owned by the consumer.
#[derive(Debug)]
pub struct EventInbox {
    receiver: UnboundedReceiver<InterfaceEvent>,
}

impl EventInbox {
    /// Waits for the next event.
    ///
    /// Returns `None` once every [`EventRelay`] has been dropped and the
    /// queue is empty.
    pub async fn recv(&mut self) -> Option<InterfaceEvent> {
        self.receiver.recv().await
    }

    /// Returns the next queued event without waiting.
    pub fn try_recv(&mut self) -> Option<InterfaceEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Routes every queued event to `observer` without waiting.
    ///
    /// Returns the number of events dispatched.
    pub fn drain_into<O: InterfaceObserver + ?Sized>(&mut self, observer: &mut O) -> usize {
        let mut count = 0;
        while let Some(event) = self.try_recv() {
            dispatch(&event, observer);
            count += 1;
        }
        count
    }
}

impl Stream for EventInbox {
    type Item = InterfaceEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

/// Consumer-side callbacks for interface notifications.
///
/// All methods default to doing nothing, so observers implement only what
/// they care about.
pub trait InterfaceObserver {
    /// An interface appeared (`added == true`) or disappeared.
    fn on_interface_list_changed(&mut self, record: &InterfaceRecord, added: bool) {
        let _ = (record, added);
    }

    /// A known interface changed its active flag.
    fn on_status_changed(&mut self, name: &str, active: bool) {
        let _ = (name, active);
    }

    /// An update cycle failed and the table was cleared.
    fn on_update_failed(&mut self) {}
}

/// Routes one event to the matching observer callback.
pub fn dispatch<O: InterfaceObserver + ?Sized>(event: &InterfaceEvent, observer: &mut O) {
    match event {
        InterfaceEvent::Added(record) => observer.on_interface_list_changed(record, true),
        InterfaceEvent::Removed(record) => observer.on_interface_list_changed(record, false),
        InterfaceEvent::StatusChanged { name, active } => observer.on_status_changed(name, *active),
        InterfaceEvent::UpdateFailed => observer.on_update_failed(),
    }
}
