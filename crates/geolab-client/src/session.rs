//! Process-wide session events.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crossbeam_channel::{Receiver, Sender, TryRecvError};

use crate::frame::FrameMessage;

/// An event every interested component may observe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A request was rejected with `401`.
    SessionExpired,
    /// A message arrived from the embedding host.
    Host(FrameMessage),
}

#[derive(Default)]
struct BusInner {
    next_id: AtomicU64,
    subscribers: Mutex<Vec<(u64, Sender<SessionEvent>)>>,
}

impl BusInner {
    fn subscribers(&self) -> MutexGuard<'_, Vec<(u64, Sender<SessionEvent>)>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Fan-out of [`SessionEvent`]s to any number of subscribers.
///
/// Cheap to clone; clones share subscribers.
#[derive(Clone, Default)]
pub struct SessionBus {
    inner: Arc<BusInner>,
}

impl SessionBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber. It receives events published after this
    /// call until the returned [`Subscription`] is dropped.
    pub fn subscribe(&self) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = crossbeam_channel::unbounded();
        self.inner.subscribers().push((id, sender));
        Subscription {
            id,
            receiver,
            bus: Arc::clone(&self.inner),
        }
    }

    /// Delivers `event` to every live subscriber.
    pub fn publish(&self, event: SessionEvent) {
        let mut subscribers = self.inner.subscribers();
        subscribers.retain(|(_, sender)| sender.send(event.clone()).is_ok());
        tracing::debug!(?event, subscribers = subscribers.len(), "published session event");
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers().len()
    }
}

impl std::fmt::Debug for SessionBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// A registered listener. Unsubscribes on drop.
pub struct Subscription {
    id: u64,
    receiver: Receiver<SessionEvent>,
    bus: Arc<BusInner>,
}

impl Subscription {
    /// Next event, if one is waiting.
    pub fn try_recv(&self) -> Option<SessionEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// All events waiting right now.
    pub fn drain(&self) -> Vec<SessionEvent> {
        self.receiver.try_iter().collect()
    }

    /// The underlying channel, for `select!` loops.
    pub fn receiver(&self) -> &Receiver<SessionEvent> {
        &self.receiver
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.bus.subscribers().retain(|(id, _)| *id != self.id);
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscriber_sees_the_event() {
        let bus = SessionBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();
        bus.publish(SessionEvent::SessionExpired);
        assert_eq!(a.try_recv(), Some(SessionEvent::SessionExpired));
        assert_eq!(b.drain(), vec![SessionEvent::SessionExpired]);
        assert_eq!(a.try_recv(), None);
    }

    #[test]
    fn dropped_subscription_is_removed() {
        let bus = SessionBus::new();
        let sub = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);
        drop(sub);
        assert_eq!(bus.subscriber_count(), 0);
        bus.publish(SessionEvent::Host(FrameMessage::CloseModal));
    }
}
