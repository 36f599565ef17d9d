//! Fan-out of change events to per-subscriber bounded queues.

use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::warn;
use uuid::Uuid;

use crate::dto::sse::ServerEvent;

/// Bound on each subscriber's queue. A subscriber that falls this far behind
/// starts losing messages instead of slowing everyone else down.
pub const SUBSCRIBER_QUEUE_DEPTH: usize = 16;

/// Registry of live SSE subscribers and the dispatch across them.
///
/// Delivery is best-effort per subscriber: a full queue drops the message for
/// that subscriber only, so one slow or abandoned client never blocks the
/// broadcast path.
#[derive(Default)]
pub struct Broadcaster {
    subscribers: DashMap<Uuid, mpsc::Sender<ServerEvent>>,
    count: AtomicUsize,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a queue for a new subscriber and return its id together with
    /// the consuming half. The id is re-drawn on collision, which terminates
    /// on the first draw for any practical subscriber count.
    pub fn register(&self) -> (Uuid, mpsc::Receiver<ServerEvent>) {
        let (sender, receiver) = mpsc::channel(SUBSCRIBER_QUEUE_DEPTH);

        let id = loop {
            let candidate = Uuid::new_v4();
            if !self.subscribers.contains_key(&candidate) {
                break candidate;
            }
        };

        self.subscribers.insert(id, sender);
        self.count.fetch_add(1, Ordering::AcqRel);
        (id, receiver)
    }

    /// Remove a subscriber, closing its queue exactly once. Returns `false`
    /// when the id is unknown (e.g. already deregistered).
    pub fn deregister(&self, id: Uuid) -> bool {
        if self.subscribers.remove(&id).is_some() {
            self.count.fetch_sub(1, Ordering::AcqRel);
            true
        } else {
            false
        }
    }

    /// Deliver `event` to every registered queue without blocking. Returns
    /// the number of subscribers that accepted the message.
    pub fn broadcast(&self, event: &ServerEvent) -> usize {
        let mut sent = 0;
        for entry in self.subscribers.iter() {
            match entry.value().try_send(event.clone()) {
                Ok(()) => sent += 1,
                Err(TrySendError::Full(_)) => {
                    warn!(subscriber = %entry.key(), kind = %event.kind, "subscriber queue full, dropping event");
                }
                Err(TrySendError::Closed(_)) => {
                    warn!(subscriber = %entry.key(), kind = %event.kind, "subscriber queue closed, dropping event");
                }
            }
        }
        sent
    }

    /// Current number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }
}
