use std::fmt;

use serde::Serialize;

/// Kinds of events pushed to SSE subscribers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Add,
    Update,
    Remove,
    Fail,
    KeepAlive,
}

impl EventKind {
    /// Wire name of the event, written into the SSE `event:` field.
    pub const fn as_str(self) -> &'static str {
        match self {
            EventKind::Add => "add",
            EventKind::Update => "update",
            EventKind::Remove => "remove",
            EventKind::Fail => "fail",
            EventKind::KeepAlive => "keep-alive",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dispatched payload carried from the workers to every subscriber queue.
#[derive(Clone, Debug)]
pub struct ServerEvent {
    /// Event type name for the SSE message.
    pub kind: EventKind,
    /// The serialized JSON data for the event.
    pub data: String,
}

impl ServerEvent {
    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<T>(kind: EventKind, payload: &T) -> serde_json::Result<Self>
    where
        T: Serialize,
    {
        Ok(Self {
            kind,
            data: serde_json::to_string(payload)?,
        })
    }
}
