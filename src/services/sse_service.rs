use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    dto::sse::{EventKind, ServerEvent},
    state::SharedState,
};

/// Idle pulse written to every stream to defeat proxy timeouts.
const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// Buffer between the forwarder task and the response body.
const FORWARD_BUFFER: usize = 8;

/// Register a subscriber queue with the broadcaster.
pub fn subscribe(state: &SharedState) -> (Uuid, mpsc::Receiver<ServerEvent>) {
    state.broadcaster().register()
}

/// Convert a subscriber queue into an SSE response, forwarding events and
/// deregistering once the client disconnects or the process shuts down.
pub fn to_sse_stream(
    state: SharedState,
    subscriber: Uuid,
    mut events: mpsc::Receiver<ServerEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // small bounded channel between forwarder and response
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(FORWARD_BUFFER);

    // forwarder task: reads from the subscriber queue and pushes into the
    // response channel until either side goes away
    tokio::spawn(async move {
        let shutdown = state.shutdown().clone();
        loop {
            tokio::select! {
                _ = tx.closed() => break,
                _ = shutdown.cancelled() => break,
                received = events.recv() => match received {
                    Some(event) => {
                        let frame = Event::default().event(event.kind.as_str()).data(event.data);
                        if tx.send(Ok(frame)).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                },
            }
        }

        if state.broadcaster().deregister(subscriber) {
            info!(
                subscriber = %subscriber,
                subscribers = state.broadcaster().subscriber_count(),
                "SSE subscriber disconnected"
            );
        }
    });

    // response stream reads from the channel; when the client disconnects
    // axum drops this stream and the forwarder observes the closure
    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(KEEP_ALIVE_INTERVAL)
            .event(Event::default().event(EventKind::KeepAlive.as_str()).data(" ")),
    )
}

/// Drain the internal event channel into the broadcaster. Runs until every
/// sender is gone, which the shutdown observer arranges after the workers
/// have stopped.
pub async fn pump(state: SharedState, mut events: mpsc::Receiver<ServerEvent>) {
    while let Some(event) = events.recv().await {
        let sent = state.broadcaster().broadcast(&event);
        debug!(
            kind = %event.kind,
            sent,
            subscribers = state.broadcaster().subscriber_count(),
            "dispatched event"
        );
    }
    info!("updates channel closed, broadcast pump exiting");
}
