//! Background workers keeping the game cache consistent with upstream.
//!
//! Each submodule provides a long-running async function intended to be
//! spawned via `tokio::spawn`. Both accept the root [`CancellationToken`]
//! and exit at their next tick boundary once it fires; a failed tick is
//! logged and never terminates the loop.

pub mod audit;
pub mod discovery;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::{
    dto::{game::Game, sse::{EventKind, ServerEvent}},
    state::SharedState,
};

/// Fetch the ready records for `ids` concurrently, one task per id, joining
/// them before returning. Ids that fail to resolve are logged and skipped so
/// they never block the rest of the batch.
pub(crate) async fn collect_games(
    state: &SharedState,
    cancel: &CancellationToken,
    ids: &[u32],
) -> Vec<Game> {
    let mut handles = Vec::with_capacity(ids.len());
    for &id in ids {
        let state = state.clone();
        let cancel = cancel.clone();
        handles.push((
            id,
            tokio::spawn(async move { state.games().get_one(&cancel, id).await }),
        ));
    }

    let mut games = Vec::with_capacity(handles.len());
    for (id, handle) in handles {
        match handle.await {
            Ok(Some(game)) => games.push(game),
            Ok(None) => warn!(game = id, "failed to get information on game"),
            Err(err) => warn!(game = id, error = %err, "game lookup task failed"),
        }
    }
    games
}

/// Serialize `payload` and enqueue it on the internal event channel. A
/// serialization failure drops the event for this tick; the next tick
/// produces a fresh snapshot anyway.
pub(crate) async fn emit<T>(updates: &mpsc::Sender<ServerEvent>, kind: EventKind, payload: &T)
where
    T: Serialize,
{
    match ServerEvent::json(kind, payload) {
        Ok(event) => {
            if updates.send(event).await.is_err() {
                warn!(kind = %kind, "updates channel closed, dropping event");
            }
        }
        Err(err) => warn!(kind = %kind, error = %err, "failed to serialize event payload"),
    }
}
