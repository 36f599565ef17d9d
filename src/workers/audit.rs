//! Periodic refresh of stale entries and pruning of finished games.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{
    dto::sse::{EventKind, ServerEvent},
    services::games_service,
    state::SharedState,
};

use super::{collect_games, emit};

/// Sweep cadence; the per-status refresh intervals live in the cache.
const AUDIT_INTERVAL: Duration = Duration::from_secs(5);

/// Run the audit loop until `cancel` fires. The first sweep happens one
/// period after startup, giving discovery a head start.
pub async fn run(
    state: SharedState,
    updates: mpsc::Sender<ServerEvent>,
    cancel: CancellationToken,
) {
    let mut ticker = interval_at(Instant::now() + AUDIT_INTERVAL, AUDIT_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("audit worker stopping");
                break;
            }
            _ = ticker.tick() => tick(&state, &updates, &cancel).await,
        }
    }
}

/// One audit pass: sweep the cache, then render the change set into
/// `update` / `remove` / `fail` events.
async fn tick(state: &SharedState, updates: &mpsc::Sender<ServerEvent>, cancel: &CancellationToken) {
    let outcome = state.games().audit(cancel).await;

    if !outcome.updated.is_empty() {
        info!(games = ?outcome.updated, "updated games");
        let games = collect_games(state, cancel, &outcome.updated).await;
        if !games.is_empty() {
            emit(updates, EventKind::Update, &games_service::games_envelope(games)).await;
        }
    }

    if !outcome.removed.is_empty() {
        info!(games = ?outcome.removed, "removed games");
        emit(
            updates,
            EventKind::Remove,
            &games_service::ids_envelope(outcome.removed),
        )
        .await;
    }

    if !outcome.failed.is_empty() {
        warn!(games = ?outcome.failed, "failed to refresh games");
        emit(
            updates,
            EventKind::Fail,
            &games_service::ids_envelope(outcome.failed),
        )
        .await;
    }
}
