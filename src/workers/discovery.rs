//! Periodic discovery of newly scheduled games.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    dto::sse::{EventKind, ServerEvent},
    services::games_service,
    state::SharedState,
};

use super::{collect_games, emit};

/// New games appear when the schedule day flips; polling faster buys nothing.
const DISCOVERY_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Run the discovery loop until `cancel` fires. The first tick runs
/// immediately so the cache is populated at startup.
pub async fn run(
    state: SharedState,
    updates: mpsc::Sender<ServerEvent>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(DISCOVERY_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("discovery worker stopping");
                break;
            }
            _ = ticker.tick() => tick(&state, &updates, &cancel).await,
        }
    }
}

/// One discovery pass: list today's schedule, store placeholders for unseen
/// games, hydrate them in parallel, and emit a single `add` event for the
/// ones that came up ready.
async fn tick(state: &SharedState, updates: &mpsc::Sender<ServerEvent>, cancel: &CancellationToken) {
    let schedule = match state.upstream().list_schedule(cancel, "").await {
        Ok(schedule) => schedule,
        Err(err) => {
            warn!(error = %err, "failed to list schedule, added 0 games");
            return;
        }
    };

    let mut added = Vec::new();
    for (id, link) in schedule {
        match state.games().discover(id, link) {
            Ok(true) => added.push(id),
            Ok(false) => {}
            Err(err) => {
                // The cache is full; the rest of the schedule cannot fit
                // either, so give up until the audit sweep prunes entries.
                warn!(error = %err, "aborting discovery tick");
                break;
            }
        }
    }

    if added.is_empty() {
        debug!("added 0 games");
        return;
    }

    info!(games = ?added, "discovered new games");
    let games = collect_games(state, cancel, &added).await;
    if games.is_empty() {
        warn!("none of the discovered games could be hydrated");
        return;
    }

    emit(updates, EventKind::Add, &games_service::games_envelope(games)).await;
}
