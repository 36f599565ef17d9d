pub mod broadcaster;
pub mod cache;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::{
    config::AppConfig,
    upstream::{MlbClient, UpstreamError},
};

pub use self::{broadcaster::Broadcaster, cache::GameCache};

pub type SharedState = Arc<AppState>;

/// Central application state shared by the HTTP surface and the background
/// workers.
pub struct AppState {
    upstream: MlbClient,
    games: GameCache,
    broadcaster: Broadcaster,
    shutdown: CancellationToken,
}

impl AppState {
    /// Construct the shared state, wiring the upstream client into the game
    /// cache. `shutdown` is the root token observed by every long-lived task.
    pub fn new(config: &AppConfig, shutdown: CancellationToken) -> Result<SharedState, UpstreamError> {
        let upstream = MlbClient::new(&config.mlb_api_url)?;
        let games = GameCache::with_capacity(upstream.clone(), config.cache_capacity);

        Ok(Arc::new(Self {
            upstream,
            games,
            broadcaster: Broadcaster::new(),
            shutdown,
        }))
    }

    /// Client for the MLB Stats API.
    pub fn upstream(&self) -> &MlbClient {
        &self.upstream
    }

    /// Store of the day's games.
    pub fn games(&self) -> &GameCache {
        &self.games
    }

    /// Registry of SSE subscribers.
    pub fn broadcaster(&self) -> &Broadcaster {
        &self.broadcaster
    }

    /// Root cancellation token driving graceful shutdown.
    pub fn shutdown(&self) -> &CancellationToken {
        &self.shutdown
    }
}
