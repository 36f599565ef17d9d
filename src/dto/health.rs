use serde::Serialize;
use utoipa::ToSchema;

/// Liveness payload returned by the health route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: String,
    /// Number of games currently held in the cache.
    pub games: usize,
    /// Number of connected SSE subscribers.
    pub subscribers: usize,
}
