use crate::{dto::health::HealthResponse, state::SharedState};

/// Snapshot the liveness counters exposed by the health route.
pub fn health_status(state: &SharedState) -> HealthResponse {
    HealthResponse {
        status: "ok".to_string(),
        games: state.games().len(),
        subscribers: state.broadcaster().subscriber_count(),
    }
}
