use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tracing::info;

use crate::{
    dto::game::Games,
    error::AppError,
    services::{games_service, sse_service},
    state::SharedState,
};

/// Configure the games endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/api/games/initial", get(get_initial))
        .route("/api/games/update", get(get_updates))
}

#[utoipa::path(
    get,
    path = "/api/games/initial",
    responses(
        (status = 200, description = "Snapshot of all ready games, sorted for display", body = Games),
        (status = 502, description = "Upstream unavailable"),
        (status = 500, description = "Serialization failure")
    )
)]
/// Return the current snapshot of games for first page load.
pub async fn get_initial(State(state): State<SharedState>) -> Result<Response, AppError> {
    info!("initial snapshot requested");

    let snapshot = games_service::initial_snapshot(&state);
    let body =
        serde_json::to_vec(&snapshot).map_err(|err| AppError::Internal(err.to_string()))?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

#[utoipa::path(
    get,
    path = "/api/games/update",
    responses((status = 200, description = "SSE stream of add/update/remove/fail events", content_type = "text/event-stream", body = String))
)]
/// Stream incremental game updates to a connected client.
pub async fn get_updates(State(state): State<SharedState>) -> impl IntoResponse {
    let (subscriber, events) = sse_service::subscribe(&state);
    info!(
        subscriber = %subscriber,
        subscribers = state.broadcaster().subscriber_count(),
        "new SSE subscriber"
    );

    let stream = sse_service::to_sse_stream(state, subscriber, events);
    // Sse only sets Content-Type and Cache-Control on its own.
    ([(header::CONNECTION, "keep-alive")], stream)
}
