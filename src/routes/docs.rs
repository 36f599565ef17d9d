//! Swagger UI over the service's OpenAPI document.

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    dto::{
        game::{
            Diamond, Game, GameIds, GameStatus, Games, Inning, Metadata, Player, StartTime,
            State, Status, Team, TeamInfo, Teams,
        },
        health::HealthResponse,
    },
    state::SharedState,
};

/// OpenAPI document covering the snapshot, update stream, and health routes.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "MLB Gameday API",
        description = "Aggregated live MLB game data pushed over Server-Sent Events"
    ),
    paths(
        super::games::get_initial,
        super::games::get_updates,
        super::health::healthcheck,
    ),
    components(schemas(
        Games,
        GameIds,
        Game,
        GameStatus,
        Metadata,
        State,
        Status,
        StartTime,
        Inning,
        Diamond,
        Teams,
        Team,
        TeamInfo,
        Player,
        HealthResponse,
    ))
)]
struct ApiDoc;

/// Serve the Swagger UI backed by the generated document.
pub fn router(state: SharedState) -> Router<SharedState> {
    let ui: Router<SharedState> = SwaggerUi::new("/docs")
        .url("/api-doc/openapi.json", ApiDoc::openapi())
        .into();

    ui.with_state(state)
}
