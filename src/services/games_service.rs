//! Assembly of the snapshot and event payloads sent to clients.

use crate::{
    dto::game::{sort_games, Game, GameIds, Games, Metadata},
    state::SharedState,
};

/// Snapshot of every ready game, sorted for first paint: live games first,
/// then finals, then upcoming games by start time.
pub fn initial_snapshot(state: &SharedState) -> Games {
    let mut games = state.games().get_all();
    sort_games(&mut games);

    Games {
        metadata: Metadata::new(true),
        data: games,
    }
}

/// Wrap freshly written records for an add/update event.
pub fn games_envelope(games: Vec<Game>) -> Games {
    Games {
        metadata: Metadata::new(false),
        data: games,
    }
}

/// Wrap a list of ids for a remove/fail event.
pub fn ids_envelope(ids: Vec<u32>) -> GameIds {
    GameIds {
        metadata: Metadata::new(false),
        data: ids,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, Utc};
    use tokio_util::sync::CancellationToken;

    use crate::{
        config::AppConfig,
        dto::game::{GameStatus, StartTime, State, Status},
        state::AppState,
    };

    use super::*;

    fn test_state() -> SharedState {
        let config = AppConfig {
            port: 0,
            hostname: "localhost".to_string(),
            allowed_origins: vec!["*".to_string()],
            mlb_api_url: "http://127.0.0.1:9".to_string(),
            cache_capacity: 8,
        };
        AppState::new(&config, CancellationToken::new()).unwrap()
    }

    fn ready_game(id: u32, status: GameStatus, start_offset_hours: i64) -> Game {
        Game {
            metadata: Metadata::new(true),
            link: format!("http://example.invalid/game/{id}"),
            id,
            state: State {
                status: Status {
                    general: status,
                    detailed: String::new(),
                    start_time: StartTime {
                        date_time: Utc::now() + TimeDelta::hours(start_offset_hours),
                    },
                },
                ..State::default()
            },
        }
    }

    #[tokio::test]
    async fn initial_snapshot_is_sorted_and_marked_ready() {
        let state = test_state();
        state.games().seed(ready_game(1, GameStatus::Preview, 2));
        state.games().seed(ready_game(2, GameStatus::Live, -1));
        state.games().seed(ready_game(3, GameStatus::Final, -3));

        let snapshot = initial_snapshot(&state);
        assert!(snapshot.metadata.ready);
        let order: Vec<u32> = snapshot.data.iter().map(|game| game.id).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn initial_snapshot_skips_placeholders() {
        let state = test_state();
        state
            .games()
            .discover(745000, "http://example.invalid/feed".to_string())
            .unwrap();

        assert!(initial_snapshot(&state).data.is_empty());
    }

    #[test]
    fn event_envelopes_serialize_with_metadata() {
        let envelope = ids_envelope(vec![745000, 745001]);
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["data"], serde_json::json!([745000, 745001]));
        assert!(value["metadata"]["timestamp"].is_string());
        assert_eq!(value["metadata"]["ready"], false);
    }
}
