//! Domain model for a single game and the envelopes sent to clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Snapshot or update payload wrapping a list of games.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Games {
    pub metadata: Metadata,
    pub data: Vec<Game>,
}

/// Payload wrapping a list of game IDs, used for remove/fail events.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct GameIds {
    pub metadata: Metadata,
    pub data: Vec<u32>,
}

/// One scheduled MLB contest, keyed by the upstream `gamePk`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Game {
    pub metadata: Metadata,
    /// Absolute refresh URL, set at discovery and preserved thereafter.
    pub link: String,
    pub id: u32,
    pub state: State,
}

impl Game {
    /// Placeholder stored at discovery time, before the first hydration.
    pub fn discovered(id: u32, link: String) -> Self {
        Self {
            metadata: Metadata::new(false),
            link,
            id,
            state: State::default(),
        }
    }

    /// Content equality between two records, ignoring the write timestamp.
    ///
    /// Two records that differ only in `metadata.timestamp` count as the same,
    /// so an upstream response identical to the stored one reports unchanged.
    pub fn same_content(&self, other: &Game) -> bool {
        self.id == other.id
            && self.link == other.link
            && self.metadata.ready == other.metadata.ready
            && self.state == other.state
    }
}

/// Bookkeeping attached to every record and envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Metadata {
    /// Moment this record was last written from upstream.
    pub timestamp: DateTime<Utc>,
    /// True once the record has been hydrated at least once.
    pub ready: bool,
}

impl Metadata {
    pub fn new(ready: bool) -> Self {
        Self {
            timestamp: Utc::now(),
            ready,
        }
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            timestamp: DateTime::UNIX_EPOCH,
            ready: false,
        }
    }
}

/// Full projected game state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct State {
    pub teams: Teams,
    pub inning: Inning,
    pub diamond: Diamond,
    pub outs: u8,
    pub status: Status,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Inning {
    pub number: u8,
    pub top_bottom: String,
}

/// Who is at bat and on each base.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Diamond {
    pub batter: Player,
    pub first: Player,
    pub second: Player,
    pub third: Player,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Status {
    pub general: GameStatus,
    pub detailed: String,
    pub start_time: StartTime,
}

/// Scheduled first pitch, kept in the upstream `{"dateTime": ...}` shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StartTime {
    #[serde(rename = "dateTime")]
    pub date_time: DateTime<Utc>,
}

impl Default for StartTime {
    fn default() -> Self {
        Self {
            date_time: DateTime::UNIX_EPOCH,
        }
    }
}

/// Coarse game phase, driving refresh cadence, pruning, and sort order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum GameStatus {
    #[default]
    Preview,
    Live,
    Final,
}

impl GameStatus {
    /// Map the upstream `abstractGameState` string; anything unrecognized
    /// gets the pre-game treatment.
    pub fn from_abstract(state: &str) -> Self {
        match state {
            "Live" => GameStatus::Live,
            "Final" => GameStatus::Final,
            _ => GameStatus::Preview,
        }
    }

    /// Position in the snapshot sort: live games first, then finals, then
    /// upcoming games.
    fn sort_rank(self) -> u8 {
        match self {
            GameStatus::Live => 0,
            GameStatus::Final => 1,
            GameStatus::Preview => 2,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Teams {
    pub away: Team,
    pub home: Team,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Team {
    pub info: TeamInfo,
    pub pitcher: Player,
    pub score: u8,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TeamInfo {
    pub name: String,
    pub abbreviation: String,
    pub league: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub number: String,
}

impl Player {
    /// Sentinel substituted for missing or semantically-empty player slots.
    pub fn tbd() -> Self {
        Self {
            id: 0,
            name: "TBD".to_string(),
            number: "-1".to_string(),
        }
    }
}

/// Sort games in place for the initial snapshot: status rank first, then
/// scheduled start ascending. The sort is stable.
pub fn sort_games(games: &mut [Game]) {
    games.sort_by(|a, b| {
        a.state
            .status
            .general
            .sort_rank()
            .cmp(&b.state.status.general.sort_rank())
            .then_with(|| {
                a.state
                    .status
                    .start_time
                    .date_time
                    .cmp(&b.state.status.start_time.date_time)
            })
    });
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    fn game(id: u32, status: GameStatus, start: DateTime<Utc>) -> Game {
        Game {
            metadata: Metadata::new(true),
            link: format!("http://example.invalid/game/{id}"),
            id,
            state: State {
                status: Status {
                    general: status,
                    detailed: String::new(),
                    start_time: StartTime { date_time: start },
                },
                ..State::default()
            },
        }
    }

    #[test]
    fn sort_puts_live_before_final_before_preview() {
        let now = Utc::now();
        let mut games = vec![
            game(1, GameStatus::Preview, now),
            game(2, GameStatus::Final, now),
            game(3, GameStatus::Live, now),
        ];
        sort_games(&mut games);
        let order: Vec<u32> = games.iter().map(|g| g.id).collect();
        assert_eq!(order, vec![3, 2, 1]);
    }

    #[test]
    fn sort_breaks_ties_by_start_time() {
        let now = Utc::now();
        let mut games = vec![
            game(1, GameStatus::Preview, now + TimeDelta::hours(3)),
            game(2, GameStatus::Preview, now + TimeDelta::hours(1)),
            game(3, GameStatus::Preview, now + TimeDelta::hours(2)),
        ];
        sort_games(&mut games);
        let order: Vec<u32> = games.iter().map(|g| g.id).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[test]
    fn same_content_ignores_timestamp() {
        let now = Utc::now();
        let original = game(7, GameStatus::Live, now);
        let mut refreshed = original.clone();
        refreshed.metadata.timestamp = now + TimeDelta::seconds(30);
        assert!(original.same_content(&refreshed));

        refreshed.state.outs = 2;
        assert!(!original.same_content(&refreshed));
    }

    #[test]
    fn game_serializes_with_wire_field_names() {
        let value = serde_json::to_value(game(7, GameStatus::Live, Utc::now())).unwrap();
        assert!(value["state"]["inning"]["top_bottom"].is_string());
        assert!(value["state"]["status"]["start_time"]["dateTime"].is_string());
        assert_eq!(value["state"]["status"]["general"], "Live");
        assert_eq!(value["metadata"]["ready"], true);
    }

    #[test]
    fn unknown_abstract_state_maps_to_preview() {
        assert_eq!(GameStatus::from_abstract("Warmup"), GameStatus::Preview);
        assert_eq!(GameStatus::from_abstract("Live"), GameStatus::Live);
        assert_eq!(GameStatus::from_abstract("Final"), GameStatus::Final);
    }
}
