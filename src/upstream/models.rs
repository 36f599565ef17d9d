//! Deserialization models for the two upstream endpoints, trimmed to the
//! fields the projection reads.
//!
//! Every field defaults: responses are filtered server-side by the `fields=`
//! query string, and several subtrees (defense, decisions, probable pitchers)
//! are simply absent depending on game state.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Response to the schedule endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct Schedule {
    pub dates: Vec<ScheduleDate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct ScheduleDate {
    pub games: Vec<ScheduledGame>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct ScheduledGame {
    pub game_pk: u32,
    pub link: String,
}

/// Response to the live game endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct LiveGame {
    pub game_pk: u32,
    pub game_data: GameData,
    pub live_data: LiveData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct GameData {
    pub datetime: UpstreamDatetime,
    pub status: UpstreamStatus,
    pub teams: UpstreamTeams,
    pub players: HashMap<String, UpstreamPlayer>,
    pub probable_pitchers: ProbablePitchers,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct UpstreamDatetime {
    pub date_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct UpstreamStatus {
    pub abstract_game_state: String,
    pub detailed_state: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct UpstreamTeams {
    pub away: UpstreamTeam,
    pub home: UpstreamTeam,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct UpstreamTeam {
    pub name: String,
    pub abbreviation: String,
    pub league: UpstreamLeague,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct UpstreamLeague {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct UpstreamPlayer {
    pub id: u32,
    pub full_name: String,
    pub primary_number: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct ProbablePitchers {
    pub away: PlayerRef,
    pub home: PlayerRef,
}

/// Bare player reference; the id resolves through the roster table.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct PlayerRef {
    pub id: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct LiveData {
    pub linescore: Linescore,
    pub decisions: Decisions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct Linescore {
    pub current_inning: u8,
    pub inning_half: String,
    pub teams: LinescoreTeams,
    pub defense: Defense,
    pub offense: Offense,
    pub outs: u8,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct LinescoreTeams {
    pub home: LinescoreTeam,
    pub away: LinescoreTeam,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct LinescoreTeam {
    pub runs: u8,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct Defense {
    pub pitcher: PlayerRef,
    pub team: UpstreamTeam,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct Offense {
    pub batter: PlayerRef,
    pub first: PlayerRef,
    pub second: PlayerRef,
    pub third: PlayerRef,
    pub pitcher: PlayerRef,
    pub team: OffenseTeam,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct OffenseTeam {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct Decisions {
    pub winner: PlayerRef,
    pub loser: PlayerRef,
}
