//! `fields=` query strings trimming upstream responses to the leaves the
//! projection actually reads.
//!
//! The MLB Stats API accepts a comma-separated list of dotted JSON paths and
//! strips everything else from the response. Each table below must track the
//! deserialization models in `models.rs`; the joined output is pinned by the
//! tests at the bottom.

use std::sync::LazyLock;

/// Leaf paths read from the schedule endpoint.
const SCHEDULE_PATHS: &[&str] = &["dates,games,gamePk", "dates,games,link"];

/// Leaf paths read from the live-game endpoint.
const LIVE_GAME_PATHS: &[&str] = &[
    "gamePk",
    "gameData,datetime,dateTime",
    "gameData,status,abstractGameState",
    "gameData,status,detailedState",
    "gameData,teams,away,name",
    "gameData,teams,away,abbreviation",
    "gameData,teams,away,league,name",
    "gameData,teams,home,name",
    "gameData,teams,home,abbreviation",
    "gameData,teams,home,league,name",
    "gameData,players,id",
    "gameData,players,fullName",
    "gameData,players,primaryNumber",
    "gameData,probablePitchers,away,id",
    "gameData,probablePitchers,home,id",
    "liveData,linescore,currentInning",
    "liveData,linescore,inningHalf",
    "liveData,linescore,teams,home,runs",
    "liveData,linescore,teams,away,runs",
    "liveData,linescore,defense,pitcher,id",
    "liveData,linescore,defense,team,name",
    "liveData,linescore,defense,team,abbreviation",
    "liveData,linescore,defense,team,league,name",
    "liveData,linescore,offense,batter,id",
    "liveData,linescore,offense,first,id",
    "liveData,linescore,offense,second,id",
    "liveData,linescore,offense,third,id",
    "liveData,linescore,offense,pitcher,id",
    "liveData,linescore,offense,team,name",
    "liveData,linescore,outs",
    "liveData,decisions,winner,id",
    "liveData,decisions,loser,id",
];

/// CSV filter for the schedule endpoint, assembled once per process.
pub(crate) static SCHEDULE_FIELDS: LazyLock<String> =
    LazyLock::new(|| SCHEDULE_PATHS.join(","));

/// CSV filter for the live-game endpoint, assembled once per process.
pub(crate) static LIVE_GAME_FIELDS: LazyLock<String> =
    LazyLock::new(|| LIVE_GAME_PATHS.join(","));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_fields_cover_the_schedule_projection() {
        assert_eq!(&*SCHEDULE_FIELDS, "dates,games,gamePk,dates,games,link");
    }

    #[test]
    fn live_game_fields_cover_the_live_game_projection() {
        assert_eq!(
            &*LIVE_GAME_FIELDS,
            "gamePk,gameData,datetime,dateTime,gameData,status,abstractGameState,gameData,status,detailedState,gameData,teams,away,name,gameData,teams,away,abbreviation,gameData,teams,away,league,name,gameData,teams,home,name,gameData,teams,home,abbreviation,gameData,teams,home,league,name,gameData,players,id,gameData,players,fullName,gameData,players,primaryNumber,gameData,probablePitchers,away,id,gameData,probablePitchers,home,id,liveData,linescore,currentInning,liveData,linescore,inningHalf,liveData,linescore,teams,home,runs,liveData,linescore,teams,away,runs,liveData,linescore,defense,pitcher,id,liveData,linescore,defense,team,name,liveData,linescore,defense,team,abbreviation,liveData,linescore,defense,team,league,name,liveData,linescore,offense,batter,id,liveData,linescore,offense,first,id,liveData,linescore,offense,second,id,liveData,linescore,offense,third,id,liveData,linescore,offense,pitcher,id,liveData,linescore,offense,team,name,liveData,linescore,outs,liveData,decisions,winner,id,liveData,decisions,loser,id"
        );
    }
}
