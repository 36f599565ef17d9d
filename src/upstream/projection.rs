//! Deterministic transformation from the upstream live-game payload into the
//! domain [`Game`].

use std::collections::HashMap;

use chrono::DateTime;

use crate::dto::game::{
    Diamond, Game, GameStatus, Inning, Metadata, Player, StartTime, State, Status, Team, TeamInfo,
    Teams,
};

use super::models::{LiveGame, UpstreamPlayer, UpstreamTeam};

/// Player lookup table for one game, pre-seeded with the sentinel so that a
/// zero or unknown reference always resolves.
struct Roster(HashMap<u32, Player>);

impl Roster {
    fn build(players: &HashMap<String, UpstreamPlayer>) -> Self {
        let mut table = HashMap::with_capacity(players.len() + 1);
        table.insert(0, Player::tbd());
        for player in players.values() {
            table.insert(
                player.id,
                Player {
                    id: player.id,
                    name: player.full_name.clone(),
                    number: player.primary_number.clone(),
                },
            );
        }
        Self(table)
    }

    fn player(&self, id: u32) -> Player {
        self.0.get(&id).cloned().unwrap_or_else(Player::tbd)
    }
}

/// Project one hydrated upstream payload into the domain record, stamping it
/// ready. `link` is the refresh URL the payload was fetched from.
pub(crate) fn project(live: LiveGame, link: &str) -> Game {
    let roster = Roster::build(&live.game_data.players);
    let status = GameStatus::from_abstract(&live.game_data.status.abstract_game_state);
    let (away_pitcher, home_pitcher) = pitcher_ids(status, &live);

    let linescore = &live.live_data.linescore;
    let mut state = State {
        teams: Teams {
            away: Team {
                info: team_info(&live.game_data.teams.away),
                pitcher: roster.player(away_pitcher),
                score: linescore.teams.away.runs,
            },
            home: Team {
                info: team_info(&live.game_data.teams.home),
                pitcher: roster.player(home_pitcher),
                score: linescore.teams.home.runs,
            },
        },
        inning: Inning {
            number: linescore.current_inning,
            top_bottom: linescore.inning_half.clone(),
        },
        diamond: Diamond {
            batter: roster.player(linescore.offense.batter.id),
            first: roster.player(linescore.offense.first.id),
            second: roster.player(linescore.offense.second.id),
            third: roster.player(linescore.offense.third.id),
        },
        outs: linescore.outs,
        status: Status {
            general: status,
            detailed: live.game_data.status.detailed_state.clone(),
            start_time: StartTime {
                date_time: live
                    .game_data
                    .datetime
                    .date_time
                    .unwrap_or(DateTime::UNIX_EPOCH),
            },
        },
    };

    // Upstream keeps a stale batter in several situations: before the game
    // starts, after the third out while the half-inning flips, and while the
    // batter is also recorded on a base. Blank it out.
    if state.status.general != GameStatus::Live
        || state.outs == 3
        || state.diamond.batter == state.diamond.first
        || state.diamond.batter == state.diamond.second
        || state.diamond.batter == state.diamond.third
    {
        state.diamond.batter = Player::tbd();
    }

    if state.status.general == GameStatus::Final {
        state.diamond.batter = Player::tbd();
        state.outs = 0;
    }

    Game {
        id: live.game_pk,
        link: link.to_string(),
        metadata: Metadata::new(true),
        state,
    }
}

/// Pick the away and home pitcher references for the current game phase.
fn pitcher_ids(status: GameStatus, live: &LiveGame) -> (u32, u32) {
    match status {
        GameStatus::Preview => (
            live.game_data.probable_pitchers.away.id,
            live.game_data.probable_pitchers.home.id,
        ),
        GameStatus::Live => {
            let linescore = &live.live_data.linescore;
            if live.game_data.teams.away.name == linescore.defense.team.name {
                (linescore.defense.pitcher.id, linescore.offense.pitcher.id)
            } else {
                (linescore.offense.pitcher.id, linescore.defense.pitcher.id)
            }
        }
        GameStatus::Final => {
            let teams = &live.live_data.linescore.teams;
            let decisions = &live.live_data.decisions;
            if teams.away.runs > teams.home.runs {
                (decisions.winner.id, decisions.loser.id)
            } else {
                (decisions.loser.id, decisions.winner.id)
            }
        }
    }
}

fn team_info(team: &UpstreamTeam) -> TeamInfo {
    TeamInfo {
        name: team.name.clone(),
        abbreviation: team.abbreviation.clone(),
        league: team.league.name.clone(),
    }
}
