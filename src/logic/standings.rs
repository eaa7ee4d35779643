//! Post-game results: record a game won by a side and update the standings.

use crate::models::{
    CodeMetadata, Match, MatchId, MatchStatus, Side, Standings, TeamId, TeamStanding,
};
use serde::{Deserialize, Serialize};

/// Game wins a team needs within one match to win it (best of three).
pub const WINS_NEEDED_FOR_MATCH: u32 = 2;

/// Errors that can occur when recording a game result. Nothing is changed when one is returned.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StandingsError {
    /// The code has no side assignment in the metadata.
    UnknownCode(String),
    /// No match carries this code for the teams in its metadata entry.
    MatchNotFound(String),
    /// A result for this code was already recorded.
    GameAlreadyRecorded(String),
    /// The match was already decided.
    MatchAlreadyCompleted(MatchId),
    /// A team of the match has no standing.
    TeamNotFound(TeamId),
}

impl std::fmt::Display for StandingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StandingsError::UnknownCode(code) => write!(f, "Unknown tournament code {}", code),
            StandingsError::MatchNotFound(code) => {
                write!(f, "No match for tournament code {}", code)
            }
            StandingsError::GameAlreadyRecorded(code) => {
                write!(f, "Result for tournament code {} was already recorded", code)
            }
            StandingsError::MatchAlreadyCompleted(id) => {
                write!(f, "Match {} is already completed", id)
            }
            StandingsError::TeamNotFound(id) => write!(f, "Team {} not found in standings", id),
        }
    }
}

impl std::error::Error for StandingsError {}

/// What one recorded game changed.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOutcome {
    pub match_id: MatchId,
    pub code: String,
    pub winner_id: TeamId,
    pub loser_id: TeamId,
    pub match_status: MatchStatus,
    /// Set when this game decided the match.
    pub match_winner_id: Option<TeamId>,
    /// Standings of both teams after the update.
    pub winner: TeamStanding,
    pub loser: TeamStanding,
}

/// Record the game played under `code`, won by whoever played `winning_side`.
///
/// 1. Look up the code's side assignment and map the winning side to a team.
/// 2. Find the match carrying the code (the last one, as in the metadata) and store the game
///    winner on it.
/// 3. Add a game win / game loss to the two teams.
/// 4. Once the winner has `wins_needed` game wins in this match, the match is completed and
///    counts as a match win / loss.
///
/// All checks run before anything is modified.
pub fn record_game_result(
    matches: &mut [Match],
    standings: &mut Standings,
    metadata: &CodeMetadata,
    code: &str,
    winning_side: Side,
    wins_needed: u32,
) -> Result<GameOutcome, StandingsError> {
    let entry = metadata
        .get(code)
        .ok_or_else(|| StandingsError::UnknownCode(code.to_string()))?;
    let (winner_id, loser_id) = if entry.team1_side == winning_side {
        (entry.team1_id, entry.team2_id)
    } else {
        (entry.team2_id, entry.team1_id)
    };

    let m = matches
        .iter_mut()
        .rev()
        .find(|m| {
            m.team1_id == entry.team1_id
                && m.team2_id == entry.team2_id
                && m.tournament_codes.iter().any(|c| c == code)
        })
        .ok_or_else(|| StandingsError::MatchNotFound(code.to_string()))?;
    if m.game_winners.contains_key(code) {
        return Err(StandingsError::GameAlreadyRecorded(code.to_string()));
    }
    if m.status == MatchStatus::Completed {
        return Err(StandingsError::MatchAlreadyCompleted(m.id));
    }
    for id in [winner_id, loser_id] {
        if standings.get(id).is_none() {
            return Err(StandingsError::TeamNotFound(id));
        }
    }

    m.game_winners.insert(code.to_string(), winner_id);
    let decided = m.game_wins_of(winner_id) >= wins_needed.max(1) as usize;
    if decided {
        m.status = MatchStatus::Completed;
        m.winner_id = Some(winner_id);
    }

    let winner = standings
        .get_mut(winner_id)
        .ok_or(StandingsError::TeamNotFound(winner_id))?;
    winner.add_game_win();
    if decided {
        winner.add_win();
    }
    let winner = winner.clone();

    let loser = standings
        .get_mut(loser_id)
        .ok_or(StandingsError::TeamNotFound(loser_id))?;
    loser.add_game_loss();
    if decided {
        loser.add_loss();
    }
    let loser = loser.clone();

    log::info!(
        "Match {}: game {} won by team {} (game records {} / {})",
        m.id,
        code,
        winner_id,
        winner.game_record,
        loser.game_record
    );
    if decided {
        log::info!(
            "Match win condition met for team {} in match {}",
            winner_id,
            m.id
        );
    }

    Ok(GameOutcome {
        match_id: m.id,
        code: code.to_string(),
        winner_id,
        loser_id,
        match_status: m.status,
        match_winner_id: m.winner_id,
        winner,
        loser,
    })
}
