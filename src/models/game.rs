//! Match, MatchStatus, and the issued tournament-code record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier of a match within one generated match list (starts at 1).
pub type MatchId = u32;

/// Competitor (team) identifier as handed out at sign-up / drafting.
pub type TeamId = i64;

/// `team2_id` of a bye match: the competitor has no opponent.
pub const BYE_TEAM_ID: TeamId = -1;

/// Lifecycle of a match. Only `Upcoming` is ever set here; other values are written elsewhere.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Upcoming,
    Completed,
}

/// A scheduled match between two competitors, or a bye when `team2_id` is [`BYE_TEAM_ID`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: MatchId,
    pub team1_id: TeamId,
    pub team2_id: TeamId,
    #[serde(default)]
    pub status: MatchStatus,
    /// One code per game played, in play order.
    #[serde(default)]
    pub tournament_codes: Vec<String>,
    /// Winning team of each recorded game, keyed by tournament code.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub game_winners: BTreeMap<String, TeamId>,
    /// Set once the match is decided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_id: Option<TeamId>,
}

impl Match {
    pub fn new(id: MatchId, team1_id: TeamId, team2_id: TeamId) -> Self {
        Self {
            id,
            team1_id,
            team2_id,
            status: MatchStatus::Upcoming,
            tournament_codes: Vec::new(),
            game_winners: BTreeMap::new(),
            winner_id: None,
        }
    }

    pub fn bye(id: MatchId, team_id: TeamId) -> Self {
        Self::new(id, team_id, BYE_TEAM_ID)
    }

    pub fn is_bye(&self) -> bool {
        self.team2_id == BYE_TEAM_ID
    }

    /// Games `team_id` has won in this match so far.
    pub fn game_wins_of(&self, team_id: TeamId) -> usize {
        self.game_winners.values().filter(|&&t| t == team_id).count()
    }
}

/// A tournament code issued for a match, before it is attached to the match itself.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentCode {
    pub match_id: MatchId,
    pub code: String,
}
